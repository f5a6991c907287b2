//! # vntl - chunked LLM translation of text files
//!
//! `vntl` translates long texts into Vietnamese through an OpenAI-compatible
//! chat-completions endpoint. The input is normalized and split into chunks
//! that fit a character budget, each chunk is wrapped in prompt templates
//! picked by source language and mode, and the translated chunks are joined
//! back in order into one output file.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a classical Chinese text with the default settings
//! vntl story.txt                 # writes story.vi.txt
//!
//! # Literal Sino-Vietnamese rendering with a glossary
//! vntl -f hv --mode literal --glossary names.json poem.txt -o poem.out.txt
//!
//! # Check that every template for Thai is present
//! vntl prompts -f th
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/vntl/config.toml`:
//!
//! ```toml
//! [vntl]
//! provider = "ollama"
//! model = "qwen2.5:14b"
//! from = "zh"
//! mode = "smooth"
//! prompts_dir = "prompts"
//!
//! [providers.ollama]
//! endpoint = "http://localhost:11434"
//! models = ["qwen2.5:14b"]
//! timeout_secs = 600
//! ```
//!
//! ## Templates
//!
//! The prompt directory holds `system_{lang}_{mode}.txt`,
//! `assistant_{lang}_{mode}.txt` and `intro_{lang}.txt` for every language
//! in use.

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and provider settings.
pub mod config;

/// Error types shared by the pipeline.
pub mod error;

/// File system utilities.
pub mod fs;

/// Input file reading.
pub mod input;

/// Global output configuration (quiet, verbose, colors).
pub mod output;

/// XDG-style configuration path.
pub mod paths;

/// Chunking, prompt assembly, provider client and the run orchestrator.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;

pub use error::{Error, ProviderError, Result};
