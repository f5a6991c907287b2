//! Subcommand implementations.

/// Configure command handler.
pub mod configure;

/// Name extraction and glossary building.
pub mod names;

/// Prompt template check.
pub mod prompts;

/// Provider listing command handler.
pub mod providers;

/// Translation command handler.
pub mod translate;
