mod assembler;
mod chunker;
mod client;
mod glossary;
mod language;
mod mode;
mod names;
mod orchestrator;
mod prompt;
mod sse_parser;

pub use assembler::{AssembledPrompt, PromptAssembler, Segment, SegmentRole};
pub use chunker::{
    Chunk, DEFAULT_MAX_CHUNK_CHARS, TranslatedChunk, join_source, join_translations, normalize,
    split,
};
pub use client::{ClientConfig, OpenAiClient, TranslationClient};
pub use glossary::Glossary;
pub use language::{LanguageCode, SUPPORTED_LANGUAGES, print_languages};
pub use mode::{MODES, TranslationMode, print_modes};
pub use names::{NAME_SAMPLE_CHARS, extract_names, extraction_prompt};
pub use orchestrator::{Orchestrator, RunConfig, RunReport, RunState};
pub(crate) use orchestrator::read_input;
pub use prompt::{PromptStore, SlotId, SlotStatus, TemplateRole};
