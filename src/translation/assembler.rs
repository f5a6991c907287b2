//! Per-chunk prompt assembly.

use super::chunker::Chunk;
use super::glossary::Glossary;
use super::language::LanguageCode;
use super::mode::TranslationMode;
use super::prompt::{PromptStore, TemplateRole};
use crate::error::Result;

/// Role tag of one prompt segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    System,
    Assistant,
    Intro,
    Glossary,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub role: SegmentRole,
    pub text: String,
}

/// The ordered segments sent to the provider for one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub segments: Vec<Segment>,
}

impl AssembledPrompt {
    /// Text of the first segment with `role`, if any.
    pub fn segment(&self, role: SegmentRole) -> Option<&str> {
        self.segments
            .iter()
            .find(|s| s.role == role)
            .map(|s| s.text.as_str())
    }
}

/// Builds prompts from the store's templates.
pub struct PromptAssembler<'a> {
    store: &'a PromptStore,
    glossary: Option<&'a Glossary>,
}

impl<'a> PromptAssembler<'a> {
    pub const fn new(store: &'a PromptStore) -> Self {
        Self {
            store,
            glossary: None,
        }
    }

    #[must_use]
    pub const fn with_glossary(mut self, glossary: Option<&'a Glossary>) -> Self {
        self.glossary = glossary;
        self
    }

    /// Assembles system, assistant (plus style example), intro, optional
    /// glossary and the chunk text, in that order.
    pub fn assemble(
        &self,
        chunk: &Chunk,
        language: LanguageCode,
        mode: TranslationMode,
        style_example: Option<&str>,
    ) -> Result<AssembledPrompt> {
        let system = self.store.load(TemplateRole::System, language, mode)?;
        let assistant = self.store.load(TemplateRole::Assistant, language, mode)?;
        let intro = self.store.load(TemplateRole::Intro, language, mode)?;

        let mut assistant_text = assistant.to_string();
        if let Some(example) = style_example {
            assistant_text.push_str(example);
        }

        let mut segments = vec![
            Segment {
                role: SegmentRole::System,
                text: system.to_string(),
            },
            Segment {
                role: SegmentRole::Assistant,
                text: assistant_text,
            },
            Segment {
                role: SegmentRole::Intro,
                text: intro.to_string(),
            },
        ];

        if let Some(glossary) = self.glossary.filter(|g| !g.is_empty()) {
            segments.push(Segment {
                role: SegmentRole::Glossary,
                text: glossary.render(),
            });
        }

        segments.push(Segment {
            role: SegmentRole::User,
            text: chunk.text.clone(),
        });

        Ok(AssembledPrompt { segments })
    }
}
