//! Prompt template storage.
//!
//! Templates live as plain UTF-8 files in one directory, addressed by
//! `{role}_{language}_{mode}.txt`, or `intro_{language}.txt` for intros,
//! which have no mode variant.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::language::LanguageCode;
use super::mode::TranslationMode;
use crate::error::{Error, Result};

/// Which part of the conversation a template fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateRole {
    System,
    Assistant,
    Intro,
}

impl TemplateRole {
    pub const ALL: [Self; 3] = [Self::System, Self::Assistant, Self::Intro];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Assistant => "assistant",
            Self::Intro => "intro",
        }
    }

    const fn has_mode(self) -> bool {
        !matches!(self, Self::Intro)
    }
}

/// Address of one template: (role, language, mode-or-none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    pub role: TemplateRole,
    pub language: LanguageCode,
    pub mode: Option<TranslationMode>,
}

impl SlotId {
    /// Builds the slot for `role`; the mode is dropped for intro templates.
    pub const fn new(role: TemplateRole, language: LanguageCode, mode: TranslationMode) -> Self {
        Self {
            role,
            language,
            mode: if role.has_mode() { Some(mode) } else { None },
        }
    }

    pub fn file_name(&self) -> String {
        format!("{self}.txt")
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Some(mode) => write!(f, "{}_{}_{}", self.role.as_str(), self.language, mode),
            None => write!(f, "{}_{}", self.role.as_str(), self.language),
        }
    }
}

/// Presence of one slot on disk.
#[derive(Debug, Clone)]
pub struct SlotStatus {
    pub slot: SlotId,
    pub path: PathBuf,
    pub exists: bool,
}

/// Loads templates from a directory and caches them for the rest of the run.
///
/// The cache is filled once per slot and never invalidated. It lives in a
/// `RefCell`: the pipeline is single-threaded.
#[derive(Debug)]
pub struct PromptStore {
    dir: PathBuf,
    fallback_language: Option<LanguageCode>,
    cache: RefCell<HashMap<SlotId, Rc<str>>>,
}

impl PromptStore {
    /// Creates a store that aborts on any missing template.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            fallback_language: None,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Retries a missing slot once with `language` before failing.
    #[must_use]
    pub const fn with_fallback_language(mut self, language: Option<LanguageCode>) -> Self {
        self.fallback_language = language;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, slot: &SlotId) -> PathBuf {
        self.dir.join(slot.file_name())
    }

    /// Returns the template text for `(role, language, mode)`.
    pub fn load(
        &self,
        role: TemplateRole,
        language: LanguageCode,
        mode: TranslationMode,
    ) -> Result<Rc<str>> {
        let slot = SlotId::new(role, language, mode);

        match (self.load_slot(slot), self.fallback_language) {
            (Err(Error::TemplateNotFound { .. }), Some(fallback)) if fallback != language => {
                let fallback_slot = SlotId {
                    language: fallback,
                    ..slot
                };
                match self.load_slot(fallback_slot) {
                    Err(Error::TemplateNotFound { .. }) => Err(self.not_found(&slot)),
                    other => {
                        crate::debug!("Template {slot} missing, using {fallback_slot}");
                        other
                    }
                }
            }
            (result, _) => result,
        }
    }

    fn load_slot(&self, slot: SlotId) -> Result<Rc<str>> {
        if let Some(text) = self.cache.borrow().get(&slot) {
            return Ok(Rc::clone(text));
        }

        let path = self.path_for(&slot);
        if !path.is_file() {
            return Err(self.not_found(&slot));
        }

        let text: Rc<str> = match fs::read_to_string(&path) {
            Ok(text) => Rc::from(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(self.not_found(&slot)),
            Err(source) => return Err(Error::TemplateLoad { path, source }),
        };

        crate::debug!("Loaded template {}", path.display());
        self.cache.borrow_mut().insert(slot, Rc::clone(&text));
        Ok(text)
    }

    fn not_found(&self, slot: &SlotId) -> Error {
        Error::TemplateNotFound {
            slot: slot.to_string(),
            path: self.path_for(slot),
        }
    }

    /// Lists every slot a run with `(language, mode)` needs and whether its
    /// file exists. Fallback is not applied.
    pub fn check(&self, language: LanguageCode, mode: TranslationMode) -> Vec<SlotStatus> {
        TemplateRole::ALL
            .iter()
            .map(|role| {
                let slot = SlotId::new(*role, language, mode);
                let path = self.path_for(&slot);
                let exists = path.is_file();
                SlotStatus { slot, path, exists }
            })
            .collect()
    }
}
