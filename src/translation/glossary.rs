//! Preferred renderings for names and titles.
//!
//! A glossary is a JSON object mapping source terms to the spelling the
//! translation should use. Terms are kept sorted so the rendered block is
//! identical on every run.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::fs::atomic_write;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glossary {
    entries: BTreeMap<String, String>,
}

impl Glossary {
    /// Loads a glossary from a JSON object file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::Glossary {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents).map_err(|message| Error::Glossary {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_json(contents: &str) -> Result<Self, String> {
        let value: serde_json::Value =
            serde_json::from_str(contents).map_err(|e| e.to_string())?;
        let serde_json::Value::Object(map) = value else {
            return Err("expected a JSON object of term => rendering".to_string());
        };

        let mut entries = BTreeMap::new();
        for (term, rendering) in map {
            let term = term.trim().to_string();
            let rendering = match rendering {
                serde_json::Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            };
            if !term.is_empty() && !rendering.is_empty() {
                entries.insert(term, rendering);
            }
        }

        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn insert(&mut self, term: impl Into<String>, rendering: impl Into<String>) {
        self.entries.insert(term.into(), rendering.into());
    }

    /// Names with no entry yet, in their original order. Terms that differ
    /// only in whitespace count as the same term.
    pub fn missing<'a>(&self, names: &'a [String]) -> Vec<&'a str> {
        let known: HashSet<String> = self.entries.keys().map(|t| term_key(t)).collect();
        names
            .iter()
            .map(String::as_str)
            .filter(|name| {
                let key = term_key(name);
                !key.is_empty() && !known.contains(&key)
            })
            .collect()
    }

    /// Adds every entry of `other`; its renderings win on conflict.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Writes the glossary as a pretty-printed JSON object.
    pub fn save(&self, path: &Path) -> Result<()> {
        let output_error = |message: String| Error::Output {
            path: path.to_path_buf(),
            message,
        };
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| output_error(e.to_string()))?;
        atomic_write(path, &format!("{json}\n")).map_err(|e| output_error(format!("{e:#}")))
    }

    /// Renders the glossary as a reference block for the model.
    pub fn render(&self) -> String {
        let mut out = String::from("=== GLOSSARY (reference, adjust case to context) ===\n");
        for (term, rendering) in &self.entries {
            out.push_str("- ");
            out.push_str(term);
            out.push_str(" => ");
            out.push_str(rendering);
            out.push('\n');
        }
        out.push_str("=== END GLOSSARY ===");
        out
    }
}

/// Lookup key for a term: the term with all whitespace removed.
pub(super) fn term_key(term: &str) -> String {
    term.chars().filter(|c| !c.is_whitespace()).collect()
}
