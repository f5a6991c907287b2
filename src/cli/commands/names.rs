//! Glossary building from names extracted by the provider.

use anyhow::Result;
use inquire::{Confirm, Text};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::translation::{Glossary, LanguageCode, TranslationClient, extract_names};
use crate::ui::{Spinner, Style, handle_prompt_cancellation};

/// Glossary file used when none is configured.
pub const DEFAULT_GLOSSARY: &str = "glossary.json";

/// Extracts names from `text`, asks for renderings of the ones the glossary
/// lacks and saves the merged glossary. Returns `None` if the user cancels.
///
/// A glossary given on the command line or in the config is always reused;
/// the default `glossary.json` is reused after confirmation.
pub async fn build_glossary<C: TranslationClient + ?Sized>(
    client: &C,
    text: &str,
    language: LanguageCode,
    configured: Option<&Path>,
) -> Result<Option<Glossary>> {
    let path = configured.map_or_else(|| PathBuf::from(DEFAULT_GLOSSARY), Path::to_path_buf);
    let interactive = std::io::stdin().is_terminal();

    let mut glossary = Glossary::default();
    if path.exists() {
        let reuse = if configured.is_some() || !interactive {
            true
        } else {
            let Some(reuse) = handle_prompt_cancellation(|| confirm_reuse(&path))? else {
                return Ok(None);
            };
            reuse
        };
        if reuse {
            glossary = Glossary::load(&path)?;
            crate::debug!("Reusing glossary with {} term(s)", glossary.len());
        }
    }

    let spinner = Spinner::new("Extracting names and titles");
    let names = extract_names(client, text, language).await;
    spinner.stop();
    let names = names?;

    let missing: Vec<String> = glossary
        .missing(&names)
        .into_iter()
        .map(str::to_string)
        .collect();
    crate::status!(
        "{} {} extracted, {} not in the glossary",
        Style::header("Names:"),
        names.len(),
        missing.len()
    );

    if !missing.is_empty() {
        if interactive {
            let Some(filled) = handle_prompt_cancellation(|| ask_renderings(&missing))? else {
                return Ok(None);
            };
            glossary.merge(filled);
        } else {
            crate::warn!(
                "{} stdin is not a terminal, {} name(s) left without a rendering",
                Style::warning("Note:"),
                missing.len()
            );
        }
    }

    glossary.save(&path)?;
    crate::status!(
        "{} Saved {} glossary term(s) to {}",
        Style::success("✓"),
        glossary.len(),
        Style::secondary(path.display())
    );

    Ok(Some(glossary))
}

fn confirm_reuse(path: &Path) -> Result<bool> {
    Ok(Confirm::new(&format!(
        "{} already exists. Reuse it and add to it?",
        path.display()
    ))
    .with_default(true)
    .prompt()?)
}

fn ask_renderings(names: &[String]) -> Result<Glossary> {
    let mut glossary = Glossary::default();

    let fill = Confirm::new(&format!(
        "Enter renderings for {} new name(s) now?",
        names.len()
    ))
    .with_default(false)
    .prompt()?;
    if !fill {
        return Ok(glossary);
    }

    for (i, name) in names.iter().enumerate() {
        let rendering = Text::new(&format!("[{}/{}] {name} =>", i + 1, names.len()))
            .with_help_message("Leave empty to skip")
            .prompt()?;
        let rendering = rendering.trim();
        if !rendering.is_empty() {
            glossary.insert(name.as_str(), rendering);
        }
    }

    Ok(glossary)
}
