//! Template presence check for one language and mode.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::{ConfigManager, DEFAULT_PROMPTS_DIR};
use crate::error::Error;
use crate::translation::{LanguageCode, PromptStore, SlotStatus, TranslationMode};
use crate::ui::Style;

pub struct PromptsOptions {
    pub from: Option<String>,
    pub mode: Option<String>,
    pub prompts_dir: Option<PathBuf>,
}

/// Lists the templates a run would load and fails if any is missing.
pub fn check_prompts(options: PromptsOptions) -> Result<()> {
    let config = ConfigManager::new()?.load_or_default()?.vntl;

    let language: LanguageCode = options
        .from
        .as_deref()
        .or(config.from.as_deref())
        .unwrap_or("zh")
        .parse()?;
    let mode: TranslationMode = options
        .mode
        .as_deref()
        .or(config.mode.as_deref())
        .map_or(Ok(TranslationMode::default()), str::parse)?;
    let dir = options
        .prompts_dir
        .or(config.prompts_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPTS_DIR));

    let store = PromptStore::new(dir);
    let statuses = store.check(language, mode);
    print_statuses(&store, language, mode, &statuses);

    let missing = statuses.iter().filter(|s| !s.exists).count();
    if missing > 0 {
        return Err(Error::InvalidConfiguration(format!(
            "{missing} prompt template(s) missing in {}",
            store.dir().display()
        ))
        .into());
    }
    Ok(())
}

fn print_statuses(
    store: &PromptStore,
    language: LanguageCode,
    mode: TranslationMode,
    statuses: &[SlotStatus],
) {
    println!(
        "{} {} ({language}, {mode})",
        Style::header("Prompt templates in"),
        Style::secondary(store.dir().display())
    );
    for status in statuses {
        let mark = if status.exists {
            Style::success("✓")
        } else {
            Style::error("✗")
        };
        println!(
            "  {mark} {:24} {}",
            status.slot.to_string(),
            Style::secondary(status.path.display())
        );
    }
}
