//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Select, Text};
use std::path::PathBuf;

use super::translate::select_language;
use crate::config::{ConfigFile, ConfigManager, DEFAULT_PROMPTS_DIR};
use crate::translation::{DEFAULT_MAX_CHUNK_CHARS, MODES};
use crate::ui::{Style, handle_prompt_cancellation};

/// Prints the current defaults, or walks through editing them.
pub fn run_configure(show: bool) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    if show {
        print_current_defaults(&config);
        println!(
            "{} {}",
            Style::label("config file:"),
            Style::secondary(manager.config_path().display())
        );
        return Ok(());
    }

    handle_prompt_cancellation(|| run_configure_inner(&manager, config))?;
    Ok(())
}

fn run_configure_inner(manager: &ConfigManager, mut config: ConfigFile) -> Result<()> {
    if config.providers.is_empty() {
        bail!(
            "No providers configured.\n\n\
             Add a [providers.<name>] section to {} first.",
            manager.config_path().display()
        );
    }

    print_current_defaults(&config);

    let mut provider_names: Vec<String> = config.providers.keys().cloned().collect();
    provider_names.sort();
    let provider = select_from(
        "Default provider:",
        &provider_names,
        config.vntl.provider.as_deref(),
    )?;

    let available_models = config
        .providers
        .get(&provider)
        .map(|p| p.models.clone())
        .unwrap_or_default();
    let model = select_model(&available_models, config.vntl.model.as_deref())?;

    let from = select_language(config.vntl.from.as_deref())?;

    let mode_names: Vec<String> = MODES.iter().map(|(m, _)| m.to_string()).collect();
    let mode = select_from("Default mode:", &mode_names, config.vntl.mode.as_deref())?;

    let prompts_default = config
        .vntl
        .prompts_dir
        .as_ref()
        .map_or_else(|| DEFAULT_PROMPTS_DIR.to_string(), |p| p.display().to_string());
    let prompts_dir = Text::new("Prompt template directory:")
        .with_default(&prompts_default)
        .prompt()?;

    config.vntl.provider = Some(provider);
    config.vntl.model = Some(model);
    config.vntl.from = Some(from);
    config.vntl.mode = Some(mode);
    config.vntl.prompts_dir = Some(PathBuf::from(prompts_dir.trim()));

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display())
    );

    Ok(())
}

fn print_current_defaults(config: &ConfigFile) {
    let defaults = &config.vntl;
    let show =
        |value: Option<String>| value.map_or_else(|| Style::secondary("(not set)"), Style::value);

    println!("{}", Style::header("Current defaults"));
    let rows = [
        ("provider", defaults.provider.clone()),
        ("model", defaults.model.clone()),
        ("from", defaults.from.clone()),
        ("mode", defaults.mode.clone()),
        (
            "prompts_dir",
            defaults.prompts_dir.as_ref().map(|p| p.display().to_string()),
        ),
        (
            "max_chunk_chars",
            Some(
                defaults
                    .max_chunk_chars
                    .unwrap_or(DEFAULT_MAX_CHUNK_CHARS)
                    .to_string(),
            ),
        ),
        ("glossary", defaults.glossary.as_ref().map(|p| p.display().to_string())),
    ];
    for (key, value) in rows {
        println!("  {} {}", Style::label(format!("{key:16}")), show(value));
    }
    println!();
}

fn select_from(message: &str, options: &[String], default: Option<&str>) -> Result<String> {
    let default_index = default
        .and_then(|d| options.iter().position(|o| o == d))
        .unwrap_or(0);

    Ok(Select::new(message, options.to_vec())
        .with_starting_cursor(default_index)
        .prompt()?)
}

fn select_model(available_models: &[String], default: Option<&str>) -> Result<String> {
    if !available_models.is_empty() {
        return select_from("Default model:", available_models, default);
    }

    let mut prompt = Text::new("Default model:").with_help_message("Enter the model name");
    if let Some(d) = default {
        prompt = prompt.with_default(d);
    }

    let model = prompt.prompt()?;
    if model.trim().is_empty() {
        bail!("Model name cannot be empty");
    }
    Ok(model.trim().to_string())
}
