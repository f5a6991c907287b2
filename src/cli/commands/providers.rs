//! Provider listing command handler.

use anyhow::Result;

use crate::config::{ConfigFile, ConfigManager, ProviderConfig};
use crate::error::Error;
use crate::ui::Style;

/// Prints configured providers to stdout, or the details of one provider.
pub fn print_providers(specific_provider: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;
    print_providers_from(&config, specific_provider)
}

fn print_providers_from(config: &ConfigFile, specific_provider: Option<&str>) -> Result<()> {
    if config.providers.is_empty() {
        println!("No providers configured.");
        println!("Add providers to ~/.config/vntl/config.toml");
        return Ok(());
    }

    let default_provider = config.vntl.provider.as_deref();
    let marker = |name: &str| {
        if default_provider == Some(name) {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        }
    };

    if let Some(name) = specific_provider {
        let provider = config.providers.get(name).ok_or_else(|| {
            Error::InvalidConfiguration(format!("provider '{name}' not found"))
        })?;
        println!("{}{}", Style::header(name), marker(name));
        print_details(provider);
        return Ok(());
    }

    println!("{}\n", Style::header("Configured providers"));
    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();
    for name in names {
        let provider = &config.providers[name];
        println!("  {}{}", Style::value(name), marker(name));
        println!(
            "    {} {}",
            Style::label("endpoint:"),
            Style::secondary(&provider.endpoint)
        );
        if !provider.models.is_empty() {
            println!(
                "    {} {}",
                Style::label("models:"),
                provider.models.join(", ")
            );
        }
    }

    Ok(())
}

fn print_details(provider: &ProviderConfig) {
    println!("  {} {}", Style::label("endpoint"), provider.endpoint);
    if provider.requires_api_key() {
        let state = if provider.get_api_key().is_some() {
            Style::success("(set)")
        } else {
            Style::warning("(not set)")
        };
        println!("  {}  {state}", Style::label("api_key"));
    }
    if let Some(secs) = provider.timeout_secs {
        println!("  {}  {secs}s", Style::label("timeout"));
    }
    if provider.models.is_empty() {
        println!("  {}   {}", Style::label("models"), Style::secondary("(none configured)"));
    } else {
        println!("  {}", Style::label("models"));
        for model in &provider.models {
            println!("    - {}", Style::value(model));
        }
    }
}
