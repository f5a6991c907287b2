use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;
use crate::paths;
use crate::translation::{DEFAULT_MAX_CHUNK_CHARS, LanguageCode, TranslationMode};
use crate::ui::Style;

/// Template directory used when neither the CLI nor the config file names one.
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";

/// Default settings in the `[vntl]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VntlConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    /// Default source language code.
    pub from: Option<String>,
    /// Default translation mode (`smooth` or `literal`).
    pub mode: Option<String>,
    pub prompts_dir: Option<PathBuf>,
    /// Language whose templates stand in for a missing slot.
    pub fallback_language: Option<String>,
    pub max_chunk_chars: Option<usize>,
    pub temperature: Option<f32>,
    pub style_example: Option<PathBuf>,
    pub glossary: Option<PathBuf>,
}

/// Configuration for a translation provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The OpenAI-compatible API endpoint URL.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub models: Vec<String>,
    /// Request timeout; unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    /// Gets the API key, preferring the environment variable over the config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// The complete configuration file, `~/.config/vntl/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub vntl: VntlConfig,
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Settings for one run after merging CLI, config file and built-in defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider_name: String,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
    pub language: LanguageCode,
    pub mode: TranslationMode,
    pub prompts_dir: PathBuf,
    pub fallback_language: Option<LanguageCode>,
    pub max_chunk_chars: usize,
    pub temperature: f32,
    pub style_example: Option<PathBuf>,
    pub glossary: Option<PathBuf>,
}

/// CLI overrides; each one wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub from: Option<String>,
    pub mode: Option<String>,
    pub prompts_dir: Option<PathBuf>,
    pub style_example: Option<PathBuf>,
    pub glossary: Option<PathBuf>,
    pub max_chunk_chars: Option<usize>,
}

fn missing(key: &str, flag: &str) -> Error {
    Error::InvalidConfiguration(format!(
        "missing required setting '{key}'\n\n\
         Please provide it via:\n  \
         - CLI option: vntl {flag}\n  \
         - Config file: ~/.config/vntl/config.toml"
    ))
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if the provider or model is
/// missing, the provider is unknown, a language or mode is not recognized,
/// the chunk budget is zero, or a required API key is not set.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig, Error> {
    let defaults = &config_file.vntl;

    let provider_name = options
        .provider
        .as_ref()
        .or(defaults.provider.as_ref())
        .cloned()
        .ok_or_else(|| missing("provider", "--provider <name>"))?;

    let provider_config = config_file.providers.get(&provider_name).ok_or_else(|| {
        let mut available: Vec<_> = config_file.providers.keys().map(String::as_str).collect();
        available.sort_unstable();
        if available.is_empty() {
            Error::InvalidConfiguration(format!(
                "provider '{provider_name}' not found\n\n\
                 No providers configured. Run `vntl configure` or add providers to \
                 ~/.config/vntl/config.toml"
            ))
        } else {
            Error::InvalidConfiguration(format!(
                "provider '{provider_name}' not found\n\n\
                 Available providers:\n  \
                 - {}",
                available.join("\n  - ")
            ))
        }
    })?;

    let model = options
        .model
        .as_ref()
        .or(defaults.model.as_ref())
        .cloned()
        .ok_or_else(|| missing("model", "--model <name>"))?;

    if !provider_config.models.is_empty() && !provider_config.models.contains(&model) {
        crate::warn!(
            "{} Model '{model}' is not in the configured models list for '{provider_name}'\n\
             Configured models: {}\n\
             Proceeding anyway...\n",
            Style::warning("Warning:"),
            provider_config.models.join(", ")
        );
    }

    let language: LanguageCode = options
        .from
        .as_deref()
        .or(defaults.from.as_deref())
        .unwrap_or("zh")
        .parse()?;

    let mode: TranslationMode = options
        .mode
        .as_deref()
        .or(defaults.mode.as_deref())
        .map_or(Ok(TranslationMode::default()), str::parse)?;

    let fallback_language = defaults
        .fallback_language
        .as_deref()
        .map(str::parse::<LanguageCode>)
        .transpose()?;

    let max_chunk_chars = options
        .max_chunk_chars
        .or(defaults.max_chunk_chars)
        .unwrap_or(DEFAULT_MAX_CHUNK_CHARS);
    if max_chunk_chars == 0 {
        return Err(Error::InvalidConfiguration(
            "max_chunk_chars must be greater than zero".to_string(),
        ));
    }

    let api_key = provider_config.get_api_key();
    if provider_config.requires_api_key() && api_key.is_none() {
        let env_var = provider_config.api_key_env.as_deref().unwrap_or("API_KEY");
        return Err(Error::InvalidConfiguration(format!(
            "provider '{provider_name}' requires an API key\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key in ~/.config/vntl/config.toml"
        )));
    }

    Ok(ResolvedConfig {
        provider_name,
        endpoint: provider_config.endpoint.clone(),
        model,
        api_key,
        timeout: provider_config.timeout_secs.map(Duration::from_secs),
        language,
        mode,
        prompts_dir: options
            .prompts_dir
            .clone()
            .or_else(|| defaults.prompts_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPTS_DIR)),
        fallback_language,
        max_chunk_chars,
        temperature: defaults.temperature.unwrap_or(0.0),
        style_example: options
            .style_example
            .clone()
            .or_else(|| defaults.style_example.clone()),
        glossary: options.glossary.clone().or_else(|| defaults.glossary.clone()),
    })
}

/// Manages loading and saving the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Configuration is stored at `$XDG_CONFIG_HOME/vntl/config.toml`
    /// or `~/.config/vntl/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })
    }

    /// Loads the file, falling back to an empty configuration when it is
    /// missing. A file that exists but does not parse is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}
