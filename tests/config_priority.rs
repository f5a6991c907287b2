#![allow(clippy::unwrap_used)]
//! Config priority contract tests.
//!
//! Priority order (highest to lowest):
//! 1. CLI arguments
//! 2. Config file defaults
//! 3. Built-in defaults

use std::collections::HashMap;
use std::path::PathBuf;
use vntl::config::{ConfigFile, ProviderConfig, ResolveOptions, VntlConfig, resolve_config};
use vntl::translation::{DEFAULT_MAX_CHUNK_CHARS, LanguageCode, TranslationMode};

fn make_config_with_defaults() -> ConfigFile {
    let mut providers = HashMap::new();
    providers.insert(
        "test_provider".to_string(),
        ProviderConfig {
            endpoint: "http://test.local".to_string(),
            api_key: Some("test_key".to_string()),
            api_key_env: None,
            models: vec!["config_model".to_string(), "cli_model".to_string()],
            timeout_secs: None,
        },
    );
    providers.insert(
        "other_provider".to_string(),
        ProviderConfig {
            endpoint: "http://other.local".to_string(),
            api_key: None,
            api_key_env: None,
            models: vec![],
            timeout_secs: Some(30),
        },
    );

    ConfigFile {
        vntl: VntlConfig {
            provider: Some("test_provider".to_string()),
            model: Some("config_model".to_string()),
            from: Some("hv".to_string()),
            mode: Some("literal".to_string()),
            prompts_dir: Some(PathBuf::from("/etc/vntl/prompts")),
            max_chunk_chars: Some(4000),
            temperature: Some(0.3),
            glossary: Some(PathBuf::from("names.json")),
            ..VntlConfig::default()
        },
        providers,
    }
}

#[test]
fn test_config_file_values_apply_without_cli() {
    let resolved =
        resolve_config(&ResolveOptions::default(), &make_config_with_defaults()).unwrap();

    assert_eq!(resolved.provider_name, "test_provider");
    assert_eq!(resolved.endpoint, "http://test.local");
    assert_eq!(resolved.model, "config_model");
    assert_eq!(resolved.api_key.as_deref(), Some("test_key"));
    assert_eq!(resolved.language, LanguageCode::Hv);
    assert_eq!(resolved.mode, TranslationMode::Literal);
    assert_eq!(resolved.prompts_dir, PathBuf::from("/etc/vntl/prompts"));
    assert_eq!(resolved.max_chunk_chars, 4000);
    assert!((resolved.temperature - 0.3).abs() < f32::EPSILON);
    assert_eq!(resolved.glossary, Some(PathBuf::from("names.json")));
}

#[test]
fn test_cli_overrides_every_file_value() {
    let options = ResolveOptions {
        provider: Some("other_provider".to_string()),
        model: Some("cli_model".to_string()),
        from: Some("lo".to_string()),
        mode: Some("smooth".to_string()),
        prompts_dir: Some(PathBuf::from("./prompts")),
        style_example: Some(PathBuf::from("example.txt")),
        glossary: Some(PathBuf::from("cli.json")),
        max_chunk_chars: Some(1500),
    };

    let resolved = resolve_config(&options, &make_config_with_defaults()).unwrap();

    assert_eq!(resolved.provider_name, "other_provider");
    assert_eq!(resolved.endpoint, "http://other.local");
    assert_eq!(resolved.model, "cli_model");
    assert!(resolved.api_key.is_none());
    assert_eq!(resolved.timeout.map(|t| t.as_secs()), Some(30));
    assert_eq!(resolved.language, LanguageCode::Lo);
    assert_eq!(resolved.mode, TranslationMode::Smooth);
    assert_eq!(resolved.prompts_dir, PathBuf::from("./prompts"));
    assert_eq!(resolved.style_example, Some(PathBuf::from("example.txt")));
    assert_eq!(resolved.glossary, Some(PathBuf::from("cli.json")));
    assert_eq!(resolved.max_chunk_chars, 1500);
}

#[test]
fn test_builtin_defaults_fill_the_gaps() {
    let mut config = make_config_with_defaults();
    config.vntl = VntlConfig {
        provider: Some("test_provider".to_string()),
        model: Some("config_model".to_string()),
        ..VntlConfig::default()
    };

    let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

    assert_eq!(resolved.language, LanguageCode::Zh);
    assert_eq!(resolved.mode, TranslationMode::Smooth);
    assert_eq!(resolved.prompts_dir, PathBuf::from("prompts"));
    assert_eq!(resolved.max_chunk_chars, DEFAULT_MAX_CHUNK_CHARS);
    assert!(resolved.temperature.abs() < f32::EPSILON);
    assert!(resolved.style_example.is_none());
    assert!(resolved.glossary.is_none());
}

#[test]
fn test_cli_zero_budget_is_rejected_even_if_file_is_valid() {
    let options = ResolveOptions {
        max_chunk_chars: Some(0),
        ..ResolveOptions::default()
    };

    let err = resolve_config(&options, &make_config_with_defaults()).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::CONFIG);
}

#[test]
fn test_cli_invalid_mode_is_rejected_even_if_file_is_valid() {
    let options = ResolveOptions {
        mode: Some("poetic".to_string()),
        ..ResolveOptions::default()
    };

    let err = resolve_config(&options, &make_config_with_defaults()).unwrap_err();
    assert!(err.to_string().contains("poetic"));
}
