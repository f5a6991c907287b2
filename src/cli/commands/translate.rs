use anyhow::Result;
use inquire::{Select, Text};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::error::Error;
use super::names::build_glossary;
use crate::translation::{
    ClientConfig, Glossary, OpenAiClient, Orchestrator, PromptStore, RunConfig, RunState,
    SUPPORTED_LANGUAGES, read_input,
};
use crate::ui::{Spinner, Style, handle_prompt_cancellation};

const DEFAULT_INPUT: &str = "input.txt";
const DEFAULT_OUTPUT: &str = "output.txt";

pub struct TranslateOptions {
    pub file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// Build or extend the glossary from extracted names before translating.
    pub extract_names: bool,
    pub resolve: ResolveOptions,
}

pub async fn run_translate(mut options: TranslateOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default()?;

    let (input, output) = if let Some(file) = options.file.take() {
        let output = options
            .output
            .take()
            .unwrap_or_else(|| default_output_path(&file));
        (file, output)
    } else {
        let default_from = options
            .resolve
            .from
            .clone()
            .or_else(|| config_file.vntl.from.clone());
        let ask_language = options.resolve.from.is_none();
        let Some(answers) =
            handle_prompt_cancellation(|| ask_paths(default_from.as_deref(), ask_language))?
        else {
            return Ok(());
        };
        if answers.from.is_some() {
            options.resolve.from = answers.from;
        }
        (answers.input, answers.output)
    };

    let resolved = resolve_config(&options.resolve, &config_file)?;
    let run_config = RunConfig {
        input,
        output,
        language: resolved.language,
        mode: resolved.mode,
        style_example: read_style_example(resolved.style_example.as_deref())?,
    };
    let client = OpenAiClient::new(ClientConfig {
        endpoint: resolved.endpoint.clone(),
        model: resolved.model.clone(),
        api_key: resolved.api_key.clone(),
        temperature: resolved.temperature,
        timeout: resolved.timeout,
    })
    .map_err(Error::from)?;

    crate::debug!(
        "provider {} ({}), model {}, prompts {}",
        resolved.provider_name,
        resolved.endpoint,
        resolved.model,
        resolved.prompts_dir.display()
    );

    let glossary = if options.extract_names {
        let text = read_input(&run_config.input)?;
        let Some(glossary) = build_glossary(
            &client,
            &text,
            run_config.language,
            resolved.glossary.as_deref(),
        )
        .await?
        else {
            return Ok(());
        };
        Some(glossary).filter(|g| !g.is_empty())
    } else {
        resolved
            .glossary
            .as_deref()
            .map(Glossary::load)
            .transpose()?
    };
    if let Some(glossary) = &glossary {
        crate::debug!("Using glossary with {} term(s)", glossary.len());
    }

    translate_file(&resolved, &run_config, &client, glossary.as_ref()).await
}

async fn translate_file(
    resolved: &ResolvedConfig,
    run_config: &RunConfig,
    client: &OpenAiClient,
    glossary: Option<&Glossary>,
) -> Result<()> {
    let store = PromptStore::new(resolved.prompts_dir.clone())
        .with_fallback_language(resolved.fallback_language);

    crate::status!(
        "{} {} ({}, {}) -> {}",
        Style::header("Translating"),
        Style::value(run_config.input.display()),
        Style::code(run_config.language),
        Style::value(run_config.mode),
        Style::value(run_config.output.display())
    );

    let spinner = Spinner::new("Loading input");
    let mut orchestrator = Orchestrator::new(&store, client)
        .with_max_chunk_chars(resolved.max_chunk_chars)
        .with_glossary(glossary)
        .on_transition(|state| {
            if let Some(message) = progress_message(state) {
                spinner.set_message(message);
            }
        });

    let result = orchestrator.run(run_config).await;
    drop(orchestrator);
    spinner.stop();

    if let Err(Error::Provider(e)) = &result
        && matches!(e.status(), Some(401 | 403))
    {
        crate::warn!(
            "{} the provider rejected the request; check the API key for '{}'",
            Style::warning("Hint:"),
            resolved.provider_name
        );
    }
    let report = result?;

    crate::status!(
        "{} {} chunk(s), {} -> {} characters, written to {}",
        Style::success("✓"),
        report.chunks,
        report.input_chars,
        report.output_chars,
        Style::secondary(report.output.display())
    );

    Ok(())
}

fn progress_message(state: &RunState) -> Option<String> {
    match state {
        RunState::Loading => Some("Loading input".to_string()),
        RunState::Chunking => Some("Splitting text".to_string()),
        RunState::Translating { index, total } => {
            Some(format!("Translating chunk {}/{total}", index + 1))
        }
        RunState::Joining => Some("Joining translations".to_string()),
        RunState::Idle | RunState::Done | RunState::Failed => None,
    }
}

fn read_style_example(path: Option<&Path>) -> Result<Option<String>, Error> {
    path.map(|path| {
        fs::read_to_string(path).map_err(|source| Error::StyleExample {
            path: path.to_path_buf(),
            source,
        })
    })
    .transpose()
}

/// `novel.txt` becomes `novel.vi.txt`; `novel` becomes `novel.vi`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let file_name = match input.extension() {
        Some(ext) => format!("{stem}.vi.{}", ext.to_string_lossy()),
        None => format!("{stem}.vi"),
    };
    input.with_file_name(file_name)
}

struct PathAnswers {
    input: PathBuf,
    output: PathBuf,
    from: Option<String>,
}

fn ask_paths(default_from: Option<&str>, ask_language: bool) -> Result<PathAnswers> {
    let input = Text::new("Input file:").with_default(DEFAULT_INPUT).prompt()?;
    let output = Text::new("Output file:")
        .with_default(DEFAULT_OUTPUT)
        .prompt()?;

    let from = if ask_language {
        Some(select_language(default_from)?)
    } else {
        None
    };

    Ok(PathAnswers {
        input: PathBuf::from(input.trim()),
        output: PathBuf::from(output.trim()),
        from,
    })
}

pub(crate) fn select_language(default: Option<&str>) -> Result<String> {
    let options: Vec<String> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| format!("{code} - {name}"))
        .collect();

    let default_index = default
        .and_then(|d| SUPPORTED_LANGUAGES.iter().position(|(code, _)| code.as_str() == d))
        .or_else(|| SUPPORTED_LANGUAGES.iter().position(|(code, _)| code.as_str() == "zh"))
        .unwrap_or(0);

    let selection = Select::new("Source language:", options)
        .with_starting_cursor(default_index)
        .prompt()?;

    let code = selection.split(" - ").next().unwrap_or(&selection);
    Ok(code.to_string())
}
