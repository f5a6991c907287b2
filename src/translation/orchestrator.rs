//! End-to-end translation of one file.
//!
//! The run moves through `Idle → Loading → Chunking → Translating(i) →
//! Joining → Done`; any error moves it to `Failed`. Empty input has nothing
//! to translate and goes from `Loading` straight to `Done`. Only `Loading`
//! and the final write touch the filesystem, and the write happens only after
//! every chunk has been translated, so a failed run leaves no output file.

use std::path::{Path, PathBuf};

use super::assembler::PromptAssembler;
use super::chunker::{self, DEFAULT_MAX_CHUNK_CHARS, TranslatedChunk};
use super::client::TranslationClient;
use super::glossary::Glossary;
use super::language::LanguageCode;
use super::mode::TranslationMode;
use super::prompt::PromptStore;
use crate::error::{Error, Result};
use crate::fs::atomic_write;
use crate::input::InputReader;

/// Everything a single run needs, built once before the pipeline starts.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub language: LanguageCode,
    pub mode: TranslationMode,
    /// Appended verbatim to the assistant template when present.
    pub style_example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Loading,
    Chunking,
    Translating { index: usize, total: usize },
    Joining,
    Done,
    Failed,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub chunks: usize,
    pub input_chars: usize,
    pub output_chars: usize,
    pub output: PathBuf,
}

type Observer<'a> = Box<dyn FnMut(&RunState) + 'a>;

/// Drives chunking, prompt assembly and translation for one run.
pub struct Orchestrator<'a, C: TranslationClient + ?Sized> {
    store: &'a PromptStore,
    client: &'a C,
    glossary: Option<&'a Glossary>,
    max_chunk_chars: usize,
    state: RunState,
    observer: Option<Observer<'a>>,
}

impl<'a, C: TranslationClient + ?Sized> Orchestrator<'a, C> {
    pub fn new(store: &'a PromptStore, client: &'a C) -> Self {
        Self {
            store,
            client,
            glossary: None,
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
            state: RunState::Idle,
            observer: None,
        }
    }

    #[must_use]
    pub const fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars;
        self
    }

    #[must_use]
    pub const fn with_glossary(mut self, glossary: Option<&'a Glossary>) -> Self {
        self.glossary = glossary;
        self
    }

    /// Calls `observer` on every state transition.
    #[must_use]
    pub fn on_transition(mut self, observer: impl FnMut(&RunState) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub const fn state(&self) -> &RunState {
        &self.state
    }

    /// Reads the input file, translates it and writes the output file.
    pub async fn run(&mut self, config: &RunConfig) -> Result<RunReport> {
        let result = self.run_inner(config).await;
        if result.is_err() {
            self.transition(RunState::Failed);
        }
        result
    }

    async fn run_inner(&mut self, config: &RunConfig) -> Result<RunReport> {
        self.transition(RunState::Loading);
        let source = read_input(&config.input)?;
        let input_chars = source.chars().count();

        let (translated, chunks) = self.translate_chunks(&source, config).await?;

        write_output(&config.output, &translated)?;
        self.transition(RunState::Done);

        Ok(RunReport {
            chunks,
            input_chars,
            output_chars: translated.chars().count(),
            output: config.output.clone(),
        })
    }

    /// Translates in-memory text; no file is read or written.
    pub async fn translate_text(&mut self, text: &str, config: &RunConfig) -> Result<String> {
        let result = self.translate_chunks(text, config).await;
        match result {
            Ok((translated, _)) => {
                self.transition(RunState::Done);
                Ok(translated)
            }
            Err(e) => {
                self.transition(RunState::Failed);
                Err(e)
            }
        }
    }

    async fn translate_chunks(&mut self, text: &str, config: &RunConfig) -> Result<(String, usize)> {
        let chunks = chunker::split(text, self.max_chunk_chars)?;
        let total = chunks.len();

        if total == 0 {
            crate::debug!("Input is empty, nothing to translate");
            return Ok((String::new(), 0));
        }
        self.transition(RunState::Chunking);
        crate::debug!(
            "Split {} characters into {total} chunk(s) of at most {}",
            text.chars().count(),
            self.max_chunk_chars
        );

        let assembler = PromptAssembler::new(self.store).with_glossary(self.glossary);
        let mut translated = Vec::with_capacity(total);

        for chunk in &chunks {
            self.transition(RunState::Translating {
                index: chunk.index,
                total,
            });
            let prompt = assembler.assemble(
                chunk,
                config.language,
                config.mode,
                config.style_example.as_deref(),
            )?;
            let text = self.client.translate(&prompt).await?;
            crate::debug!(
                "Chunk {}/{total}: {} -> {} characters",
                chunk.index + 1,
                chunk.char_len(),
                text.chars().count()
            );
            translated.push(TranslatedChunk::new(chunk, text));
        }

        self.transition(RunState::Joining);
        Ok((chunker::join_translations(&translated), total))
    }

    fn transition(&mut self, state: RunState) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&state);
        }
        self.state = state;
    }
}

pub(crate) fn read_input(path: &Path) -> Result<String> {
    InputReader::read(path).map_err(|e| Error::Input {
        path: path.to_path_buf(),
        message: format!("{e:#}"),
    })
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    atomic_write(path, text).map_err(|e| Error::Output {
        path: path.to_path_buf(),
        message: format!("{e:#}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::translation::assembler::{AssembledPrompt, SegmentRole};
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Echoes the chunk back in upper case and records every call.
    #[derive(Default)]
    struct EchoClient {
        calls: RefCell<Vec<String>>,
        fail_on: Option<usize>,
    }

    #[async_trait(?Send)]
    impl TranslationClient for EchoClient {
        async fn translate(&self, prompt: &AssembledPrompt) -> Result<String, ProviderError> {
            let chunk = prompt.segment(SegmentRole::User).unwrap_or_default().to_string();
            let call = self.calls.borrow().len();
            self.calls.borrow_mut().push(chunk.clone());
            if self.fail_on == Some(call) {
                return Err(ProviderError::Api {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(chunk.to_uppercase())
        }
    }

    fn prompts_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("system_zh_smooth.txt"), "system").unwrap();
        fs::write(dir.path().join("assistant_zh_smooth.txt"), "assistant").unwrap();
        fs::write(dir.path().join("intro_zh.txt"), "intro").unwrap();
        dir
    }

    fn config(dir: &TempDir) -> RunConfig {
        RunConfig {
            input: dir.path().join("input.txt"),
            output: dir.path().join("output.txt"),
            language: LanguageCode::Zh,
            mode: TranslationMode::Smooth,
            style_example: None,
        }
    }

    #[tokio::test]
    async fn test_translate_text_joins_paragraphs() {
        let prompts = prompts_dir();
        let store = PromptStore::new(prompts.path());
        let client = EchoClient::default();
        let mut orchestrator = Orchestrator::new(&store, &client).with_max_chunk_chars(12);

        let out = orchestrator
            .translate_text("first para\n\nsecond para", &config(&prompts))
            .await
            .unwrap();

        assert_eq!(out, "FIRST PARA\n\nSECOND PARA");
        assert_eq!(*client.calls.borrow(), vec!["first para", "second para"]);
        assert_eq!(orchestrator.state(), &RunState::Done);
    }

    #[tokio::test]
    async fn test_transitions_are_reported_in_order() {
        let prompts = prompts_dir();
        let store = PromptStore::new(prompts.path());
        let client = EchoClient::default();
        let seen = RefCell::new(Vec::new());

        let mut orchestrator = Orchestrator::new(&store, &client)
            .with_max_chunk_chars(5)
            .on_transition(|s| seen.borrow_mut().push(s.clone()));
        orchestrator
            .translate_text("aaa\n\nbbb", &config(&prompts))
            .await
            .unwrap();
        drop(orchestrator);

        assert_eq!(
            seen.into_inner(),
            vec![
                RunState::Chunking,
                RunState::Translating { index: 0, total: 2 },
                RunState::Translating { index: 1, total: 2 },
                RunState::Joining,
                RunState::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_input_goes_straight_to_done() {
        let prompts = prompts_dir();
        let store = PromptStore::new(prompts.path());
        let client = EchoClient::default();
        let seen = RefCell::new(Vec::new());
        let config = config(&prompts);
        fs::write(&config.input, "  \n\n\t\n").unwrap();

        let mut orchestrator =
            Orchestrator::new(&store, &client).on_transition(|s| seen.borrow_mut().push(s.clone()));
        let report = orchestrator.run(&config).await.unwrap();
        drop(orchestrator);

        assert_eq!(report.chunks, 0);
        assert_eq!(
            seen.into_inner(),
            vec![RunState::Loading, RunState::Done]
        );
        assert!(client.calls.borrow().is_empty());
        assert_eq!(fs::read_to_string(&config.output).unwrap(), "");
    }

    #[tokio::test]
    async fn test_failure_moves_to_failed() {
        let prompts = prompts_dir();
        let store = PromptStore::new(prompts.path());
        let client = EchoClient {
            fail_on: Some(0),
            ..EchoClient::default()
        };
        let mut orchestrator = Orchestrator::new(&store, &client);

        let result = orchestrator.translate_text("text", &config(&prompts)).await;

        assert!(matches!(result, Err(Error::Provider(_))));
        assert_eq!(orchestrator.state(), &RunState::Failed);
    }

    #[tokio::test]
    async fn test_zero_budget_fails_before_translating() {
        let prompts = prompts_dir();
        let store = PromptStore::new(prompts.path());
        let client = EchoClient::default();
        let mut orchestrator = Orchestrator::new(&store, &client).with_max_chunk_chars(0);

        let result = orchestrator.translate_text("text", &config(&prompts)).await;

        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
        assert!(client.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_missing_input_is_input_error() {
        let prompts = prompts_dir();
        let store = PromptStore::new(prompts.path());
        let client = EchoClient::default();
        let mut orchestrator = Orchestrator::new(&store, &client);

        let result = orchestrator.run(&config(&prompts)).await;

        assert!(matches!(result, Err(Error::Input { .. })));
        assert!(!prompts.path().join("output.txt").exists());
    }
}
