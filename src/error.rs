//! Error types for the translation pipeline.
//!
//! The core never retries or downgrades an error: whatever fails is returned
//! to the caller as one of these variants.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a completion provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response stream broke off or carried malformed data.
    #[error("Stream error: {0}")]
    Stream(String),

    /// The provider returned no text at all.
    #[error("Empty response from provider")]
    EmptyResponse,
}

impl ProviderError {
    /// HTTP status carried by the error, if the provider sent one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            Self::Stream(_) | Self::EmptyResponse => None,
        }
    }
}

/// Errors surfaced by the translation core.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad chunk budget, unknown language or mode code, and similar.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No template file exists for the requested slot.
    #[error("Prompt template '{slot}' not found at {}", path.display())]
    TemplateNotFound { slot: String, path: PathBuf },

    /// The template file exists but could not be read as UTF-8 text.
    #[error("Failed to load prompt template {}: {source}", path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The style example file could not be read as UTF-8 text.
    #[error("Failed to read style example {}: {source}", path.display())]
    StyleExample {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The glossary file could not be read or is not a JSON object of strings.
    #[error("Invalid glossary {}: {message}", path.display())]
    Glossary { path: PathBuf, message: String },

    /// The completion provider failed for a chunk.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The input text could not be read.
    #[error("Failed to read input {}: {message}", path.display())]
    Input { path: PathBuf, message: String },

    /// The translated text could not be written.
    #[error("Failed to write output {}: {message}", path.display())]
    Output { path: PathBuf, message: String },
}

impl Error {
    /// Process exit code for this error, following sysexits conventions.
    pub const fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::InvalidConfiguration(_)
            | Self::TemplateNotFound { .. }
            | Self::TemplateLoad { .. }
            | Self::StyleExample { .. }
            | Self::Glossary { .. } => exitcode::CONFIG,
            Self::Provider(_) => exitcode::UNAVAILABLE,
            Self::Input { .. } => exitcode::NOINPUT,
            Self::Output { .. } => exitcode::CANTCREAT,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_not_found_display() {
        let err = Error::TemplateNotFound {
            slot: "system_zh_smooth".to_string(),
            path: PathBuf::from("prompts/system_zh_smooth.txt"),
        };
        let msg = err.to_string();
        assert!(msg.contains("system_zh_smooth"));
        assert!(msg.contains("prompts/system_zh_smooth.txt"));
    }

    #[test]
    fn test_provider_error_status() {
        let err = ProviderError::Api {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.status(), Some(429));
        assert_eq!(ProviderError::EmptyResponse.status(), None);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            Error::InvalidConfiguration("x".to_string()).exit_code(),
            exitcode::CONFIG
        );
        assert_eq!(
            Error::Provider(ProviderError::EmptyResponse).exit_code(),
            exitcode::UNAVAILABLE
        );
        assert_eq!(
            Error::Input {
                path: PathBuf::from("in.txt"),
                message: "missing".to_string(),
            }
            .exit_code(),
            exitcode::NOINPUT
        );
    }
}
