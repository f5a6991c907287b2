use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vntl")]
#[command(about = "Translate text files into Vietnamese, chunk by chunk, with an LLM")]
#[command(version)]
pub struct Args {
    /// File to translate (prompts interactively if not provided)
    pub file: Option<PathBuf>,

    /// Output file (default: input name with `.vi` before the extension)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Source language code (zh, hv, th, lo, en, fr, auto, other)
    #[arg(short = 'f', long = "from")]
    pub from: Option<String>,

    /// Translation mode (smooth, literal)
    #[arg(long)]
    pub mode: Option<String>,

    /// Provider name from the config file
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// Model name
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Directory holding the prompt templates
    #[arg(long = "prompts", value_name = "DIR")]
    pub prompts_dir: Option<PathBuf>,

    /// File whose text is appended to the assistant template as a style example
    #[arg(long, value_name = "FILE")]
    pub style_example: Option<PathBuf>,

    /// JSON file of preferred renderings for names and titles
    #[arg(long, value_name = "FILE")]
    pub glossary: Option<PathBuf>,

    /// Maximum characters per chunk
    #[arg(long, value_name = "N")]
    pub max_chunk_chars: Option<usize>,

    /// Extract names and titles first and add them to the glossary
    #[arg(long)]
    pub extract_names: bool,

    /// Suppress status output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print per-chunk and per-request diagnostics
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported source language codes
    Languages,
    /// List translation modes
    Modes,
    /// Show configured providers
    Providers {
        /// Show details for one provider
        provider: Option<String>,
    },
    /// Edit default settings interactively
    Configure {
        /// Show current configuration and exit
        #[arg(long)]
        show: bool,
    },
    /// Check that every prompt template a run needs is present
    Prompts {
        /// Source language code
        #[arg(short = 'f', long = "from")]
        from: Option<String>,

        /// Translation mode
        #[arg(long)]
        mode: Option<String>,

        /// Directory holding the prompt templates
        #[arg(long = "prompts", value_name = "DIR")]
        prompts_dir: Option<PathBuf>,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_translate_flags() {
        let args = Args::try_parse_from([
            "vntl",
            "novel.txt",
            "-o",
            "out.txt",
            "-f",
            "hv",
            "--mode",
            "literal",
            "--max-chunk-chars",
            "3000",
            "-q",
        ])
        .unwrap();

        assert_eq!(args.file, Some(PathBuf::from("novel.txt")));
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
        assert_eq!(args.from.as_deref(), Some("hv"));
        assert_eq!(args.mode.as_deref(), Some("literal"));
        assert_eq!(args.max_chunk_chars, Some(3000));
        assert!(args.quiet);
        assert!(!args.extract_names);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_parse_extract_names_with_glossary() {
        let args = Args::try_parse_from([
            "vntl",
            "novel.txt",
            "--extract-names",
            "--glossary",
            "names.json",
        ])
        .unwrap();

        assert!(args.extract_names);
        assert_eq!(args.glossary, Some(PathBuf::from("names.json")));
    }

    #[test]
    fn test_parse_prompts_subcommand() {
        let args =
            Args::try_parse_from(["vntl", "prompts", "-f", "th", "--prompts", "/tmp/p"]).unwrap();

        match args.command {
            Some(Command::Prompts {
                from, prompts_dir, ..
            }) => {
                assert_eq!(from.as_deref(), Some("th"));
                assert_eq!(prompts_dir, Some(PathBuf::from("/tmp/p")));
            }
            other => panic!("expected prompts subcommand, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["vntl", "languages", "--no-color"]).unwrap();
        assert!(args.no_color);
    }

    #[test]
    fn test_max_chunk_chars_must_be_a_number() {
        assert!(Args::try_parse_from(["vntl", "--max-chunk-chars", "lots"]).is_err());
    }
}
