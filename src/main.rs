use clap::Parser;

use vntl::cli::commands::prompts::PromptsOptions;
use vntl::cli::commands::{configure, prompts, providers, translate};
use vntl::cli::{Args, Command};
use vntl::config::ResolveOptions;
use vntl::output::{self, OutputConfig};
use vntl::translation::{print_languages, print_modes};
use vntl::ui::Style;

#[tokio::main]
async fn main() {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    output::init(OutputConfig {
        quiet: args.quiet,
        verbose: args.verbose,
        no_color: args.no_color || std::env::var_os("NO_COLOR").is_some(),
    });

    if let Err(err) = run(args).await {
        eprintln!("{} {}", Style::error("Error:"), render_error(&err));
        std::process::exit(exit_code(&err));
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Some(Command::Languages) => print_languages(),
        Some(Command::Modes) => print_modes(),
        Some(Command::Providers { provider }) => {
            providers::print_providers(provider.as_deref())?;
        }
        Some(Command::Configure { show }) => configure::run_configure(show)?,
        Some(Command::Prompts {
            from,
            mode,
            prompts_dir,
        }) => prompts::check_prompts(PromptsOptions {
            from,
            mode,
            prompts_dir,
        })?,
        None => {
            let options = translate::TranslateOptions {
                file: args.file,
                output: args.output,
                extract_names: args.extract_names,
                resolve: ResolveOptions {
                    provider: args.provider,
                    model: args.model,
                    from: args.from,
                    mode: args.mode,
                    prompts_dir: args.prompts_dir,
                    style_example: args.style_example,
                    glossary: args.glossary,
                    max_chunk_chars: args.max_chunk_chars,
                },
            };
            translate::run_translate(options).await?;
        }
    }

    Ok(())
}

/// Exit code for failures outside the translation core.
const GENERIC_FAILURE: exitcode::ExitCode = 1;

/// Maps core errors to sysexits codes; anything else is a generic failure.
fn exit_code(err: &anyhow::Error) -> exitcode::ExitCode {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<vntl::Error>())
        .map_or(GENERIC_FAILURE, vntl::Error::exit_code)
}

/// Joins the error chain, skipping causes whose text is already shown.
fn render_error(err: &anyhow::Error) -> String {
    let mut message = err.to_string();
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_their_exit_code() {
        let err = anyhow::Error::from(vntl::Error::InvalidConfiguration("bad".to_string()))
            .context("while resolving");
        assert_eq!(exit_code(&err), exitcode::CONFIG);
    }

    #[test]
    fn test_other_errors_exit_with_one() {
        let err = anyhow::anyhow!("prompt was interrupted");
        assert_eq!(exit_code(&err), 1);
        assert_ne!(exit_code(&err), exitcode::SOFTWARE);
    }

    #[test]
    fn test_render_error_skips_repeated_causes() {
        let err = anyhow::anyhow!("disk full").context("Failed to save config: disk full");
        assert_eq!(render_error(&err), "Failed to save config: disk full");
    }
}
