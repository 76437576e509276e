// relpub CLI - idempotent release publisher.

mod exit_codes;
mod publish;

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use exit_codes::EXIT_SUCCESS;

/// Error carrying an exit code, a message, and an optional hint.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self {
            code: exit_codes::EXIT_USAGE,
            message: message.into(),
            hint: None,
        }
    }
}

#[derive(Parser)]
#[command(name = "relpub")]
#[command(about = "Publish a tagged release and attach files as assets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create (or adopt) a tagged release and reconcile assets onto it
    #[command(after_help = "\
Examples:
  relpub publish acme/tool v1.2.0 dist/tool-*.tar.gz
  relpub publish acme/tool v1.2.0 --target main --notes 'First stable cut' dist/*
  GITHUB_TOKEN=... relpub publish acme/tool v1.2.0 --draft build/tool.zip

Re-running the same publish is safe: assets that already exist with the
correct size are left untouched, truncated ones are replaced.

Environment variables:
  GITHUB_TOKEN  API token used for every call (or pass --token)
  GITHUB_API    API endpoint base (default https://api.github.com)
  RELPUB_DEBUG  set to true to dump request/response traffic")]
    Publish {
        /// Repository as owner/repo
        repo: String,

        /// Tag to release; also used as the release's name
        tag: String,

        /// Files (or glob patterns) to attach as assets, in order
        #[arg(required = true)]
        files: Vec<String>,

        /// Branch or commit to create the tag from if it does not exist
        #[arg(long, default_value = "main")]
        target: String,

        /// Release body text
        #[arg(long, default_value = "")]
        notes: String,

        /// Save as draft, don't publish
        #[arg(long)]
        draft: bool,

        /// Mark the release as a prerelease
        #[arg(long)]
        prerelease: bool,

        /// API token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// API endpoint base
        #[arg(long, env = "GITHUB_API", default_value = relpub_github_client::DEFAULT_API_BASE)]
        api_base: String,

        /// Upload retry budget per file
        #[arg(long, default_value_t = 5)]
        retry_limit: u32,

        /// Summary format (default: json when stdout is not a TTY)
        #[arg(long)]
        output: Option<OutputFormat>,

        /// Suppress progress output on stderr
        #[arg(long)]
        quiet: bool,

        /// Dump request/response traffic
        #[arg(long, env = "RELPUB_DEBUG")]
        debug: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Publish {
            repo,
            tag,
            files,
            target,
            notes,
            draft,
            prerelease,
            token,
            api_base,
            retry_limit,
            output,
            quiet,
            debug,
        } => publish::cmd_publish(
            repo,
            tag,
            files,
            target,
            notes,
            draft,
            prerelease,
            token,
            api_base,
            retry_limit,
            output,
            quiet,
            debug,
        ),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(e.code)
        }
    }
}
