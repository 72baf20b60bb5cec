//! relgate CLI — the main entry point.
//!
//! Commands:
//! - `decide`   — Gather release facts and ask for a verdict
//! - `serve`    — Run the tool gateway over stdin/stdout
//! - `tools`    — Print the tool discovery listing
//! - `inspect`  — Run one extractor locally
//!
//! Logs always go to stderr; stdout carries results only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser)]
#[command(
    name = "relgate",
    about = "relgate — CI release gate for test, coverage and security artifacts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./relgate.toml)
    #[arg(short, long, global = true, env = "RELGATE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether the build in an artifacts directory may ship
    Decide {
        /// Directory holding the CI artifacts
        #[arg(long)]
        artifacts: PathBuf,

        /// Repository root the security config path is relative to
        #[arg(long)]
        repo_root: PathBuf,
    },

    /// Serve the extractor tools over stdio (JSON-RPC)
    Serve,

    /// Print the tool discovery listing as JSON
    Tools,

    /// Run one extractor on a local file and print its record
    Inspect {
        #[arg(value_enum)]
        kind: commands::inspect::Kind,

        /// File to read
        path: PathBuf,

        /// Lines kept per category when inspecting logs
        #[arg(long, default_value_t = relgate_extractors::DEFAULT_MAX_LINES)]
        max_lines: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Decide {
            artifacts,
            repo_root,
        } => commands::decide::run(config, &artifacts, &repo_root).await,
        Commands::Serve => commands::serve::run(config).await,
        Commands::Tools => commands::tools::run().await,
        Commands::Inspect {
            kind,
            path,
            max_lines,
        } => commands::inspect::run(kind, &path, max_lines).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
