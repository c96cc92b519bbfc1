mod commands;
mod error;
mod http;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{analytics, call, completions, mask, serve, Context};
use crate::error::{exit_code_for, report_error};
use holdline_config as config;
use holdline_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(
    name = "holdline",
    version,
    about = "Call-center webhooks, hold music and privacy-preserving caller analytics"
)]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the webhook and dashboard server
    Serve(serve::ServeArgs),
    /// Show the join key and masked display for a caller number
    Mask(mask::MaskArgs),
    /// Print the dashboard figures from the local database
    Analytics(analytics::AnalyticsArgs),
    /// Show one stored call by its sid
    ShowCall(call::ShowCallArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose, matches!(cli.command, Command::Serve(_)));
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    if let Command::Completions(args) = command {
        return completions::emit(args);
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }
    let ctx = Context {
        json,
        config: &app_config,
    };

    if let Command::Mask(args) = command {
        return mask::mask(&ctx, args);
    }

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");
    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;

    match command {
        Command::Serve(args) => serve::serve(&app_config, store, args),
        Command::Analytics(args) => analytics::analytics(&ctx, &store, args),
        Command::ShowCall(args) => call::show_call(&ctx, &store, args),
        Command::Mask(_) => unreachable!("mask command handled before store initialization"),
        Command::Completions(_) => {
            unreachable!("completions command handled before store initialization")
        }
    }
}

fn init_logging(verbose: bool, serving: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = match (verbose, serving) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
