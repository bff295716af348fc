//! zenoh CLI Binary
//!
//! Parses arguments, sets up logging and codecs, opens the session and
//! dispatches the subcommand.

use std::process;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};
use zenoh_cli::cli::Cli;
use zenoh_cli::commands;
use zenoh_cli::{CliError, ZenohSession};

fn main() {
    let cli = Cli::parse();

    init_logging(cli.log_level);
    tracing::debug!("zenoh-cli v{}", zenoh_cli::VERSION);

    if let Err(e) = run(&cli) {
        tracing::debug!("Exiting after error: {:?}", e);
        eprintln!("error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let codecs = zenoh_cli::build_registry(!cli.no_plugins);

    if !cli.command.needs_session() {
        return commands::dispatch_local(&codecs, &cli.command);
    }

    let session = ZenohSession::open(&cli.session_config())?;
    let result = commands::dispatch(&session, &codecs, &cli.command);

    if let Err(e) = session.close() {
        tracing::warn!("Failed to close session cleanly: {}", e);
    }

    result
}

/// Log to stderr; stdout carries command output
///
/// RUST_LOG wins when set. Otherwise the bus library only reports errors.
fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{level},zenoh=error,zenoh_cli={level}", level = level))
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
