//! CLI entry point for the auth-cookie tool.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app_config;
mod cli;
mod commands;

use cli::{Cli, Command};

fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stdout carries command output only
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    // Command arguments may hold a credential, so only the layout is logged.
    debug!(storage = ?cli.storage, config = ?cli.config, "CLI arguments parsed");

    let resolved = commands::resolve_config(&cli)?;

    match &cli.command {
        Command::Encode {
            credential,
            cookie_header,
        } => commands::run_encode_command(
            credential.as_deref(),
            cookie_header.as_deref(),
            &resolved.config,
        ),
        Command::Decode {
            cookie_header,
            session,
        } => commands::run_decode_command(cookie_header, session.as_deref(), &resolved.config),
        Command::Config => commands::run_config_command(&resolved),
    }
}
