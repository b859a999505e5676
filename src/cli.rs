//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Store and rebuild `Authorization` credentials in browser cookies.
///
/// Credentials that do not fit a single cookie are compressed, base64
/// encoded and split across numbered secondary cookies.
#[derive(Parser, Debug)]
#[command(name = "auth-cookie")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (defaults to $XDG_CONFIG_HOME/auth-cookie/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Cookie layout overrides applied on top of the config file.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageArgs {
    /// Secondary cookie name prefix
    #[arg(long, global = true)]
    pub cookie_prefix: Option<String>,

    /// Maximum number of secondary cookies (0-100)
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub additional_cookies: Option<u8>,

    /// Encoded characters per secondary cookie (name=value must fit 4096 bytes)
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..=4096))]
    pub chunk_size: Option<u16>,

    /// Longest credential kept inline in the session cookie (1-4096)
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..=4096))]
    pub primary_budget: Option<u16>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store a credential and print the resulting cookies
    Encode {
        /// Credential to store; reads stdin when absent or `-`
        credential: Option<String>,

        /// Current `Cookie` request header, used to clear stale secondary cookies
        #[arg(long, value_name = "HEADER")]
        cookie_header: Option<String>,
    },
    /// Rebuild the Authorization header from request cookies
    Decode {
        /// Raw `Cookie` request header
        #[arg(long, value_name = "HEADER")]
        cookie_header: String,

        /// Session cookie JSON holding `credentials`; read from the session
        /// cookie in `--cookie-header` when absent
        #[arg(long, value_name = "JSON")]
        session: Option<String>,
    },
    /// Show the effective configuration
    Config,
}
