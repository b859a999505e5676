//! CLI command handlers.

mod config;
mod decode;
mod encode;

use anyhow::{Context, Result};
use auth_cookie_codec::CredentialCookieConfig;

use crate::app_config::{LoadedConfig, load_file_config_or_default};
use crate::cli::Cli;

pub use config::run_config_command;
pub use decode::run_decode_command;
pub use encode::run_encode_command;

/// Effective configuration after layering defaults, config file and CLI flags.
pub struct ResolvedConfig {
    /// Where the config file came from.
    pub loaded: LoadedConfig,
    /// Validated library config.
    pub config: CredentialCookieConfig,
}

/// Resolves the effective config for `cli`.
///
/// Priority: CLI flags > config file > built-in defaults.
pub fn resolve_config(cli: &Cli) -> Result<ResolvedConfig> {
    let loaded = load_file_config_or_default(cli.config.as_deref())?;

    let mut config = CredentialCookieConfig::default();
    if let Some(file) = &loaded.config {
        file.apply_to(&mut config);
    }

    let storage = &cli.storage;
    if let Some(prefix) = &storage.cookie_prefix {
        config.extra_storage.cookie_prefix.clone_from(prefix);
    }
    if let Some(additional_cookies) = storage.additional_cookies {
        config.extra_storage.additional_cookies = usize::from(additional_cookies);
    }
    if let Some(chunk_size) = storage.chunk_size {
        config.extra_storage.chunk_size = usize::from(chunk_size);
    }
    if let Some(primary_budget) = storage.primary_budget {
        config.primary_budget = usize::from(primary_budget);
    }

    config
        .validate()
        .context("Invalid credential cookie configuration")?;
    Ok(ResolvedConfig { loaded, config })
}
