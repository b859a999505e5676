//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use auth_cookie_codec::chunk::MAX_COOKIE_BYTES;
use auth_cookie_codec::{CredentialCookieConfig, SameSite, parse_same_site};

/// TOML-style `key = value` file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Primary session cookie name.
    pub session_cookie_name: Option<String>,
    /// Longest credential stored inline.
    pub primary_budget: Option<usize>,
    /// Secondary cookie name prefix.
    pub cookie_prefix: Option<String>,
    /// Maximum number of secondary cookies.
    pub additional_cookies: Option<usize>,
    /// Encoded characters per secondary cookie.
    pub chunk_size: Option<usize>,
    /// Cookie `Path` attribute.
    pub path: Option<String>,
    /// Cookie `Domain` attribute.
    pub domain: Option<String>,
    /// Cookie `Secure` flag.
    pub secure: Option<bool>,
    /// Cookie `HttpOnly` flag.
    pub http_only: Option<bool>,
    /// Cookie `SameSite` attribute.
    pub same_site: Option<SameSite>,
}

impl FileConfig {
    /// Validates numeric ranges before values reach the library config.
    pub fn validate(&self) -> Result<()> {
        validate_cookie_bytes("primary_budget", self.primary_budget)?;
        validate_cookie_bytes("chunk_size", self.chunk_size)?;

        if let Some(additional_cookies) = self.additional_cookies.filter(|count| *count > 100) {
            bail!(
                "Invalid config value for `additional_cookies`: {additional_cookies}. Expected range: 0..=100"
            );
        }
        Ok(())
    }

    /// Overlays the values present in this file onto `config`.
    pub fn apply_to(&self, config: &mut CredentialCookieConfig) {
        if let Some(name) = &self.session_cookie_name {
            config.session_cookie_name.clone_from(name);
        }
        if let Some(primary_budget) = self.primary_budget {
            config.primary_budget = primary_budget;
        }
        if let Some(prefix) = &self.cookie_prefix {
            config.extra_storage.cookie_prefix.clone_from(prefix);
        }
        if let Some(additional_cookies) = self.additional_cookies {
            config.extra_storage.additional_cookies = additional_cookies;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.extra_storage.chunk_size = chunk_size;
        }
        if let Some(path) = &self.path {
            config.attributes.path.clone_from(path);
        }
        if let Some(domain) = &self.domain {
            config.attributes.domain = Some(domain.clone());
        }
        if let Some(secure) = self.secure {
            config.attributes.secure = secure;
        }
        if let Some(http_only) = self.http_only {
            config.attributes.http_only = http_only;
        }
        if let Some(same_site) = self.same_site {
            config.attributes.same_site = Some(same_site);
        }
    }
}

fn validate_cookie_bytes(field: &str, value: Option<usize>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=MAX_COOKIE_BYTES).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..={MAX_COOKIE_BYTES}");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/auth-cookie/config.toml`
/// 2. `$HOME/.config/auth-cookie/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("auth-cookie")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("auth-cookie")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from an explicit path, or from the default path if present.
///
/// An explicit path must exist; a missing default file means defaults apply.
pub fn load_file_config_or_default(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
            loaded_from_file: true,
        });
    }

    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_number = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_number}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();

        match key {
            "session_cookie_name" => {
                cfg.session_cookie_name = Some(parse_string_literal(value).with_context(|| {
                    format!("Invalid `session_cookie_name` value on line {line_number}")
                })?);
            }
            "primary_budget" => {
                cfg.primary_budget = Some(parse_integer_usize(value).with_context(|| {
                    format!("Invalid `primary_budget` value on line {line_number}")
                })?);
            }
            "cookie_prefix" => {
                cfg.cookie_prefix = Some(parse_string_literal(value).with_context(|| {
                    format!("Invalid `cookie_prefix` value on line {line_number}")
                })?);
            }
            "additional_cookies" => {
                cfg.additional_cookies = Some(parse_integer_usize(value).with_context(|| {
                    format!("Invalid `additional_cookies` value on line {line_number}")
                })?);
            }
            "chunk_size" => {
                cfg.chunk_size = Some(parse_integer_usize(value).with_context(|| {
                    format!("Invalid `chunk_size` value on line {line_number}")
                })?);
            }
            "path" => {
                cfg.path = Some(parse_string_literal(value).with_context(|| {
                    format!("Invalid `path` value on line {line_number}")
                })?);
            }
            "domain" => {
                cfg.domain = Some(parse_string_literal(value).with_context(|| {
                    format!("Invalid `domain` value on line {line_number}")
                })?);
            }
            "secure" => {
                cfg.secure = Some(parse_boolean(value).with_context(|| {
                    format!("Invalid `secure` value on line {line_number}")
                })?);
            }
            "http_only" => {
                cfg.http_only = Some(parse_boolean(value).with_context(|| {
                    format!("Invalid `http_only` value on line {line_number}")
                })?);
            }
            "same_site" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `same_site` value on line {line_number}")
                })?;
                let Some(same_site) = parse_same_site(&parsed) else {
                    bail!(
                        "Invalid `same_site` value '{parsed}' on line {line_number}: expected one of: strict, lax, none"
                    );
                };
                cfg.same_site = Some(same_site);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_number}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    let Some(inner) = raw_value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        bail!("Expected double-quoted string");
    };
    Ok(inner.to_string())
}

fn parse_integer_usize(raw_value: &str) -> Result<usize> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    usize::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range"))
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected 'true' or 'false'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
cookie_prefix = "testcookie"
additional_cookies = 5
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.cookie_prefix.as_deref(), Some("testcookie"));
        assert_eq!(cfg.additional_cookies, Some(5));
        assert!(cfg.chunk_size.is_none());
    }

    #[test]
    fn test_parse_config_all_fields() {
        let cfg = parse_config_str(
            r#"
session_cookie_name = "session"
primary_budget = 3000
cookie_prefix = "extra"
additional_cookies = 8
chunk_size = 3500
path = "/app"
domain = ".example.com"
secure = false
http_only = true
same_site = "strict"
"#,
        )
        .expect("full config should parse");
        assert_eq!(cfg.session_cookie_name.as_deref(), Some("session"));
        assert_eq!(cfg.primary_budget, Some(3000));
        assert_eq!(cfg.chunk_size, Some(3500));
        assert_eq!(cfg.path.as_deref(), Some("/app"));
        assert_eq!(cfg.domain.as_deref(), Some(".example.com"));
        assert_eq!(cfg.secure, Some(false));
        assert_eq!(cfg.http_only, Some(true));
        assert_eq!(cfg.same_site, Some(SameSite::Strict));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r#"
additional_cookies = 3 # fan-out
cookie_prefix = "with#hash" # quoted hash is kept
"#,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.additional_cookies, Some(3));
        assert_eq!(cfg.cookie_prefix.as_deref(), Some("with#hash"));
    }

    #[test]
    fn test_parse_config_rejects_chunk_size_over_cookie_limit() {
        let err = parse_config_str("chunk_size = 5000").expect_err("oversized chunk expected");
        assert!(err.to_string().contains("chunk_size"));
    }

    #[test]
    fn test_parse_config_rejects_zero_primary_budget() {
        let err = parse_config_str("primary_budget = 0").expect_err("zero budget expected");
        assert!(err.to_string().contains("primary_budget"));
    }

    #[test]
    fn test_parse_config_rejects_negative_integer() {
        let err = parse_config_str("additional_cookies = -1").expect_err("negative expected");
        assert!(err.to_string().contains("additional_cookies"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("cookie_prefix = bare").expect_err("unquoted expected");
        assert!(err.to_string().contains("cookie_prefix"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_same_site() {
        let err = parse_config_str(r#"same_site = "sometimes""#).expect_err("invalid same_site");
        assert!(err.to_string().contains("same_site"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_boolean() {
        let err = parse_config_str("secure = yes").expect_err("invalid boolean expected");
        assert!(err.to_string().contains("secure"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("cookie_prefix").expect_err("syntax error expected");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("unknown_key = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("unknown_key"));
    }

    #[test]
    fn test_apply_to_overrides_only_present_fields() {
        let file = FileConfig {
            cookie_prefix: Some("extra".to_string()),
            additional_cookies: Some(2),
            secure: Some(false),
            ..FileConfig::default()
        };
        let mut config = CredentialCookieConfig::default();
        file.apply_to(&mut config);

        assert_eq!(config.extra_storage.cookie_prefix, "extra");
        assert_eq!(config.extra_storage.additional_cookies, 2);
        assert!(!config.attributes.secure);
        assert_eq!(config.primary_budget, 4000);
        assert_eq!(config.session_cookie_name, "security_authentication");
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("absent.toml");
        assert!(load_file_config_or_default(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "additional_cookies = 7\n").unwrap();

        let loaded = load_file_config_or_default(Some(&path)).unwrap();
        assert!(loaded.loaded_from_file);
        assert_eq!(loaded.config.unwrap().additional_cookies, Some(7));
    }
}
