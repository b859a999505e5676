//! Configuration for storing credentials in cookies.
//!
//! Mirrors the `extra_storage` block of the auth plugin config:
//!
//! ```json
//! {
//!   "session_cookie_name": "security_authentication",
//!   "primary_budget": 4000,
//!   "extra_storage": { "cookie_prefix": "security_authentication_proxy", "additional_cookies": 5 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::chunk::{ChunkError, DEFAULT_CHUNK_SIZE, ExtraStorageConfig, MAX_COOKIE_BYTES};
use crate::jar::{CookieAttributes, is_cookie_name};

/// Default name of the primary session cookie.
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "security_authentication";

/// Default number of credential characters the primary cookie may hold inline.
pub const DEFAULT_PRIMARY_BUDGET: usize = DEFAULT_CHUNK_SIZE;

/// Errors raised while loading or validating [`CredentialCookieConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config JSON could not be parsed.
    #[error("invalid credential cookie config: {0}")]
    Json(#[from] serde_json::Error),

    /// The primary cookie name is not a valid cookie name.
    #[error("session_cookie_name '{0}' is not a valid cookie name")]
    SessionCookieName(String),

    /// The primary budget is outside `1..=MAX_COOKIE_BYTES`.
    #[error("primary_budget must be between 1 and {MAX_COOKIE_BYTES}, got {0}")]
    PrimaryBudget(usize),

    /// Secondary cookie names would shadow the primary cookie.
    #[error("cookie_prefix '{prefix}' produces names that collide with session cookie '{session}'")]
    PrefixCollision {
        /// Configured secondary prefix.
        prefix: String,
        /// Configured session cookie name.
        session: String,
    },

    /// The `extra_storage` block is invalid.
    #[error(transparent)]
    ExtraStorage(#[from] ChunkError),
}

/// Everything needed to store and read a credential across cookies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialCookieConfig {
    /// Name of the primary session cookie.
    ///
    /// The session layer owns this cookie's payload. Here the name is looked
    /// up by [`SessionCookie::from_jar`](crate::SessionCookie::from_jar) and
    /// checked against secondary cookie names, which must never shadow it.
    pub session_cookie_name: String,
    /// Longest credential stored inline in the primary cookie.
    pub primary_budget: usize,
    /// Secondary cookie layout.
    pub extra_storage: ExtraStorageConfig,
    /// Attributes for every cookie written.
    pub attributes: CookieAttributes,
}

impl Default for CredentialCookieConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            primary_budget: DEFAULT_PRIMARY_BUDGET,
            extra_storage: ExtraStorageConfig::default(),
            attributes: CookieAttributes::default(),
        }
    }
}

impl CredentialCookieConfig {
    /// Parses and validates a JSON config; absent keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed JSON or invalid values.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every field.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_cookie_name(&self.session_cookie_name) {
            return Err(ConfigError::SessionCookieName(
                self.session_cookie_name.clone(),
            ));
        }
        if !(1..=MAX_COOKIE_BYTES).contains(&self.primary_budget) {
            return Err(ConfigError::PrimaryBudget(self.primary_budget));
        }
        self.extra_storage.validate()?;

        let collides = self
            .extra_storage
            .cookie_names()
            .any(|(_, name)| name == self.session_cookie_name);
        if collides {
            return Err(ConfigError::PrefixCollision {
                prefix: self.extra_storage.cookie_prefix.clone(),
                session: self.session_cookie_name.clone(),
            });
        }
        Ok(())
    }
}
