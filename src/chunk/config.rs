//! Secondary-cookie configuration.

use serde::{Deserialize, Serialize};

use super::ChunkError;
use crate::jar::is_cookie_name;

/// Default prefix for secondary cookie names.
pub const DEFAULT_COOKIE_PREFIX: &str = "security_authentication_proxy";

/// Default number of secondary cookies a credential may occupy.
pub const DEFAULT_ADDITIONAL_COOKIES: usize = 5;

/// Default number of encoded characters per secondary cookie.
pub const DEFAULT_CHUNK_SIZE: usize = 4000;

/// Per-cookie ceiling enforced by browsers, counted over `name=value`.
pub const MAX_COOKIE_BYTES: usize = 4096;

/// Where and how many secondary cookies hold a split credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraStorageConfig {
    /// Secondary cookies are named `<cookie_prefix><index>`, index from 1.
    pub cookie_prefix: String,
    /// Upper bound on the number of secondary cookies.
    #[serde(alias = "additional_cookie_count")]
    pub additional_cookies: usize,
    /// Encoded characters stored in each secondary cookie.
    pub chunk_size: usize,
}

impl Default for ExtraStorageConfig {
    fn default() -> Self {
        Self {
            cookie_prefix: DEFAULT_COOKIE_PREFIX.to_string(),
            additional_cookies: DEFAULT_ADDITIONAL_COOKIES,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ExtraStorageConfig {
    /// Creates a config with the default chunk size.
    #[must_use]
    pub fn new(cookie_prefix: impl Into<String>, additional_cookies: usize) -> Self {
        Self {
            cookie_prefix: cookie_prefix.into(),
            additional_cookies,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Overrides the chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Name of the secondary cookie holding chunk `index` (1-based).
    #[must_use]
    pub fn cookie_name(&self, index: usize) -> String {
        format!("{}{index}", self.cookie_prefix)
    }

    /// Iterates every secondary cookie name in index order.
    pub fn cookie_names(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        (1..=self.additional_cookies).map(|index| (index, self.cookie_name(index)))
    }

    /// Checks that the prefix forms valid cookie names and the chunk size is usable.
    ///
    /// A full chunk under the longest secondary name, as `name=value`, must
    /// stay within [`MAX_COOKIE_BYTES`].
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.cookie_prefix.is_empty() {
            return Err(ChunkError::InvalidConfig {
                reason: "cookie_prefix is empty".to_string(),
            });
        }
        if !is_cookie_name(&self.cookie_prefix) {
            return Err(ChunkError::InvalidConfig {
                reason: format!(
                    "cookie_prefix '{}' contains characters not allowed in a cookie name",
                    self.cookie_prefix
                ),
            });
        }
        if self.chunk_size == 0 {
            return Err(ChunkError::InvalidConfig {
                reason: "chunk_size must be greater than zero".to_string(),
            });
        }
        let longest_name = self.cookie_name(self.additional_cookies.max(1));
        let cookie_bytes = longest_name.len() + 1 + self.chunk_size;
        if cookie_bytes > MAX_COOKIE_BYTES {
            return Err(ChunkError::InvalidConfig {
                reason: format!(
                    "chunk_size {} under cookie name '{longest_name}' needs {cookie_bytes} bytes, over the {MAX_COOKIE_BYTES}-byte cookie limit",
                    self.chunk_size
                ),
            });
        }
        Ok(())
    }
}
