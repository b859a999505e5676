//! Request-time construction of the `Authorization` header.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{CredentialError, SessionCredential};
use crate::chunk::{ChunkError, ExtraStorageConfig, reassemble};
use crate::codec::{self, CodecError};
use crate::jar::CookieSource;

/// Name of the header produced by [`build_auth_header`].
pub const AUTHORIZATION: &str = "authorization";

/// The `Authorization` header to forward to the protected backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthHeader {
    authorization: String,
}

impl AuthHeader {
    /// Wraps a header value.
    #[must_use]
    pub fn new(authorization: impl Into<String>) -> Self {
        Self {
            authorization: authorization.into(),
        }
    }

    /// Header name (always `authorization`).
    #[must_use]
    pub fn header_name(&self) -> &'static str {
        AUTHORIZATION
    }

    /// Header value.
    ///
    /// This is the credential itself; do not log the return value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.authorization
    }

    /// Consumes the header, returning its value.
    #[must_use]
    pub fn into_value(self) -> String {
        self.authorization
    }
}

impl fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHeader")
            .field("authorization", &"[REDACTED]")
            .finish()
    }
}

/// Builds the `Authorization` header from the session credential.
///
/// An inline credential is returned verbatim without touching the jar. A
/// split marker triggers reassembly of the secondary cookies followed by
/// inflation.
///
/// # Errors
///
/// Returns [`CredentialError`] when the split credential cannot be rebuilt:
/// a missing chunk (including data that ends early because a later chunk is
/// gone), malformed base64, or a corrupt compressed payload. Callers must
/// treat any error as "no credential available" and never forward a partial
/// header.
#[instrument(level = "debug", skip_all, fields(split = credential.is_split()))]
pub fn build_auth_header<J>(
    credential: &SessionCredential,
    jar: &J,
    cfg: &ExtraStorageConfig,
) -> Result<AuthHeader, CredentialError>
where
    J: CookieSource + ?Sized,
{
    match credential {
        SessionCredential::Inline(value) => {
            debug!("using inline credential");
            Ok(AuthHeader::new(value.as_str()))
        }
        SessionCredential::Split => rebuild_split_credential(jar, cfg)
            .map(AuthHeader::new)
            .inspect_err(|error| {
                warn!(
                    error = %error,
                    prefix = %cfg.cookie_prefix,
                    "unable to rebuild credential from secondary cookies"
                );
            }),
    }
}

fn rebuild_split_credential<J>(jar: &J, cfg: &ExtraStorageConfig) -> Result<String, CredentialError>
where
    J: CookieSource + ?Sized,
{
    let blob = reassemble(jar, cfg)?;

    match codec::decompress(blob.as_bytes()) {
        Ok(credential) => {
            debug!(chunks = blob.chunk_count(), "rebuilt split credential");
            Ok(credential)
        }
        // The stream stopped early while more cookies were allowed: a chunk after
        // the last one found is gone.
        Err(CodecError::Truncated) if blob.chunk_count() < cfg.additional_cookies => {
            Err(ChunkError::MissingChunk {
                index: blob.chunk_count() + 1,
            }
            .into())
        }
        Err(error) => Err(error.into()),
    }
}
