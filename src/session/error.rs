//! Error types for session credentials.

use thiserror::Error;

use crate::chunk::ChunkError;
use crate::codec::CodecError;

/// Errors raised while building or storing a credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Splitting or reassembling secondary cookies failed.
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// Compressing or inflating the credential failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl CredentialError {
    /// Returns true when the request must be treated as carrying no credential.
    ///
    /// Capacity, config and non-ASCII input errors happen on the write side and mean the
    /// deployment is misconfigured rather than the request unauthenticated.
    #[must_use]
    pub fn is_credential_unavailable(&self) -> bool {
        match self {
            Self::Chunk(ChunkError::MissingChunk { .. } | ChunkError::Decode(_)) => true,
            Self::Chunk(
                ChunkError::Capacity { .. }
                | ChunkError::InvalidConfig { .. }
                | ChunkError::NotAscii,
            ) => false,
            Self::Codec(CodecError::Compress(_)) => false,
            Self::Codec(_) => true,
        }
    }
}

/// Errors raised while reading the primary session cookie.
#[derive(Debug, Error)]
pub enum SessionCookieError {
    /// The cookie is not valid JSON or has the wrong shape.
    #[error("invalid session cookie: {0}")]
    Json(#[from] serde_json::Error),

    /// Both an inline value and the split marker are present.
    #[error("session credentials carry both authHeaderValue and authHeaderValueExtra")]
    AmbiguousCredential,

    /// The request carries no cookie with the configured session name.
    #[error("session cookie '{name}' is not present")]
    Absent {
        /// Configured session cookie name.
        name: String,
    },

    /// Neither an inline value nor the split marker is present.
    #[error("session credentials carry neither authHeaderValue nor authHeaderValueExtra")]
    MissingCredential,
}
