//! Chunk splitter: encode a compressed blob and partition it over cookies.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, instrument, warn};

use super::{ChunkError, ExtraStorageConfig};

/// One contiguous slice of the encoded credential and the cookie that holds it.
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position of this chunk.
    pub index: usize,
    /// Secondary cookie name (`<prefix><index>`).
    pub name: String,
    /// Encoded slice (sensitive, never logged).
    value: String,
}

impl Chunk {
    /// Returns the encoded slice.
    ///
    /// Chunk values are credential material; do not log the return value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the chunk, returning `(name, value)`.
    #[must_use]
    pub fn into_pair(self) -> (String, String) {
        (self.name, self.value)
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("len", &self.value.len())
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Outcome of [`split`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkPlan {
    /// The encoded blob fits the primary budget; no secondary cookies needed.
    Inline(String),
    /// The encoded blob was partitioned into secondary cookies, in index order.
    Split(Vec<Chunk>),
}

/// Base64 encodes a compressed blob into a cookie-safe string.
#[must_use]
pub fn encode_blob(blob: &[u8]) -> String {
    STANDARD.encode(blob)
}

/// Encodes `blob` and decides whether it must be split.
///
/// If the encoded string fits `primary_budget` it is returned as
/// [`ChunkPlan::Inline`]; otherwise it is partitioned with [`partition`].
///
/// # Errors
///
/// Returns [`ChunkError::InvalidConfig`] for an unusable config and
/// [`ChunkError::Capacity`] when more than `additional_cookies` chunks are needed.
#[instrument(level = "debug", skip(blob, cfg), fields(blob_len = blob.len(), prefix = %cfg.cookie_prefix))]
pub fn split(
    blob: &[u8],
    primary_budget: usize,
    cfg: &ExtraStorageConfig,
) -> Result<ChunkPlan, ChunkError> {
    cfg.validate()?;

    let encoded = encode_blob(blob);
    if encoded.len() <= primary_budget {
        debug!(
            encoded_len = encoded.len(),
            primary_budget, "encoded credential fits primary cookie"
        );
        return Ok(ChunkPlan::Inline(encoded));
    }

    partition(&encoded, cfg).map(ChunkPlan::Split)
}

/// Partitions an encoded string into `chunk_size` slices named `<prefix>1..N`.
///
/// The slices are contiguous and non-overlapping; concatenating their values
/// in index order yields `encoded`.
///
/// # Errors
///
/// Returns [`ChunkError::InvalidConfig`] for an unusable config,
/// [`ChunkError::NotAscii`] when `encoded` holds non-ASCII characters and
/// [`ChunkError::Capacity`] when more than `additional_cookies` chunks are needed.
pub fn partition(encoded: &str, cfg: &ExtraStorageConfig) -> Result<Vec<Chunk>, ChunkError> {
    cfg.validate()?;

    if !encoded.is_ascii() {
        warn!(
            encoded_len = encoded.len(),
            "refusing to partition non-ASCII credential text"
        );
        return Err(ChunkError::NotAscii);
    }

    let required = encoded.len().div_ceil(cfg.chunk_size);
    if required > cfg.additional_cookies {
        warn!(
            required,
            allowed = cfg.additional_cookies,
            prefix = %cfg.cookie_prefix,
            "credential does not fit the configured secondary cookies"
        );
        return Err(ChunkError::Capacity {
            required,
            allowed: cfg.additional_cookies,
        });
    }

    // ASCII checked above: every byte boundary is a char boundary.
    let chunks = encoded
        .as_bytes()
        .chunks(cfg.chunk_size)
        .enumerate()
        .map(|(offset, bytes)| {
            let index = offset + 1;
            let value = std::str::from_utf8(bytes).map_err(|_| ChunkError::NotAscii)?;
            Ok(Chunk {
                index,
                name: cfg.cookie_name(index),
                value: value.to_string(),
            })
        })
        .collect::<Result<Vec<Chunk>, ChunkError>>()?;

    debug!(
        chunks = chunks.len(),
        encoded_len = encoded.len(),
        chunk_size = cfg.chunk_size,
        "partitioned credential"
    );
    Ok(chunks)
}
