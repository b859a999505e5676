//! Chunk reassembler: collect secondary cookies back into the compressed blob.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, instrument};

use super::{ChunkError, ExtraStorageConfig};
use crate::jar::CookieSource;

/// Compressed credential bytes recovered from secondary cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedBlob {
    bytes: Vec<u8>,
    chunk_count: usize,
}

impl CompressedBlob {
    /// The decoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of secondary cookies the blob was read from.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Consumes the blob, returning the decoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Reads `<prefix>1`, `<prefix>2`, … from `jar` and decodes their concatenation.
///
/// Lookup stops at the first absent or empty cookie, and never goes past
/// `additional_cookies`. Cookies after a gap are stale and ignored.
///
/// # Errors
///
/// - [`ChunkError::MissingChunk`] when no chunk is present, or when the
///   chunks found end mid-way through a base64 quantum (a later chunk is gone).
/// - [`ChunkError::Decode`] when the concatenation is not valid base64.
/// - [`ChunkError::InvalidConfig`] for an unusable config.
#[instrument(level = "debug", skip(jar, cfg), fields(prefix = %cfg.cookie_prefix))]
pub fn reassemble<J>(jar: &J, cfg: &ExtraStorageConfig) -> Result<CompressedBlob, ChunkError>
where
    J: CookieSource + ?Sized,
{
    cfg.validate()?;

    let mut encoded = String::new();
    let mut chunk_count = 0;

    for (_, name) in cfg.cookie_names() {
        match jar.cookie(&name) {
            Some(value) if !value.is_empty() => {
                encoded.push_str(value);
                chunk_count += 1;
            }
            _ => break,
        }
    }

    if chunk_count == 0 {
        debug!("no secondary cookies present");
        return Err(ChunkError::MissingChunk { index: 1 });
    }

    let stale = cfg
        .cookie_names()
        .skip(chunk_count + 1)
        .filter(|(_, name)| jar.cookie(name).is_some_and(|value| !value.is_empty()))
        .count();
    if stale > 0 {
        debug!(stale, gap = chunk_count + 1, "ignoring secondary cookies past gap");
    }

    // Padded base64 always has a length divisible by 4; anything else was cut short.
    if encoded.len() % 4 != 0 && chunk_count < cfg.additional_cookies {
        debug!(
            chunk_count,
            encoded_len = encoded.len(),
            "secondary cookies end mid-quantum"
        );
        return Err(ChunkError::MissingChunk {
            index: chunk_count + 1,
        });
    }

    let bytes = STANDARD.decode(encoded.as_bytes())?;
    debug!(chunk_count, blob_len = bytes.len(), "reassembled credential");
    Ok(CompressedBlob { bytes, chunk_count })
}
