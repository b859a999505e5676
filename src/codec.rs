//! zlib compression for credential values.
//!
//! Credentials are deflated before they are base64 encoded and chunked across
//! cookies. Inflation is bounded so a forged cookie cannot expand into an
//! arbitrarily large allocation.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use tracing::{debug, instrument};

/// Upper bound on the size of an inflated credential (64 KiB).
pub const MAX_INFLATED_LEN: usize = 64 * 1024;

/// Output buffer growth step while inflating.
const INFLATE_STEP: usize = 4096;

/// Errors produced by the compression codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The deflate encoder failed to write its output.
    #[error("failed to compress credential: {0}")]
    Compress(#[source] std::io::Error),

    /// The compressed payload is not a valid zlib stream.
    #[error("compressed credential is corrupt")]
    Corrupt,

    /// The zlib stream ended before its end marker.
    #[error("compressed credential is truncated")]
    Truncated,

    /// The inflated payload exceeds the configured bound.
    #[error("inflated credential exceeds {max} bytes")]
    TooLarge {
        /// Maximum number of inflated bytes accepted.
        max: usize,
    },

    /// The inflated payload is not valid UTF-8.
    #[error("inflated credential is not valid UTF-8")]
    InvalidUtf8,
}

/// Compresses a credential string into a zlib stream.
///
/// # Errors
///
/// Returns [`CodecError::Compress`] if the encoder fails to flush.
#[instrument(level = "debug", skip(plain), fields(plain_len = plain.len()))]
pub fn compress(plain: &str) -> Result<Vec<u8>, CodecError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(plain.as_bytes())
        .map_err(CodecError::Compress)?;
    let compressed = encoder.finish().map_err(CodecError::Compress)?;
    debug!(compressed_len = compressed.len(), "compressed credential");
    Ok(compressed)
}

/// Inflates a zlib stream produced by [`compress`] back into the credential.
///
/// # Errors
///
/// Returns [`CodecError::Corrupt`] on invalid zlib data,
/// [`CodecError::Truncated`] when the stream ends early,
/// [`CodecError::TooLarge`] past [`MAX_INFLATED_LEN`], and
/// [`CodecError::InvalidUtf8`] when the output is not text.
pub fn decompress(compressed: &[u8]) -> Result<String, CodecError> {
    decompress_bounded(compressed, MAX_INFLATED_LEN)
}

/// Like [`decompress`] with an explicit output bound.
///
/// # Errors
///
/// See [`decompress`].
#[instrument(level = "debug", skip(compressed), fields(compressed_len = compressed.len()))]
pub fn decompress_bounded(compressed: &[u8], max_len: usize) -> Result<String, CodecError> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(INFLATE_STEP.min(max_len.saturating_add(1)));

    loop {
        if out.len() == out.capacity() {
            if out.len() > max_len {
                return Err(CodecError::TooLarge { max: max_len });
            }
            // Leave room for one byte past the bound so overflow is observable.
            let headroom = max_len.saturating_add(1) - out.len();
            out.reserve_exact(INFLATE_STEP.min(headroom).max(1));
        }

        let before_in = inflater.total_in();
        let before_out = inflater.total_out();
        let consumed = usize::try_from(before_in).map_err(|_| CodecError::Corrupt)?;
        let remaining = compressed.get(consumed..).ok_or(CodecError::Corrupt)?;

        let status = inflater
            .decompress_vec(remaining, &mut out, FlushDecompress::None)
            .map_err(|_| CodecError::Corrupt)?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                let progressed =
                    inflater.total_in() != before_in || inflater.total_out() != before_out;
                if !progressed && out.len() < out.capacity() {
                    return Err(CodecError::Truncated);
                }
            }
        }
    }

    if out.len() > max_len {
        return Err(CodecError::TooLarge { max: max_len });
    }

    debug!(inflated_len = out.len(), "inflated credential");
    String::from_utf8(out).map_err(|_| CodecError::InvalidUtf8)
}
