//! Error types for chunk splitting and reassembly.

use thiserror::Error;

/// Errors raised while splitting or reassembling chunked credentials.
///
/// Messages carry cookie names and counts only, never cookie values.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// The encoded credential needs more secondary cookies than configured.
    #[error(
        "credential needs {required} secondary cookies but only {allowed} are allowed; increase additional_cookies"
    )]
    Capacity {
        /// Number of chunks the credential needs.
        required: usize,
        /// Configured `additional_cookies` bound.
        allowed: usize,
    },

    /// A secondary cookie expected to hold a chunk is absent.
    #[error("secondary cookie chunk {index} is missing")]
    MissingChunk {
        /// 1-based index of the first missing chunk.
        index: usize,
    },

    /// The reassembled chunks are not valid base64.
    #[error("reassembled credential is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The text handed to the partitioner is not ASCII, so byte-sized slices
    /// could split a character.
    #[error("encoded credential is not ASCII and cannot be partitioned by byte length")]
    NotAscii,

    /// The extra storage configuration cannot be used.
    #[error("invalid extra storage config: {reason}")]
    InvalidConfig {
        /// Description of what was wrong.
        reason: String,
    },
}
