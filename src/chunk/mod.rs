//! Splitting encoded credentials across numbered secondary cookies.
//!
//! A compressed credential is base64 encoded and, when it does not fit the
//! primary cookie, partitioned into fixed-size chunks stored under
//! `<prefix>1`, `<prefix>2`, … Reassembly walks the same names in order and
//! stops at the first gap.

mod config;
mod error;
mod reassemble;
mod split;

pub use config::{
    DEFAULT_ADDITIONAL_COOKIES, DEFAULT_CHUNK_SIZE, DEFAULT_COOKIE_PREFIX, ExtraStorageConfig,
    MAX_COOKIE_BYTES,
};
pub use error::ChunkError;
pub use reassemble::{CompressedBlob, reassemble};
pub use split::{Chunk, ChunkPlan, encode_blob, partition, split};
