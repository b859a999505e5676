//! Auth Cookie Codec Library
//!
//! This library stores an `Authorization` credential in browser cookies and
//! rebuilds it on later requests. Credentials that outgrow the ~4KB
//! per-cookie ceiling are compressed, base64 encoded and split across a
//! bounded number of numbered secondary cookies.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`codec`] - zlib compression with bounded inflation
//! - [`chunk`] - splitting encoded credentials over `<prefix><n>` cookies and reassembling them
//! - [`session`] - session credential shapes, `Authorization` header builder, write side
//! - [`jar`] - cookie jar abstraction and `Set-Cookie` rendering
//! - [`config`] - cookie layout configuration
//!
//! Nothing here performs I/O or keeps state between requests; the transport
//! layer supplies the request cookies and applies the returned writes.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod chunk;
pub mod codec;
pub mod config;
pub mod jar;
pub mod session;

// Re-export commonly used types
pub use chunk::{
    Chunk, ChunkError, ChunkPlan, CompressedBlob, ExtraStorageConfig, encode_blob, partition,
    reassemble, split,
};
pub use codec::{CodecError, MAX_INFLATED_LEN, compress, decompress};
pub use config::{ConfigError, CredentialCookieConfig};
pub use jar::{
    CookieAction, CookieAttributes, CookieSource, CookieWrite, RequestCookies, SameSite,
    parse_same_site,
};
pub use session::{
    AUTHORIZATION, AuthHeader, CredentialError, SessionCookie, SessionCookieError,
    SessionCredential, StoredCredential, build_auth_header, clear_credential, store_credential,
};
