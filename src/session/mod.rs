//! Session credentials and the `Authorization` header derived from them.
//!
//! The primary session cookie carries either the credential itself or a
//! marker saying it was split across secondary cookies. [`build_auth_header`]
//! is the request-time entry point; [`store_credential`] and
//! [`clear_credential`] are the response-time counterparts.

mod credential;
mod error;
mod header;
mod store;

pub use credential::{SessionCookie, SessionCredential};
pub use error::{CredentialError, SessionCookieError};
pub use header::{AUTHORIZATION, AuthHeader, build_auth_header};
pub use store::{StoredCredential, clear_credential, store_credential};
