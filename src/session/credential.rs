//! The credential carried by the primary session cookie.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::SessionCookieError;
use crate::jar::CookieSource;

/// Credential state held by the primary session cookie.
///
/// On the wire this is `{"authHeaderValue": "..."}` for an inline credential
/// or `{"authHeaderValueExtra": true}` when the credential lives in secondary
/// cookies.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCredentials", into = "RawCredentials")]
pub enum SessionCredential {
    /// The full `Authorization` value, small enough for the primary cookie.
    Inline(String),
    /// The credential was compressed and split across secondary cookies.
    Split,
}

impl SessionCredential {
    /// Returns true for the split marker.
    #[must_use]
    pub fn is_split(&self) -> bool {
        matches!(self, Self::Split)
    }
}

// Custom Debug impl that redacts the inline credential.
impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline([REDACTED])"),
            Self::Split => f.write_str("Split"),
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_header_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_header_value_extra: Option<bool>,
}

impl TryFrom<RawCredentials> for SessionCredential {
    type Error = SessionCookieError;

    fn try_from(raw: RawCredentials) -> Result<Self, Self::Error> {
        match (raw.auth_header_value, raw.auth_header_value_extra) {
            (Some(_), Some(true)) => Err(SessionCookieError::AmbiguousCredential),
            (Some(value), None | Some(false)) => Ok(Self::Inline(value)),
            (None, Some(true)) => Ok(Self::Split),
            (None, None | Some(false)) => Err(SessionCookieError::MissingCredential),
        }
    }
}

impl From<SessionCredential> for RawCredentials {
    fn from(credential: SessionCredential) -> Self {
        match credential {
            SessionCredential::Inline(value) => Self {
                auth_header_value: Some(value),
                auth_header_value_extra: None,
            },
            SessionCredential::Split => Self {
                auth_header_value: None,
                auth_header_value_extra: Some(true),
            },
        }
    }
}

/// The primary session cookie object.
///
/// Only `credentials` is interpreted here; every other field (username,
/// auth type, expiry, …) belongs to session management and is preserved
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCookie {
    /// Inline credential or split marker.
    pub credentials: SessionCredential,
    /// Fields owned by session management.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl SessionCookie {
    /// Creates a session cookie holding only `credentials`.
    #[must_use]
    pub fn new(credentials: SessionCredential) -> Self {
        Self {
            credentials,
            other: Map::new(),
        }
    }

    /// Parses the session cookie JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionCookieError::Json`] when the JSON is malformed or the
    /// credentials are not exactly one of the two shapes.
    pub fn from_json(raw: &str) -> Result<Self, SessionCookieError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the session cookie named `name` from `jar` and parses its
    /// value as session JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionCookieError::Absent`] when the jar has no such cookie
    /// and [`SessionCookieError::Json`] when its value does not parse.
    pub fn from_jar<J>(jar: &J, name: &str) -> Result<Self, SessionCookieError>
    where
        J: CookieSource + ?Sized,
    {
        let raw = jar.cookie(name).ok_or_else(|| SessionCookieError::Absent {
            name: name.to_string(),
        })?;
        Self::from_json(raw)
    }

    /// Serializes the session cookie to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionCookieError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SessionCookieError> {
        Ok(serde_json::to_string(self)?)
    }
}
