//! Cookie jar abstraction for inbound requests and outbound cookie writes.
//!
//! The transport layer owns the real cookie storage. This module only models
//! the two views the credential codec needs: a read-only name → value lookup
//! over the request's cookies, and a list of cookies to set or clear on the
//! response.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use cookie::Cookie;
pub use cookie::SameSite;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Read-only view over the cookies delivered with a request.
pub trait CookieSource {
    /// Returns the raw value of the named cookie, if present.
    fn cookie(&self, name: &str) -> Option<&str>;
}

impl CookieSource for HashMap<String, String> {
    fn cookie(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl CookieSource for BTreeMap<String, String> {
    fn cookie(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: CookieSource + ?Sized> CookieSource for &T {
    fn cookie(&self, name: &str) -> Option<&str> {
        (**self).cookie(name)
    }
}

/// Cookies parsed from a raw `Cookie:` request header.
///
/// Values are redacted in Debug output; secondary cookies hold credential
/// material.
#[derive(Clone, Default)]
pub struct RequestCookies {
    cookies: HashMap<String, String>,
    skipped: usize,
}

impl RequestCookies {
    /// Creates an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `Cookie:` header value (`a=b; c=d`).
    ///
    /// Pairs without `=` or with an invalid name are skipped with a warning.
    /// When a name repeats, the first occurrence wins, matching how browsers
    /// order the more specific cookie first. Surrounding double quotes are
    /// stripped from values.
    #[instrument(level = "debug", skip(header), fields(header_len = header.len()))]
    pub fn parse(header: &str) -> Self {
        let mut jar = Self::new();

        for (position, parsed) in Cookie::split_parse(header).enumerate() {
            let cookie = match parsed {
                Ok(cookie) => cookie,
                Err(error) => {
                    warn!(position, error = %error, "skipping malformed cookie pair");
                    jar.skipped += 1;
                    continue;
                }
            };

            let name = cookie.name();
            if !is_cookie_name(name) {
                warn!(position, "skipping cookie pair with invalid name");
                jar.skipped += 1;
                continue;
            }
            if jar.cookies.contains_key(name) {
                debug!(name, "ignoring duplicate cookie");
                continue;
            }
            jar.cookies
                .insert(name.to_string(), cookie.value_trimmed().to_string());
        }

        debug!(
            cookies = jar.cookies.len(),
            skipped = jar.skipped,
            "parsed cookie header"
        );
        jar
    }

    /// Adds or replaces a cookie.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Number of cookies in the jar.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns true when the jar holds no cookies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Number of malformed pairs dropped while parsing.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Applies outbound writes, as a browser would before the next request.
    pub fn apply(&mut self, writes: &[CookieWrite]) {
        for write in writes {
            match &write.action {
                CookieAction::Set(value) => {
                    self.cookies.insert(write.name.clone(), value.clone());
                }
                CookieAction::Clear => {
                    self.cookies.remove(&write.name);
                }
            }
        }
    }
}

impl CookieSource for RequestCookies {
    fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestCookies {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut jar = Self::new();
        for (name, value) in iter {
            jar.insert(name, value);
        }
        jar
    }
}

impl fmt::Debug for RequestCookies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.cookies.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("RequestCookies")
            .field("names", &names)
            .field("values", &"[REDACTED]")
            .field("skipped", &self.skipped)
            .finish()
    }
}

/// Parses a case-insensitive `SameSite` label (`strict`, `lax`, `none`).
#[must_use]
pub fn parse_same_site(label: &str) -> Option<SameSite> {
    match label.to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

// `cookie::SameSite` has no serde support; config files carry the label.
mod same_site_label {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{SameSite, parse_same_site};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<SameSite>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(same_site) => serializer.serialize_some(&same_site.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SameSite>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|label| {
                parse_same_site(&label)
                    .ok_or_else(|| D::Error::custom(format!("invalid same_site '{label}'")))
            })
            .transpose()
    }
}

/// Attributes applied to every cookie this crate writes.
///
/// Secondary cookies share the primary session cookie's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieAttributes {
    /// `Path` attribute.
    pub path: String,
    /// Optional `Domain` attribute.
    pub domain: Option<String>,
    /// Emit the `Secure` flag.
    pub secure: bool,
    /// Emit the `HttpOnly` flag.
    pub http_only: bool,
    /// Optional `SameSite` attribute.
    #[serde(with = "same_site_label")]
    pub same_site: Option<SameSite>,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: None,
            secure: true,
            http_only: true,
            same_site: Some(SameSite::Lax),
        }
    }
}

/// What to do with a cookie on the response.
#[derive(Clone, PartialEq, Eq)]
pub enum CookieAction {
    /// Set the cookie to this value (sensitive, never log).
    Set(String),
    /// Expire the cookie.
    Clear,
}

/// A single cookie the transport layer must set or clear on the response.
#[derive(Clone, PartialEq, Eq)]
pub struct CookieWrite {
    /// Cookie name.
    pub name: String,
    /// Set or clear.
    pub action: CookieAction,
}

impl CookieWrite {
    /// A write that sets `name` to `value`.
    #[must_use]
    pub fn set(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: CookieAction::Set(value.into()),
        }
    }

    /// A write that expires `name`.
    #[must_use]
    pub fn clear(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: CookieAction::Clear,
        }
    }

    /// Returns the value being set, or `None` for a clear.
    ///
    /// Cookie values are sensitive; do not log the return value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match &self.action {
            CookieAction::Set(value) => Some(value),
            CookieAction::Clear => None,
        }
    }

    /// Returns true if this write expires the cookie.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        matches!(self.action, CookieAction::Clear)
    }

    /// Renders the `Set-Cookie` header value for this write.
    ///
    /// A clear renders an empty value with `Max-Age=0` and an `Expires` in
    /// the past.
    #[must_use]
    pub fn to_set_cookie(&self, attributes: &CookieAttributes) -> String {
        let value = self.value().unwrap_or_default();
        let mut builder = Cookie::build((self.name.as_str(), value))
            .path(attributes.path.as_str())
            .secure(attributes.secure)
            .http_only(attributes.http_only);
        if let Some(domain) = &attributes.domain {
            builder = builder.domain(domain.as_str());
        }
        if let Some(same_site) = attributes.same_site {
            builder = builder.same_site(same_site);
        }

        let mut cookie = builder.build();
        if self.is_clear() {
            cookie.make_removal();
        }
        cookie.to_string()
    }
}

// Custom Debug impl that redacts the cookie value.
impl fmt::Debug for CookieWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            CookieAction::Set(_) => "set([REDACTED])",
            CookieAction::Clear => "clear",
        };
        f.debug_struct("CookieWrite")
            .field("name", &self.name)
            .field("action", &action)
            .finish()
    }
}

/// Returns true if `name` is a valid RFC 6265 cookie-name token.
#[must_use]
pub fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|byte| {
            byte.is_ascii_graphic()
                && !matches!(
                    byte,
                    b'(' | b')'
                        | b'<'
                        | b'>'
                        | b'@'
                        | b','
                        | b';'
                        | b':'
                        | b'\\'
                        | b'"'
                        | b'/'
                        | b'['
                        | b']'
                        | b'?'
                        | b'='
                        | b'{'
                        | b'}'
                )
        })
}
