//! Decode command handler: rebuild the `Authorization` header.

use anyhow::{Context, Result};
use auth_cookie_codec::{
    CredentialCookieConfig, RequestCookies, SessionCookie, build_auth_header,
};
use tracing::{debug, info};

/// Rebuilds the header from a raw `Cookie` header and the session cookie JSON.
///
/// Without `session`, the JSON is read from the configured session cookie in
/// `cookie_header`. Prints `authorization: <value>` on success. Any failure means no
/// credential is available; nothing partial is printed.
pub fn run_decode_command(
    cookie_header: &str,
    session: Option<&str>,
    config: &CredentialCookieConfig,
) -> Result<()> {
    let jar = RequestCookies::parse(cookie_header);
    debug!(
        cookies = jar.len(),
        skipped = jar.skipped(),
        "parsed request cookies"
    );

    let session = match session {
        Some(raw) => SessionCookie::from_json(raw),
        None => SessionCookie::from_jar(&jar, &config.session_cookie_name),
    }
    .context("Invalid session cookie")?;

    let header = build_auth_header(&session.credentials, &jar, &config.extra_storage)
        .context("No credential available")?;

    println!("{}: {}", header.header_name(), header.value());
    info!(split = session.credentials.is_split(), "credential decoded");
    Ok(())
}
