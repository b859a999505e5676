//! Encode command handler: store a credential and print the cookies to set.

use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use auth_cookie_codec::{CredentialCookieConfig, RequestCookies, SessionCookie, store_credential};
use tracing::{debug, info};

/// Stores `credential` (or stdin when `None`/`-`) and prints the session
/// cookie JSON followed by one `Set-Cookie` line per secondary cookie write.
pub fn run_encode_command(
    credential: Option<&str>,
    cookie_header: Option<&str>,
    config: &CredentialCookieConfig,
) -> Result<()> {
    let credential = match credential {
        Some(value) if value != "-" => value.to_string(),
        _ => read_credential_from_stdin()?,
    };
    if credential.is_empty() {
        bail!("No credential provided. Pass it as an argument or pipe it via stdin.");
    }

    let jar = cookie_header.map(RequestCookies::parse).unwrap_or_default();
    debug!(existing_cookies = jar.len(), "parsed request cookies");

    let stored =
        store_credential(&credential, &jar, config).context("Failed to store credential")?;
    let split = stored.credential.is_split();
    let session = SessionCookie::new(stored.credential)
        .to_json()
        .context("Failed to serialize session cookie")?;

    println!("session = {session}");
    for write in &stored.writes {
        println!("Set-Cookie: {}", write.to_set_cookie(&config.attributes));
    }

    info!(split, writes = stored.writes.len(), "credential encoded");
    Ok(())
}

fn read_credential_from_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read credential from stdin")?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}
