//! Response-time storage of a credential into cookies.

use tracing::{debug, info, instrument};

use super::{CredentialError, SessionCredential};
use crate::chunk::{ChunkPlan, ExtraStorageConfig, partition, split};
use crate::codec;
use crate::config::CredentialCookieConfig;
use crate::jar::{CookieSource, CookieWrite};

/// Result of storing a credential: the primary cookie's credential state
/// plus the secondary cookie writes the transport layer must apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// Credential state for the primary session cookie.
    pub credential: SessionCredential,
    /// Secondary cookies to set or clear, sets first in index order.
    pub writes: Vec<CookieWrite>,
}

/// Stores `credential`, splitting it across secondary cookies when it does
/// not fit the primary cookie.
///
/// A credential within `primary_budget` stays inline. Anything larger is
/// compressed, encoded and partitioned into `<prefix>1..N`. Secondary cookies
/// present in `jar` that the new credential does not use are cleared.
///
/// # Errors
///
/// Returns [`CredentialError::Chunk`] with [`crate::ChunkError::Capacity`]
/// when the credential needs more than `additional_cookies` chunks (no writes
/// are produced), or with [`crate::ChunkError::InvalidConfig`] for an
/// unusable config.
#[instrument(level = "debug", skip_all, fields(credential_len = credential.len()))]
pub fn store_credential<J>(
    credential: &str,
    jar: &J,
    cfg: &CredentialCookieConfig,
) -> Result<StoredCredential, CredentialError>
where
    J: CookieSource + ?Sized,
{
    let extra = &cfg.extra_storage;
    extra.validate()?;

    if credential.len() <= cfg.primary_budget {
        let writes = clear_from(jar, extra, 1);
        debug!(cleared = writes.len(), "storing credential inline");
        return Ok(StoredCredential {
            credential: SessionCredential::Inline(credential.to_string()),
            writes,
        });
    }

    let blob = codec::compress(credential)?;
    let chunks = match split(&blob, cfg.primary_budget, extra)? {
        ChunkPlan::Split(chunks) => chunks,
        // Inline credentials are stored uncompressed, so a compressed value
        // still goes to secondary cookies even when it would fit.
        ChunkPlan::Inline(encoded) => partition(&encoded, extra)?,
    };

    let used = chunks.len();
    let mut writes: Vec<CookieWrite> = chunks
        .into_iter()
        .map(|chunk| {
            let (name, value) = chunk.into_pair();
            CookieWrite::set(name, value)
        })
        .collect();
    let cleared = clear_from(jar, extra, used + 1);
    let stale = cleared.len();
    writes.extend(cleared);

    info!(
        chunks = used,
        stale,
        prefix = %extra.cookie_prefix,
        "stored credential in secondary cookies"
    );
    Ok(StoredCredential {
        credential: SessionCredential::Split,
        writes,
    })
}

/// Clears every secondary cookie present in `jar`, e.g. on logout.
#[must_use]
pub fn clear_credential<J>(jar: &J, cfg: &ExtraStorageConfig) -> Vec<CookieWrite>
where
    J: CookieSource + ?Sized,
{
    let writes = clear_from(jar, cfg, 1);
    debug!(cleared = writes.len(), "cleared secondary cookies");
    writes
}

fn clear_from<J>(jar: &J, cfg: &ExtraStorageConfig, first_index: usize) -> Vec<CookieWrite>
where
    J: CookieSource + ?Sized,
{
    cfg.cookie_names()
        .filter(|(index, _)| *index >= first_index)
        .filter(|(_, name)| jar.cookie(name).is_some())
        .map(|(_, name)| CookieWrite::clear(name))
        .collect()
}
