//! Master secret loading and version selection for the sidecar.
//!
//! # Lifecycle
//!
//! 1. At startup, [`load`] decodes `TOKEN_ENCRYPTION_KEY_B64` as the secret for
//!    `TOKEN_KEY_VERSION`, plus any `TOKEN_RETIRED_KEYS` pairs.
//! 2. The decoded secrets live only in process memory inside a [`Keyring`].
//!    Rotating means restarting with a new active version and the previous
//!    secret moved to `TOKEN_RETIRED_KEYS`.
//!
//! # Security invariants
//!
//! - Secrets are **never** written to disk, logged, or included in traces.
//! - Error messages name the offending version, never the secret text.

pub mod store;

pub use store::{Keyring, KeyringError};

use anyhow::{Context, Result};
use token_vault::MasterSecret;
use tracing::info;

use crate::config::Config;

/// Build the [`Keyring`] described by `cfg`.
///
/// # Errors
///
/// Returns an error if any secret fails to decode or is too short, if a
/// retired entry is malformed, or if a version is repeated.
pub fn load(cfg: &Config) -> Result<Keyring> {
    let active = MasterSecret::from_base64(&cfg.token_encryption_key_b64)
        .context("TOKEN_ENCRYPTION_KEY_B64 is not a usable master secret")?;
    let retired = parse_retired(&cfg.token_retired_keys)?;

    let keyring = Keyring::new(cfg.token_key_version, active, retired)
        .context("inconsistent key versions")?;

    info!(
        active_key_version = keyring.active_version(),
        key_versions_loaded = keyring.version_count(),
        "master secrets loaded"
    );
    Ok(keyring)
}

/// Parse `version:base64url` pairs separated by commas. Blank input yields none.
fn parse_retired(entries: &str) -> Result<Vec<(u32, MasterSecret)>> {
    entries.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .enumerate()
        .map(|(i, entry)| -> Result<(u32, MasterSecret)> {
            let (version, text) = entry.split_once(':').with_context(|| {
                format!("TOKEN_RETIRED_KEYS entry {i} must be `version:base64url`")
            })?;
            let version: u32 = version.trim().parse().with_context(|| {
                format!("TOKEN_RETIRED_KEYS entry {i} has a non-numeric version")
            })?;
            let secret = MasterSecret::from_base64(text).with_context(|| {
                format!("TOKEN_RETIRED_KEYS secret for key version {version} is not usable")
            })?;
            Ok((version, secret))
        })
        .collect()
}
