//! [`Keyring`]: the versioned master secrets this sidecar holds.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use token_vault::MasterSecret;

/// Errors produced by the key layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyringError {
    /// No master secret is loaded for the requested version.
    #[error("unknown key version {0}")]
    UnknownVersion(u32),

    /// The same version was supplied twice.
    #[error("key version {0} configured more than once")]
    DuplicateVersion(u32),

    /// Key version 0 is never valid.
    #[error("key version must be >= 1")]
    ZeroVersion,
}

/// Immutable map from key version to master secret.
///
/// Encryption uses the active version unless the caller names another loaded
/// version. Decryption uses exactly the version recorded on the token record;
/// a missing version is an error, never a fallback to a different secret.
///
/// Cheap to clone: the secrets live behind an `Arc` and are never copied.
#[derive(Clone, Debug)]
pub struct Keyring {
    active_version: u32,
    secrets: Arc<BTreeMap<u32, MasterSecret>>,
}

impl Keyring {
    /// Build a keyring from an active secret plus any retired, decrypt-only
    /// secrets.
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError::ZeroVersion`] or
    /// [`KeyringError::DuplicateVersion`] for inconsistent input.
    pub fn new(
        active_version: u32,
        active: MasterSecret,
        retired: impl IntoIterator<Item = (u32, MasterSecret)>,
    ) -> Result<Self, KeyringError> {
        if active_version == 0 {
            return Err(KeyringError::ZeroVersion);
        }
        let mut secrets = BTreeMap::new();
        secrets.insert(active_version, active);
        for (version, secret) in retired {
            if version == 0 {
                return Err(KeyringError::ZeroVersion);
            }
            if secrets.insert(version, secret).is_some() {
                return Err(KeyringError::DuplicateVersion(version));
            }
        }
        Ok(Self {
            active_version,
            secrets: Arc::new(secrets),
        })
    }

    /// Version new records are sealed under by default.
    pub fn active_version(&self) -> u32 {
        self.active_version
    }

    /// Number of loaded versions.
    pub fn version_count(&self) -> usize {
        self.secrets.len()
    }

    /// The master secret for `version`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyringError::UnknownVersion`] if it is not loaded.
    pub fn secret(&self, version: u32) -> Result<&MasterSecret, KeyringError> {
        self.secrets
            .get(&version)
            .ok_or(KeyringError::UnknownVersion(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(byte: u8) -> MasterSecret {
        MasterSecret::from_bytes(&[byte; 32]).unwrap()
    }

    #[test]
    fn active_only() {
        let ring = Keyring::new(1, secret(1), []).unwrap();
        assert_eq!(ring.active_version(), 1);
        assert_eq!(ring.version_count(), 1);
        assert!(ring.secret(1).is_ok());
    }

    #[test]
    fn retired_versions_are_available() {
        let ring = Keyring::new(3, secret(3), [(1, secret(1)), (2, secret(2))]).unwrap();
        assert_eq!(ring.version_count(), 3);
        assert!(ring.secret(2).is_ok());
    }

    #[test]
    fn unknown_version_is_not_substituted() {
        let ring = Keyring::new(2, secret(2), []).unwrap();
        assert_eq!(ring.secret(1).unwrap_err(), KeyringError::UnknownVersion(1));
    }

    #[test]
    fn rejects_duplicate_and_zero_versions() {
        assert_eq!(
            Keyring::new(1, secret(1), [(1, secret(9))]).unwrap_err(),
            KeyringError::DuplicateVersion(1)
        );
        assert_eq!(
            Keyring::new(0, secret(1), []).unwrap_err(),
            KeyringError::ZeroVersion
        );
        assert_eq!(
            Keyring::new(1, secret(1), [(0, secret(2))]).unwrap_err(),
            KeyringError::ZeroVersion
        );
    }

    #[test]
    fn debug_does_not_print_secrets() {
        let ring = Keyring::new(1, secret(0xAB), []).unwrap();
        let printed = format!("{ring:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("171"));
    }
}
