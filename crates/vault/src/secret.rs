//! [`MasterSecret`]: the caller-owned root of every derived subkey.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::codec;
use crate::error::{VaultError, VaultResult};

/// Minimum accepted master secret length in bytes.
pub const MIN_MASTER_SECRET_LEN: usize = 32;

/// High-entropy master secret supplied by the caller.
///
/// The core never generates, stores or transmits this value; it only borrows
/// it for the duration of a single encrypt or decrypt call. The buffer is
/// zeroed when the value is dropped, and it is deliberately not `Clone` or
/// `Serialize`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret(Vec<u8>);

impl MasterSecret {
    /// Copy `bytes` into a new master secret.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InputValidation`] if `bytes` is shorter than
    /// [`MIN_MASTER_SECRET_LEN`].
    pub fn from_bytes(bytes: &[u8]) -> VaultResult<Self> {
        if bytes.len() < MIN_MASTER_SECRET_LEN {
            return Err(VaultError::invalid(format!(
                "master secret must be at least {MIN_MASTER_SECRET_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Decode a base64url master secret (as provisioned in environment
    /// variables or a secret manager).
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Encoding`] if `text` is not base64url, or
    /// [`VaultError::InputValidation`] if the decoded secret is too short.
    pub fn from_base64(text: &str) -> VaultResult<Self> {
        let mut raw = codec::decode(text.trim())
            .map_err(|_| VaultError::encoding("master secret is not valid base64url"))?;
        let secret = Self::from_bytes(&raw);
        raw.zeroize();
        secret
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterSecret([REDACTED])")
    }
}
