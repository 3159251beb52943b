//! AES-256-GCM seal and open over raw bytes.
//!
//! **Nonces are random, never derived.** GCM nonce reuse under one key breaks
//! both confidentiality and authentication, so every [`seal`] call draws a
//! fresh 96-bit nonce from the OS CSPRNG. Under a single subkey the collision
//! bound becomes relevant after roughly 2^32 seals; callers with that volume
//! must advance `key_version`.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng, Payload},
    Aes256Gcm, Key, Nonce,
};

use super::kdf::Subkey;
use crate::error::{VaultError, VaultResult};

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Output of [`seal`]: a fresh nonce and the ciphertext with its tag appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw ciphertext + authentication tag bytes.
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under `key`, authenticating `aad` alongside it.
///
/// # Errors
///
/// Returns [`VaultError::InputValidation`] if the AEAD rejects the input, which
/// only happens for plaintexts beyond the GCM length limit.
pub fn seal(key: &Subkey, plaintext: &[u8], aad: &[u8]) -> VaultResult<Sealed> {
    let cipher = build_cipher(key);

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| VaultError::invalid("plaintext rejected by AES-256-GCM"))?;

    Ok(Sealed { nonce, ciphertext })
}

/// Decrypt and verify `ciphertext` under `key` with the given `nonce` and `aad`.
///
/// # Errors
///
/// Returns [`VaultError::InputValidation`] if `nonce` is not [`NONCE_LEN`]
/// bytes or `ciphertext` is shorter than [`TAG_LEN`]. Returns
/// [`VaultError::AuthenticationFailure`] if the tag does not verify.
pub fn open(key: &Subkey, nonce: &[u8], ciphertext: &[u8], aad: &[u8]) -> VaultResult<Vec<u8>> {
    if nonce.len() != NONCE_LEN {
        return Err(VaultError::invalid(format!(
            "nonce must be {NONCE_LEN} bytes, got {}",
            nonce.len()
        )));
    }
    if ciphertext.len() < TAG_LEN {
        return Err(VaultError::invalid(format!(
            "ciphertext must be at least {TAG_LEN} bytes, got {}",
            ciphertext.len()
        )));
    }

    build_cipher(key)
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| VaultError::AuthenticationFailure)
}

fn build_cipher(key: &Subkey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}
