//! Envelope encryption of tokens into [`TokenRecord`]s and back.
//!
//! # Encrypt
//!
//! 1. Derive the subkey for `(provider, token_class, key_version)`.
//! 2. Build the AAD from `(tenant_id, provider, token_class)`.
//! 3. Seal under a fresh random nonce.
//!
//! # Decrypt
//!
//! The context, subkey and AAD are all rebuilt from the record's own fields.
//! There is no parameter through which a caller could supply different
//! metadata, so a record moved to another tenant, provider or token class
//! fails authentication.
//!
//! Failures are returned as-is. Nothing here retries, falls back to another
//! key version, or logs secret material.

use tracing::debug;
use zeroize::Zeroize;

use crate::crypto::{aad, cipher, kdf};
use crate::error::{VaultError, VaultResult};
use crate::record::{BindingContext, TokenRecord};
use crate::secret::MasterSecret;

/// Encrypt `plaintext` for `ctx` under `secret`.
///
/// Two calls with identical inputs produce different nonces and ciphertexts.
///
/// # Errors
///
/// Returns [`VaultError::InputValidation`] if `ctx` is invalid.
pub fn encrypt_token(
    secret: &MasterSecret,
    ctx: &BindingContext,
    plaintext: &[u8],
) -> VaultResult<TokenRecord> {
    let subkey = kdf::derive(secret, ctx)?;
    let aad = aad::build(ctx.tenant_id(), ctx.provider(), ctx.token_class())?;
    let sealed = cipher::seal(&subkey, plaintext, &aad)?;

    debug!(
        provider = ctx.provider(),
        token_class = ctx.token_class(),
        key_version = ctx.key_version(),
        "token sealed"
    );
    Ok(TokenRecord::new(ctx.clone(), sealed.nonce, sealed.ciphertext))
}

/// Decrypt `record` under `secret`, returning the raw plaintext bytes.
///
/// # Errors
///
/// Returns [`VaultError::AuthenticationFailure`] if the record was tampered
/// with, rebound to another context, or sealed under a different secret.
pub fn decrypt_token_bytes(secret: &MasterSecret, record: &TokenRecord) -> VaultResult<Vec<u8>> {
    let ctx = record.context();
    let subkey = kdf::derive(secret, ctx)?;
    let aad = aad::build(record.tenant_id(), record.provider(), record.token_class())?;

    cipher::open(&subkey, record.nonce(), record.ciphertext(), &aad).inspect_err(|e| {
        debug!(
            provider = ctx.provider(),
            token_class = ctx.token_class(),
            key_version = ctx.key_version(),
            error = %e,
            "token record rejected"
        );
    })
}

/// Decrypt `record` under `secret`, returning the token as UTF-8 text.
///
/// # Errors
///
/// As [`decrypt_token_bytes`], plus [`VaultError::Encoding`] if the plaintext
/// is not valid UTF-8.
pub fn decrypt_token(secret: &MasterSecret, record: &TokenRecord) -> VaultResult<String> {
    let bytes = decrypt_token_bytes(secret, record)?;
    String::from_utf8(bytes).map_err(|e| {
        let mut bytes = e.into_bytes();
        bytes.zeroize();
        VaultError::encoding("decrypted token is not valid UTF-8")
    })
}
