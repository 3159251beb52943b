//! Error types for the token vault core.

use thiserror::Error;

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Closed set of failures the core can report.
///
/// Messages carry only structural information (field names, lengths). They
/// never contain master secret bytes, subkeys or plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    /// A context field, master secret or record field failed validation before
    /// any cryptographic work was attempted.
    #[error("invalid input: {0}")]
    InputValidation(String),

    /// Base64url text could not be decoded, or decrypted bytes are not UTF-8.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The AEAD tag did not verify.
    ///
    /// Wrong key version, tampered ciphertext or nonce, and a record whose
    /// tenant/provider/token class was rewritten are indistinguishable here.
    #[error("token record failed authentication")]
    AuthenticationFailure,
}

/// Discriminant of a [`VaultError`], for matching without the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InputValidation,
    Encoding,
    AuthenticationFailure,
}

impl VaultError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VaultError::InputValidation(_) => ErrorKind::InputValidation,
            VaultError::Encoding(_) => ErrorKind::Encoding,
            VaultError::AuthenticationFailure => ErrorKind::AuthenticationFailure,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        VaultError::InputValidation(msg.into())
    }

    pub(crate) fn encoding(msg: impl Into<String>) -> Self {
        VaultError::Encoding(msg.into())
    }
}
