//! Envelope encryption for third-party OAuth tokens at rest.
//!
//! A [`TokenRecord`] is self-describing: it carries the tenant, provider, token
//! class and key version it was sealed for, plus the nonce and ciphertext.
//! Decrypting it under any other tenant, provider or token class fails with
//! [`VaultError::AuthenticationFailure`], even under the correct
//! [`MasterSecret`].
//!
//! ```no_run
//! use token_vault::{decrypt_token, encrypt_token, BindingContext, MasterSecret};
//!
//! # fn main() -> Result<(), token_vault::VaultError> {
//! let secret = MasterSecret::from_bytes(&[0x42; 32])?;
//! let ctx = BindingContext::new("ws-A", "google", "refresh", 1)?;
//! let record = encrypt_token(&secret, &ctx, b"1//0gMockGoogleRefreshToken")?;
//! assert_eq!(decrypt_token(&secret, &record)?, "1//0gMockGoogleRefreshToken");
//! # Ok(())
//! # }
//! ```
//!
//! All operations are stateless; any number of calls may run in parallel.
//! The master secret is always an explicit argument and is never retained.

pub mod crypto;
pub mod envelope;
pub mod error;
pub mod record;
pub mod secret;

pub use envelope::{decrypt_token, decrypt_token_bytes, encrypt_token};
pub use error::{ErrorKind, VaultError, VaultResult};
pub use record::{BindingContext, TokenRecord};
pub use secret::{MasterSecret, MIN_MASTER_SECRET_LEN};
