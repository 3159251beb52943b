//! Cryptographic building blocks for token envelopes.
//!
//! This module is free of I/O, configuration and logging concerns. Each
//! submodule is a pure function of its inputs, except [`cipher::seal`], which
//! draws nonces from the OS CSPRNG.
//!
//! - [`codec`]: unpadded base64url text encoding.
//! - [`kdf`]: HKDF-SHA256 subkey per `(provider, token_class, key_version)`.
//! - [`aad`]: canonical JSON associated data over `(tenant, provider, token_class)`.
//! - [`cipher`]: AES-256-GCM seal/open with a 96-bit nonce and 128-bit tag.

pub mod aad;
pub mod cipher;
pub mod codec;
pub mod kdf;

pub use cipher::{NONCE_LEN, TAG_LEN};
pub use kdf::SUBKEY_LEN;
