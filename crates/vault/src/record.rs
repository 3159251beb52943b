//! [`BindingContext`] and the persisted [`TokenRecord`].
//!
//! # Wire shape
//!
//! ```text
//! {
//!   "tenant_id": "ws-A",
//!   "provider": "google",
//!   "token_class": "refresh",
//!   "key_version": 1,
//!   "nonce": "<base64url-no-pad, 12 bytes>",
//!   "ciphertext": "<base64url-no-pad, ciphertext + 16 byte tag>",
//!   "expires_at": "2026-01-01T00:00:00Z"
//! }
//! ```
//!
//! Both types validate at construction. Deserialising a record runs the same
//! checks, so a `TokenRecord` value is always structurally sound.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::cipher::{NONCE_LEN, TAG_LEN};
use crate::crypto::codec;
use crate::error::{VaultError, VaultResult};

/// Separator used by the subkey derivation info string.
const INFO_SEPARATOR: char = '|';

/// The tuple a ciphertext is bound to.
///
/// `provider`, `token_class` and `key_version` select the subkey;
/// `tenant_id`, `provider` and `token_class` form the AAD.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingContext {
    tenant_id: String,
    provider: String,
    token_class: String,
    key_version: u32,
}

impl BindingContext {
    /// Build a validated context.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InputValidation`] if any string field is empty or
    /// blank, if `provider` or `token_class` contains `|`, or if
    /// `key_version` is 0.
    pub fn new(
        tenant_id: impl Into<String>,
        provider: impl Into<String>,
        token_class: impl Into<String>,
        key_version: u32,
    ) -> VaultResult<Self> {
        let ctx = Self {
            tenant_id: tenant_id.into(),
            provider: provider.into(),
            token_class: token_class.into(),
            key_version,
        };
        ctx.validate()?;
        Ok(ctx)
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn token_class(&self) -> &str {
        &self.token_class
    }

    pub fn key_version(&self) -> u32 {
        self.key_version
    }

    pub(crate) fn validate(&self) -> VaultResult<()> {
        ensure_non_empty(&self.tenant_id, "tenant_id")?;
        ensure_non_empty(&self.provider, "provider")?;
        ensure_non_empty(&self.token_class, "token_class")?;
        ensure_no_separator(&self.provider, "provider")?;
        ensure_no_separator(&self.token_class, "token_class")?;
        if self.key_version < 1 {
            return Err(VaultError::invalid("key_version must be >= 1"));
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> VaultResult<()> {
    if value.trim().is_empty() {
        return Err(VaultError::invalid(format!("{name} must not be empty")));
    }
    Ok(())
}

fn ensure_no_separator(value: &str, name: &str) -> VaultResult<()> {
    if value.contains(INFO_SEPARATOR) {
        return Err(VaultError::invalid(format!(
            "{name} must not contain '{INFO_SEPARATOR}'"
        )));
    }
    Ok(())
}

/// An encrypted token as persisted by the storage layer.
///
/// Produced by [`crate::encrypt_token`] or by deserialising a stored row.
/// There are no setters: a changed record is a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenRecord", into = "RawTokenRecord")]
pub struct TokenRecord {
    context: BindingContext,
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
    expires_at: Option<DateTime<Utc>>,
}

impl TokenRecord {
    pub(crate) fn new(
        context: BindingContext,
        nonce: [u8; NONCE_LEN],
        ciphertext: Vec<u8>,
    ) -> Self {
        Self {
            context,
            nonce,
            ciphertext,
            expires_at: None,
        }
    }

    /// The context this record was sealed under, rebuilt from its own fields.
    pub fn context(&self) -> &BindingContext {
        &self.context
    }

    pub fn tenant_id(&self) -> &str {
        self.context.tenant_id()
    }

    pub fn provider(&self) -> &str {
        self.context.provider()
    }

    pub fn token_class(&self) -> &str {
        self.context.token_class()
    }

    pub fn key_version(&self) -> u32 {
        self.context.key_version()
    }

    /// Raw nonce bytes.
    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Raw ciphertext bytes, authentication tag included.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Base64url (unpadded) form of the nonce, as stored.
    pub fn nonce_b64(&self) -> String {
        codec::encode(self.nonce)
    }

    /// Base64url (unpadded) form of the ciphertext, as stored.
    pub fn ciphertext_b64(&self) -> String {
        codec::encode(&self.ciphertext)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Return a copy of this record carrying `expires_at`.
    ///
    /// Expiry is caller metadata and is not authenticated.
    #[must_use]
    pub fn with_expires_at(self, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { expires_at, ..self }
    }

    /// Whether the record's expiry lies at or before `now`. Records without an
    /// expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Serialised form of [`TokenRecord`].
#[derive(Serialize, Deserialize)]
struct RawTokenRecord {
    tenant_id: String,
    provider: String,
    token_class: String,
    key_version: u32,
    nonce: String,
    ciphertext: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<RawTokenRecord> for TokenRecord {
    type Error = VaultError;

    fn try_from(raw: RawTokenRecord) -> Result<Self, Self::Error> {
        let context =
            BindingContext::new(raw.tenant_id, raw.provider, raw.token_class, raw.key_version)?;

        let nonce_bytes = codec::decode(&raw.nonce)?;
        let nonce: [u8; NONCE_LEN] = nonce_bytes.as_slice().try_into().map_err(|_| {
            VaultError::invalid(format!(
                "nonce must be {NONCE_LEN} bytes, got {}",
                nonce_bytes.len()
            ))
        })?;

        let ciphertext = codec::decode(&raw.ciphertext)?;
        if ciphertext.len() < TAG_LEN {
            return Err(VaultError::invalid(format!(
                "ciphertext must be at least {TAG_LEN} bytes, got {}",
                ciphertext.len()
            )));
        }

        Ok(Self {
            context,
            nonce,
            ciphertext,
            expires_at: raw.expires_at,
        })
    }
}

impl From<TokenRecord> for RawTokenRecord {
    fn from(record: TokenRecord) -> Self {
        let nonce = record.nonce_b64();
        let ciphertext = record.ciphertext_b64();
        let BindingContext {
            tenant_id,
            provider,
            token_class,
            key_version,
        } = record.context;
        Self {
            tenant_id,
            provider,
            token_class,
            key_version,
            nonce,
            ciphertext,
            expires_at: record.expires_at,
        }
    }
}
