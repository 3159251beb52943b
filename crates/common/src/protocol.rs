//! Request and response types for the sidecar HTTP API.
//!
//! Records are carried in their storage shape (see [`TokenRecord`]), so a
//! caller can persist the `record` field of an encrypt response verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use token_vault::TokenRecord;

// ---------------------------------------------------------------------------
// Encrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/tokens/encrypt`.
#[derive(Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    pub tenant_id: String,
    pub provider: String,
    pub token_class: String,
    /// Key version to seal under. Defaults to the active version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_version: Option<u32>,
    /// The token to protect.
    pub plaintext: String,
    /// Optional expiry copied onto the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for EncryptRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptRequest")
            .field("tenant_id", &self.tenant_id)
            .field("provider", &self.provider)
            .field("token_class", &self.token_class)
            .field("key_version", &self.key_version)
            .field("plaintext", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Successful response body for `POST /v1/tokens/encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    pub record: TokenRecord,
}

// ---------------------------------------------------------------------------
// Decrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/tokens/decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    pub record: TokenRecord,
}

/// Successful response body for `POST /v1/tokens/decrypt`.
#[derive(Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    pub plaintext: String,
}

impl std::fmt::Debug for DecryptResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptResponse")
            .field("plaintext", &"[REDACTED]")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"`.
    pub status: String,
    /// Key version new records are sealed under.
    pub active_key_version: u32,
    /// Number of master secret versions available for decryption.
    pub key_versions_loaded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encrypt_request_defaults() {
        let req: EncryptRequest = serde_json::from_value(json!({
            "tenant_id": "ws-A",
            "provider": "google",
            "token_class": "refresh",
            "plaintext": "1//0gMockGoogleRefreshToken"
        }))
        .unwrap();
        assert!(req.key_version.is_none());
        assert!(req.expires_at.is_none());
    }

    #[test]
    fn encrypt_request_with_expiry() {
        let req: EncryptRequest = serde_json::from_value(json!({
            "tenant_id": "ws-A",
            "provider": "meta",
            "token_class": "access_long_lived",
            "key_version": 2,
            "plaintext": "EAAB",
            "expires_at": "2026-03-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(req.key_version, Some(2));
        assert!(req.expires_at.is_some());
    }

    #[test]
    fn plaintext_is_redacted_in_debug() {
        let r = DecryptResponse {
            plaintext: "secret-token".into(),
        };
        assert!(!format!("{r:?}").contains("secret-token"));

        let req: EncryptRequest = serde_json::from_value(json!({
            "tenant_id": "ws-A",
            "provider": "google",
            "token_class": "refresh",
            "plaintext": "secret-token"
        }))
        .unwrap();
        let printed = format!("{req:?}");
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("ws-A"));
    }

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("bad_request", "unknown key version 3");
        assert_eq!(e.code, "bad_request");
        assert!(e.message.contains("unknown key version"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            active_key_version: 2,
            key_versions_loaded: 2,
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.active_key_version, 2);
    }
}
