//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorResponse,
    HealthResponse,
};
use common::ServiceError;
use token_vault::{decrypt_token, encrypt_token, BindingContext, VaultError};
use tracing::{info, warn};

use super::state::AppState;

/// `POST /v1/tokens/encrypt`: seal a token for its tenant/provider/class.
///
/// Uses the active key version unless the request names another loaded
/// version. The returned `record` is the storage shape, ready to persist.
pub async fn encrypt(
    State(state): State<AppState>,
    body: Result<Json<EncryptRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected_body(rejection),
    };

    let key_version = req
        .key_version
        .unwrap_or_else(|| state.keyring.active_version());
    let ctx = match BindingContext::new(req.tenant_id, req.provider, req.token_class, key_version)
    {
        Ok(c) => c,
        Err(e) => return error_response(e.into()),
    };
    let secret = match state.keyring.secret(key_version) {
        Ok(s) => s,
        Err(e) => return error_response(ServiceError::BadRequest(e.to_string())),
    };

    match encrypt_token(secret, &ctx, req.plaintext.as_bytes()) {
        Ok(record) => {
            info!(
                tenant_id = ctx.tenant_id(),
                provider = ctx.provider(),
                token_class = ctx.token_class(),
                key_version,
                "token encrypted"
            );
            let record = record.with_expires_at(req.expires_at);
            (StatusCode::OK, Json(EncryptResponse { record })).into_response()
        }
        Err(e) => sealing_failed(e),
    }
}

/// The context is validated before sealing, so a failure here is a server
/// fault rather than a caller error.
fn sealing_failed(err: VaultError) -> Response {
    warn!(error = %err, "encryption failed");
    error_response(ServiceError::Internal(err.to_string()))
}

/// `POST /v1/tokens/decrypt`: open a stored record.
///
/// The master secret is selected by the record's own `key_version`; there is
/// no fallback to another version. Any authentication failure is reported as
/// a single `422 record_rejected`.
pub async fn decrypt(
    State(state): State<AppState>,
    body: Result<Json<DecryptRequest>, JsonRejection>,
) -> Response {
    let Json(DecryptRequest { record }) = match body {
        Ok(b) => b,
        Err(rejection) => return rejected_body(rejection),
    };

    let secret = match state.keyring.secret(record.key_version()) {
        Ok(s) => s,
        Err(e) => return error_response(ServiceError::BadRequest(e.to_string())),
    };

    match decrypt_token(secret, &record) {
        Ok(plaintext) => (StatusCode::OK, Json(DecryptResponse { plaintext })).into_response(),
        Err(e) => {
            if e == VaultError::AuthenticationFailure {
                warn!(
                    tenant_id = record.tenant_id(),
                    provider = record.provider(),
                    token_class = record.token_class(),
                    key_version = record.key_version(),
                    "token record failed authentication"
                );
            }
            error_response(e.into())
        }
    }
}

/// `GET /health`: liveness check and key inventory.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        active_key_version: state.keyring.active_version(),
        key_versions_loaded: state.keyring.version_count(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse::new(err.code(), err.to_string());
    (status, Json(body)).into_response()
}

/// Malformed JSON, missing fields, and records that fail structural checks
/// all land here as 400. Oversized bodies keep their 413.
fn rejected_body(rejection: JsonRejection) -> Response {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let body = ErrorResponse::new("payload_too_large", rejection.body_text());
        return (StatusCode::PAYLOAD_TOO_LARGE, Json(body)).into_response();
    }
    error_response(ServiceError::BadRequest(rejection.body_text()))
}
