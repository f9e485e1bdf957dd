//! Session service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl:
//!
//! - `Configuration`, `Internal`, `UpstreamMalformedResponse`: 500
//! - `UpstreamUnreachable`: 502
//! - `UpstreamRejected`: the provider's own status, passed through
//! - `BadRequest`: 400
//!
//! Upstream failures carry the provider's raw body for diagnostics; the
//! long-lived provider key and the signing secret never appear in any
//! variant, response, or log line.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::grant::GrantError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::services::realtime::ProxyError;

/// Session service error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Server-side secrets are absent or invalid. A server fault, not a
    /// client error, and never retried automatically.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The realtime provider could not be reached within the bound.
    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// The realtime provider answered with an error status.
    #[error("Upstream rejected the request with status {status}")]
    UpstreamRejected { status: u16, body: Value },

    /// The realtime provider answered success without a usable secret.
    #[error("Upstream returned a malformed response")]
    UpstreamMalformedResponse { raw: Value },

    /// The caller's request body failed validation.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Generic internal error.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Configuration(_)
            | ApiError::UpstreamMalformedResponse { .. }
            | ApiError::Internal => 500,
            ApiError::UpstreamUnreachable(_) => 502,
            ApiError::UpstreamRejected { status, .. } => *status,
            ApiError::BadRequest(_) => 400,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    /// Raw upstream body, present on proxy-path failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match self {
            ApiError::Configuration(reason) => {
                // Log the specific fault server-side, return a generic message
                tracing::error!(target: "api.config", reason = %reason, "Configuration fault");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "Service is not configured for this operation".to_string(),
                    None,
                )
            }
            ApiError::UpstreamUnreachable(reason) => {
                tracing::warn!(target: "api.realtime", reason = %reason, "Provider unreachable");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNREACHABLE",
                    "Failed to reach the realtime provider".to_string(),
                    None,
                )
            }
            ApiError::UpstreamRejected { status, body } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "UPSTREAM_REJECTED",
                "The realtime provider rejected the request".to_string(),
                Some(body),
            ),
            ApiError::UpstreamMalformedResponse { raw } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_MALFORMED_RESPONSE",
                "The realtime provider returned no client secret".to_string(),
                Some(raw),
            ),
            ApiError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason, None)
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
                None,
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                detail,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<GrantError> for ApiError {
    fn from(err: GrantError) -> Self {
        match err {
            GrantError::MissingKeyMaterial => {
                ApiError::Configuration("signing key material is absent".to_string())
            }
            GrantError::InvalidGrant(reason) => ApiError::BadRequest(reason),
            GrantError::Signing(reason) => {
                tracing::error!(target: "api.grant", reason = %reason, "Token signing failed");
                ApiError::Internal
            }
            GrantError::Verification(reason) => ApiError::BadRequest(reason),
        }
    }
}

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::Unreachable(reason) => ApiError::UpstreamUnreachable(reason),
            ProxyError::Rejected { status, body } => ApiError::UpstreamRejected { status, body },
            ProxyError::MalformedResponse { raw } => ApiError::UpstreamMalformedResponse { raw },
            ProxyError::ClientBuild(reason) => {
                tracing::error!(target: "api.realtime", reason = %reason, "HTTP client build failed");
                ApiError::Internal
            }
        }
    }
}
