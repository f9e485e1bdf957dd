//! Health check handlers.
//!
//! Two spellings of the same liveness probe: `/health` answers
//! `{"status":"ok"}`, `/healthz` answers `{"ok":true}`. The service holds no
//! connections or state worth probing, so both are unconditional.

use crate::models::{HealthResponse, HealthzResponse};
use axum::Json;

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /healthz`
pub async fn healthz_check() -> Json<HealthzResponse> {
    Json(HealthzResponse { ok: true })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_body() {
        let Json(body) = health_check().await;
        assert_eq!(serde_json::to_value(body).unwrap(), serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_healthz_body() {
        let Json(body) = healthz_check().await;
        assert_eq!(serde_json::to_value(body).unwrap(), serde_json::json!({"ok": true}));
    }
}
