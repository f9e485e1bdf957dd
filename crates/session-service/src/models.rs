//! Request and response bodies for the session service API.

use serde::{Deserialize, Serialize};

/// Body for `POST /session`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    /// Caller-supplied user identifier; identity derivation is
    /// deterministic over this value.
    pub user_id: String,

    /// Explicit room to join. Absent means "generate a fresh one".
    #[serde(default)]
    pub room: Option<String>,

    /// Display name carried into the credential.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Prefix for generated room names (default `sess`).
    #[serde(default)]
    pub room_prefix: Option<String>,
}

/// Response for `POST /session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Room the credential is valid for.
    pub room: String,

    /// Identity derived from the caller's `user_id`.
    pub identity: String,

    /// Signed room-join credential.
    pub token: String,
}

/// Body for `POST /token`.
#[derive(Debug, Clone, Deserialize)]
pub struct MintTokenRequest {
    /// Caller-supplied participant identity.
    pub identity: String,

    /// Room the token should grant access to.
    pub room: String,

    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Response for `POST /token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintTokenResponse {
    /// Signed room-join credential.
    pub token: String,
}

/// Response for `GET /session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphemeralSessionResponse {
    /// Short-lived provider secret for the browser.
    pub client_secret: String,

    /// Model the secret was issued for.
    pub model: String,

    /// Voice the secret was issued for.
    pub voice: String,
}

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves traffic.
    pub status: &'static str,
}

/// Response for `GET /healthz`.
#[derive(Debug, Serialize)]
pub struct HealthzResponse {
    /// Always `true` while the process serves traffic.
    pub ok: bool,
}
