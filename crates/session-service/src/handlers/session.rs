//! Session endpoints.
//!
//! - `GET /session` proxies the realtime provider's ephemeral-secret
//!   issuance; the long-lived provider key never leaves this process.
//! - `POST /session` brokers a room-join credential, generating a fresh
//!   room name when the caller supplies none.

use crate::errors::ApiError;
use crate::models::{CreateSessionRequest, EphemeralSessionResponse, SessionResponse};
use crate::routes::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::instrument;

/// `GET /session`
///
/// Creates an ephemeral realtime session and returns the client secret the
/// browser needs.
#[instrument(skip_all, name = "api.session.ephemeral")]
pub async fn get_ephemeral_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EphemeralSessionResponse>, ApiError> {
    let session = state.realtime.create_ephemeral_session().await?;
    Ok(Json(session))
}

/// `POST /session`
///
/// Brokers a room-join credential for the caller's user id.
#[instrument(skip_all, name = "api.session.create")]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.broker.create_session(
        &payload.user_id,
        payload.room.as_deref(),
        payload.room_prefix.as_deref(),
        payload.display_name.as_deref(),
    )?;

    Ok(Json(SessionResponse {
        room: session.room,
        identity: session.identity,
        token: session.token,
    }))
}
