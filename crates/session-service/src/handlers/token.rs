//! Token endpoint for pre-provisioned identity/room pairs.

use crate::errors::ApiError;
use crate::models::{MintTokenRequest, MintTokenResponse};
use crate::routes::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::instrument;

/// `POST /token`
///
/// Mints a room-join credential for a caller-supplied identity and room,
/// without the auto-generation path. Used for testing and for agents that
/// join a known room.
#[instrument(skip_all, name = "api.token.mint")]
pub async fn mint_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MintTokenRequest>,
) -> Result<Json<MintTokenResponse>, ApiError> {
    let token = state
        .broker
        .mint_for(&payload.identity, &payload.room, payload.name.as_deref())?;

    Ok(Json(MintTokenResponse { token }))
}
