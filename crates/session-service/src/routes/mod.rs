//! HTTP routes for the session service.
//!
//! Defines the Axum router, shared application state, and the CORS policy
//! derived from the configured browser origins.

use crate::handlers;
use crate::services::{RealtimeProxy, SessionBroker};
use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::warn;

/// Request deadline applied to every route.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Credential issuance.
    pub broker: SessionBroker,

    /// Realtime provider proxy.
    pub realtime: RealtimeProxy,
}

/// Build the application routes.
///
/// - `GET /health`, `GET /healthz` - liveness probes
/// - `GET /session` - ephemeral provider secret
/// - `POST /session` - brokered room credential
/// - `POST /token` - credential for a pre-provisioned identity/room
///
/// Layer order (bottom-to-top execution): timeout, then trace, then CORS.
pub fn build_routes(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/healthz", get(handlers::healthz_check))
        .route(
            "/session",
            get(handlers::get_ephemeral_session).post(handlers::create_session),
        )
        .route("/token", post(handlers::mint_token))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
}

/// CORS policy over the configured origin list.
///
/// Unparseable origins are skipped with a warning rather than failing
/// startup; an empty list yields a layer that allows no cross-origin
/// callers.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(target: "api.cors", origin = %origin, "Skipping unparseable origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_cors_layer_tolerates_bad_origins() {
        // Must not panic or error; the bad entry is dropped
        let _ = cors_layer(&["http://localhost:8080".to_string(), "\u{7f}".to_string()]);
    }

    #[test]
    fn test_config_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<Config>();
    }
}
