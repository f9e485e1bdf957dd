use session_service::config::Config;
use session_service::routes::{self, AppState};
use session_service::services::{RealtimeProxy, SessionBroker};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "session_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Session Service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if !config.signing_key.is_configured() {
        // Not fatal: issuance endpoints fail per request until keys arrive
        tracing::warn!("Signing key material is absent; credential issuance will fail");
    }

    let realtime = RealtimeProxy::new(
        config.realtime_base_url.clone(),
        config.realtime_api_key.clone(),
        config.realtime_model.clone(),
        config.realtime_voice.clone(),
        config.realtime_timeout,
    )
    .map_err(|e| {
        error!("Failed to build realtime proxy: {}", e);
        e
    })?;

    let state = Arc::new(AppState {
        broker: SessionBroker::new(config.signing_key.clone()),
        realtime,
    });

    let app = routes::build_routes(state, &config.allowed_origins);

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Session Service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
