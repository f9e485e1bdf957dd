//! Realtime provider proxy for ephemeral session secrets.
//!
//! The browser needs a short-lived provider secret but must never see the
//! long-lived provider key, so this service performs the session-issuance
//! call server-side and forwards only the ephemeral secret.
//!
//! # Security
//!
//! - The provider key is used solely as an outbound bearer credential
//! - Every call is bounded by the configured timeout
//! - Failure payloads carry the provider's body, never our credentials

use common::secret::{ExposeSecret, SecretString};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::EphemeralSessionResponse;

/// Provider path for ephemeral session issuance.
pub const SESSIONS_PATH: &str = "/v1/realtime/sessions";

/// Connect timeout, separate from the overall request bound.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default instructions sent with every ephemeral session.
const SESSION_INSTRUCTIONS: &str =
    "You are a helpful voice assistant for this room. Keep replies short and speak in English.";

/// Errors from the proxy path. Each maps to a distinct outward status.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Transport or connection failure, including the timeout bound.
    #[error("failed to reach realtime provider: {0}")]
    Unreachable(String),

    /// The provider answered with an error status.
    #[error("realtime provider rejected the request: status {status}")]
    Rejected { status: u16, body: Value },

    /// The provider answered success without a usable client secret.
    #[error("realtime provider response carried no client secret")]
    MalformedResponse { raw: Value },

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

/// Configuration payload sent to the provider.
#[derive(Debug, Serialize)]
struct SessionRequestBody<'a> {
    model: &'a str,
    voice: &'a str,
    instructions: &'a str,
}

/// Proxy over the realtime provider's session-issuance endpoint.
#[derive(Clone)]
pub struct RealtimeProxy {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    voice: String,
}

impl RealtimeProxy {
    /// Create a proxy with a bounded-timeout HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::ClientBuild`] if the client cannot be built.
    pub fn new(
        base_url: String,
        api_key: SecretString,
        model: String,
        voice: String,
        timeout: Duration,
    ) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| ProxyError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
            voice,
        })
    }

    /// Request an ephemeral session and extract its client secret.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::Unreachable`] on transport failure or timeout
    /// - [`ProxyError::Rejected`] on a provider error status, carrying the
    ///   provider's raw body
    /// - [`ProxyError::MalformedResponse`] when the success body has no
    ///   non-empty client secret
    #[instrument(skip(self), fields(model = %self.model, voice = %self.voice))]
    pub async fn create_ephemeral_session(
        &self,
    ) -> Result<EphemeralSessionResponse, ProxyError> {
        let url = format!("{}{SESSIONS_PATH}", self.base_url);
        let body = SessionRequestBody {
            model: &self.model,
            voice: &self.voice,
            instructions: SESSION_INSTRUCTIONS,
        };

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(target: "api.realtime", error = %e, "Provider request failed");
                ProxyError::Unreachable(e.to_string())
            })?;

        let status = response.status();
        let raw: Value = response
            .json()
            .await
            .unwrap_or_else(|e| Value::String(format!("unparseable provider body: {e}")));

        if !status.is_success() {
            warn!(
                target: "api.realtime",
                status = status.as_u16(),
                "Provider rejected session request"
            );
            return Err(ProxyError::Rejected {
                status: status.as_u16(),
                body: raw,
            });
        }

        let client_secret = extract_client_secret(&raw).ok_or_else(|| {
            warn!(target: "api.realtime", "Provider response carried no client secret");
            ProxyError::MalformedResponse { raw: raw.clone() }
        })?;

        debug!(target: "api.realtime", "Issued ephemeral session secret");

        Ok(EphemeralSessionResponse {
            client_secret,
            model: self.model.clone(),
            voice: self.voice.clone(),
        })
    }
}

/// Pull the secret out of a provider success body.
///
/// Accepts both shapes the provider has used: the nested
/// `{"client_secret":{"value":"..."}}` and a flat string
/// `{"client_secret":"..."}`. Empty values count as absent.
fn extract_client_secret(raw: &Value) -> Option<String> {
    let field = raw.get("client_secret")?;

    let secret = match field {
        Value::String(s) => s.as_str(),
        nested => nested.get("value")?.as_str()?,
    };

    if secret.is_empty() {
        None
    } else {
        Some(secret.to_string())
    }
}
