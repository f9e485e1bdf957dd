//! Agent configuration, loaded from the environment at startup.

use common::grant::{self, AccessGrant, GrantError, SigningKey};
use common::secret::SecretString;
use std::collections::HashMap;
use thiserror::Error;

/// Room joined when none is supplied on the command line.
pub const DEFAULT_ROOM: &str = "dev-room";

/// Identity the agent announces itself as.
pub const DEFAULT_AGENT_IDENTITY: &str = "agent-cora";

/// Display name published alongside the agent's identity.
pub const DEFAULT_AGENT_NAME: &str = "Cora";

/// Configuration errors that prevent the agent from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// A numeric override failed to parse or is out of range.
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue {
        /// The offending variable.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Agent settings: where to connect and as whom.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// URL of the real-time server the transport dials.
    pub server_url: String,

    /// Key pair used to mint the agent's own join token.
    pub signing_key: SigningKey,

    /// Room to join.
    pub room: String,

    /// Identity the agent joins under.
    pub identity: String,

    /// Human-readable name for the agent.
    pub display_name: String,

    /// Capacity of the inbound/outbound transport channels.
    pub channel_capacity: usize,

    /// Cap on concurrently in-flight outbound publishes.
    pub max_inflight_publishes: usize,
}

impl AgentConfig {
    /// Load configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when `RTC_SERVER_URL`, `RTC_API_KEY`, or
    /// `RTC_API_SECRET` is absent, or a numeric override is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Load configuration from the supplied variable map.
    ///
    /// # Errors
    ///
    /// Same conditions as [`AgentConfig::from_env`].
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let server_url = require(vars, "RTC_SERVER_URL")?;
        let key_id = require(vars, "RTC_API_KEY")?;
        let secret = require(vars, "RTC_API_SECRET")?;

        let room = vars
            .get("DEV_ROOM")
            .cloned()
            .unwrap_or_else(|| DEFAULT_ROOM.to_string());
        let identity = vars
            .get("AGENT_IDENTITY")
            .cloned()
            .unwrap_or_else(|| DEFAULT_AGENT_IDENTITY.to_string());
        let display_name = vars
            .get("AGENT_NAME")
            .cloned()
            .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string());

        let channel_capacity = positive_or(
            vars,
            "AGENT_CHANNEL_CAPACITY",
            crate::transport::DEFAULT_CHANNEL_CAPACITY,
        )?;
        let max_inflight_publishes = positive_or(
            vars,
            "AGENT_MAX_INFLIGHT_PUBLISHES",
            crate::router::DEFAULT_MAX_INFLIGHT_PUBLISHES,
        )?;

        Ok(Self {
            server_url,
            signing_key: SigningKey {
                key_id,
                secret: SecretString::from(secret),
            },
            room,
            identity,
            display_name,
            channel_capacity,
            max_inflight_publishes,
        })
    }

    /// Mint the join token the transport presents when connecting.
    ///
    /// # Errors
    ///
    /// Returns an error when the identity or room is invalid, or when
    /// signing fails.
    pub fn join_token(&self) -> Result<String, GrantError> {
        let join_grant = AccessGrant::new(self.room.clone(), self.identity.clone(), true, true)?;
        grant::mint(&join_grant, &self.signing_key, Some(&self.display_name))
    }
}

fn require(vars: &HashMap<String, String>, name: &str) -> Result<String, ConfigError> {
    vars.get(name)
        .filter(|value| !value.is_empty())
        .cloned()
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn positive_or(
    vars: &HashMap<String, String>,
    name: &str,
    default: usize,
) -> Result<usize, ConfigError> {
    match vars.get(name) {
        None => Ok(default),
        Some(raw) => match raw.parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            Ok(_) => Err(ConfigError::InvalidValue {
                name: name.to_string(),
                reason: "must be greater than zero".to_string(),
            }),
            Err(err) => Err(ConfigError::InvalidValue {
                name: name.to_string(),
                reason: err.to_string(),
            }),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert(
            "RTC_SERVER_URL".to_string(),
            "wss://rtc.example.com".to_string(),
        );
        vars.insert("RTC_API_KEY".to_string(), "key-1".to_string());
        vars.insert(
            "RTC_API_SECRET".to_string(),
            "a-secret-long-enough-for-tests".to_string(),
        );
        vars
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = AgentConfig::from_vars(&base_vars()).unwrap();

        assert_eq!(config.server_url, "wss://rtc.example.com");
        assert_eq!(config.room, DEFAULT_ROOM);
        assert_eq!(config.identity, DEFAULT_AGENT_IDENTITY);
        assert_eq!(config.display_name, DEFAULT_AGENT_NAME);
        assert_eq!(
            config.channel_capacity,
            crate::transport::DEFAULT_CHANNEL_CAPACITY
        );
        assert_eq!(
            config.max_inflight_publishes,
            crate::router::DEFAULT_MAX_INFLIGHT_PUBLISHES
        );
    }

    #[test]
    fn test_from_vars_overrides() {
        let mut vars = base_vars();
        vars.insert("DEV_ROOM".to_string(), "standup".to_string());
        vars.insert("AGENT_IDENTITY".to_string(), "agent-scribe".to_string());
        vars.insert("AGENT_CHANNEL_CAPACITY".to_string(), "128".to_string());
        vars.insert("AGENT_MAX_INFLIGHT_PUBLISHES".to_string(), "8".to_string());

        let config = AgentConfig::from_vars(&vars).unwrap();
        assert_eq!(config.room, "standup");
        assert_eq!(config.identity, "agent-scribe");
        assert_eq!(config.channel_capacity, 128);
        assert_eq!(config.max_inflight_publishes, 8);
    }

    #[test]
    fn test_missing_server_url_fails() {
        let mut vars = base_vars();
        vars.remove("RTC_SERVER_URL");

        let err = AgentConfig::from_vars(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "RTC_SERVER_URL"));
    }

    #[test]
    fn test_empty_api_secret_fails() {
        let mut vars = base_vars();
        vars.insert("RTC_API_SECRET".to_string(), String::new());

        let err = AgentConfig::from_vars(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "RTC_API_SECRET"));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut vars = base_vars();
        vars.insert("AGENT_CHANNEL_CAPACITY".to_string(), "0".to_string());

        let err = AgentConfig::from_vars(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name, .. } if name == "AGENT_CHANNEL_CAPACITY"));
    }

    #[test]
    fn test_join_token_is_verifiable() {
        let config = AgentConfig::from_vars(&base_vars()).unwrap();
        let token = config.join_token().unwrap();

        let claims = grant::verify(&token, &config.signing_key).unwrap();
        assert_eq!(claims.sub, DEFAULT_AGENT_IDENTITY);
        assert_eq!(claims.video.room, DEFAULT_ROOM);
        assert!(claims.video.can_publish);
        assert!(claims.video.can_subscribe);
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let config = AgentConfig::from_vars(&base_vars()).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("a-secret-long-enough-for-tests"));
    }
}
