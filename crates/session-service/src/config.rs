//! Session service configuration.
//!
//! All values come from environment variables. Secrets are held as
//! [`SecretString`] so `Debug` output stays safe.
//!
//! The two-part signing key MAY be absent at startup: credential issuance
//! then fails per request with a configuration error, while the health and
//! realtime-proxy endpoints keep working.

use common::grant::SigningKey;
use common::secret::SecretString;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default realtime provider base URL.
pub const DEFAULT_REALTIME_BASE_URL: &str = "https://api.openai.com";

/// Default realtime model identifier.
pub const DEFAULT_REALTIME_MODEL: &str = "gpt-realtime";

/// Default realtime voice identifier.
pub const DEFAULT_REALTIME_VOICE: &str = "marin";

/// Default bound on the provider call, in seconds.
pub const DEFAULT_REALTIME_TIMEOUT_SECS: u64 = 20;

/// Session service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: `0.0.0.0:8080`).
    pub bind_address: String,

    /// Two-part transport signing key. Either half may be empty; issuance
    /// checks before signing.
    pub signing_key: SigningKey,

    /// Long-lived realtime provider key. Outbound bearer credential only;
    /// never part of any response.
    pub realtime_api_key: SecretString,

    /// Realtime provider base URL.
    pub realtime_base_url: String,

    /// Model requested for ephemeral sessions.
    pub realtime_model: String,

    /// Voice requested for ephemeral sessions.
    pub realtime_voice: String,

    /// Bound on each provider call.
    pub realtime_timeout: Duration,

    /// Browser origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid realtime timeout: {0}")]
    InvalidTimeout(String),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `REALTIME_API_KEY` is absent or the
    /// timeout override is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    ///
    /// # Errors
    ///
    /// Same conditions as [`Config::from_env`].
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        // Absent halves load as empty strings; mint() rejects them per request
        let signing_key = SigningKey::new(
            vars.get("RTC_API_KEY").cloned().unwrap_or_default(),
            SecretString::from(vars.get("RTC_API_SECRET").cloned().unwrap_or_default()),
        );

        let realtime_api_key = vars
            .get("REALTIME_API_KEY")
            .map(|v| SecretString::from(v.clone()))
            .ok_or_else(|| ConfigError::MissingEnvVar("REALTIME_API_KEY".to_string()))?;

        let realtime_base_url = vars
            .get("REALTIME_BASE_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_REALTIME_BASE_URL.to_string());

        let realtime_model = vars
            .get("REALTIME_MODEL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_REALTIME_MODEL.to_string());

        let realtime_voice = vars
            .get("REALTIME_VOICE")
            .cloned()
            .unwrap_or_else(|| DEFAULT_REALTIME_VOICE.to_string());

        let realtime_timeout = match vars.get("REALTIME_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_REALTIME_TIMEOUT_SECS),
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                if secs == 0 {
                    return Err(ConfigError::InvalidTimeout(raw.clone()));
                }
                Duration::from_secs(secs)
            }
        };

        let allowed_origins = vars
            .get("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            bind_address,
            signing_key,
            realtime_api_key,
            realtime_base_url,
            realtime_model,
            realtime_voice,
            realtime_timeout,
            allowed_origins,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::secret::ExposeSecret;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([("REALTIME_API_KEY".to_string(), "sk-test".to_string())])
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = Config::from_vars(&base_vars()).expect("Config should load");

        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.realtime_base_url, DEFAULT_REALTIME_BASE_URL);
        assert_eq!(config.realtime_model, DEFAULT_REALTIME_MODEL);
        assert_eq!(config.realtime_voice, DEFAULT_REALTIME_VOICE);
        assert_eq!(
            config.realtime_timeout,
            Duration::from_secs(DEFAULT_REALTIME_TIMEOUT_SECS)
        );
        assert!(config.allowed_origins.is_empty());
        assert!(!config.signing_key.is_configured());
    }

    #[test]
    fn test_from_vars_missing_realtime_key() {
        let result = Config::from_vars(&HashMap::new());
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "REALTIME_API_KEY"));
    }

    #[test]
    fn test_from_vars_signing_key_halves() {
        let mut vars = base_vars();
        vars.insert("RTC_API_KEY".to_string(), "api-key-01".to_string());
        vars.insert("RTC_API_SECRET".to_string(), "shhh".to_string());

        let config = Config::from_vars(&vars).expect("Config should load");
        assert!(config.signing_key.is_configured());
        assert_eq!(config.signing_key.key_id, "api-key-01");
        assert_eq!(config.signing_key.secret.expose_secret(), "shhh");
    }

    #[test]
    fn test_from_vars_half_configured_key_is_not_configured() {
        let mut vars = base_vars();
        vars.insert("RTC_API_KEY".to_string(), "api-key-01".to_string());

        let config = Config::from_vars(&vars).expect("Config should load");
        assert!(!config.signing_key.is_configured());
    }

    #[test]
    fn test_from_vars_timeout_override() {
        let mut vars = base_vars();
        vars.insert("REALTIME_TIMEOUT_SECS".to_string(), "5".to_string());

        let config = Config::from_vars(&vars).expect("Config should load");
        assert_eq!(config.realtime_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_vars_invalid_timeout() {
        for bad in ["zero?", "-3", "0"] {
            let mut vars = base_vars();
            vars.insert("REALTIME_TIMEOUT_SECS".to_string(), bad.to_string());
            assert!(matches!(
                Config::from_vars(&vars),
                Err(ConfigError::InvalidTimeout(_))
            ));
        }
    }

    #[test]
    fn test_from_vars_allowed_origins_parsing() {
        let mut vars = base_vars();
        vars.insert(
            "ALLOWED_ORIGINS".to_string(),
            "http://localhost:8080, http://127.0.0.1:8080,".to_string(),
        );

        let config = Config::from_vars(&vars).expect("Config should load");
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:8080", "http://127.0.0.1:8080"]
        );
    }

    #[test]
    fn test_debug_redacts_provider_key() {
        let config = Config::from_vars(&base_vars()).expect("Config should load");
        let debug_str = format!("{config:?}");
        assert!(!debug_str.contains("sk-test"));
    }
}
