//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use them for all
//! sensitive values: the transport signing secret, the realtime provider key,
//! and issued bearer tokens.
//!
//! `SecretString` implements `Debug` with redaction, so any struct that
//! derives `Debug` while holding one cannot leak the value through `{:?}` or
//! tracing fields. Reading the value requires an explicit
//! [`ExposeSecret::expose_secret`] call, which keeps every access greppable.
//!
//! Secrets are zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::SecretString;
//! use secrecy::ExposeSecret;
//!
//! #[derive(Debug)]
//! struct ProviderCredentials {
//!     endpoint: String,
//!     api_key: SecretString,
//! }
//!
//! let creds = ProviderCredentials {
//!     endpoint: "https://api.example.com".to_string(),
//!     api_key: SecretString::from("sk-live-123"),
//! };
//!
//! // Safe: api_key renders as [REDACTED]
//! println!("{creds:?}");
//!
//! // Explicit access only
//! let key: &str = creds.api_key.expose_secret();
//! # let _ = key;
//! ```

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretBox, SecretString};
