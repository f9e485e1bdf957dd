//! Access grants and signed room-join credentials.
//!
//! A grant names a room, an identity, and the two capability flags the
//! transport understands (publish, subscribe). [`mint`] encodes one grant
//! into a signed HS256 JWT that the transport verifies with the same
//! two-part key. Issuance is stateless: no record of outstanding tokens is
//! kept, expiry lives inside the token itself.
//!
//! # Security
//!
//! - Key material is checked before any signing attempt; a half-configured
//!   key fails fast with [`GrantError::MissingKeyMaterial`].
//! - The secret half of the key is a [`SecretString`] and never appears in
//!   `Debug` output or error messages.

use crate::secret::{ExposeSecret, SecretString};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum accepted length for room and identity names, in bytes.
pub const MAX_NAME_LEN: usize = 256;

/// Token lifetime encoded into every minted credential (6 hours).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 6 * 60 * 60;

/// Errors that can occur while constructing or signing a grant.
#[derive(Error, Debug)]
pub enum GrantError {
    /// One or both halves of the signing key are absent or empty.
    #[error("signing key material is missing or empty")]
    MissingKeyMaterial,

    /// The grant fields failed validation.
    #[error("invalid grant: {0}")]
    InvalidGrant(String),

    /// JWT encoding failed.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// JWT decoding or signature verification failed.
    #[error("token verification failed: {0}")]
    Verification(String),
}

/// Permissions encoded into a room-join credential.
///
/// Immutable once constructed; the constructor is the only place the
/// non-empty / bounded-length invariants are enforced, so holding an
/// `AccessGrant` means holding a valid one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    room: String,
    identity: String,
    can_publish: bool,
    can_subscribe: bool,
}

impl AccessGrant {
    /// Create a grant for `identity` to join `room` with the given
    /// capability flags.
    ///
    /// # Errors
    ///
    /// Returns [`GrantError::InvalidGrant`] if `room` or `identity` is empty
    /// or longer than [`MAX_NAME_LEN`] bytes.
    pub fn new(
        room: impl Into<String>,
        identity: impl Into<String>,
        can_publish: bool,
        can_subscribe: bool,
    ) -> Result<Self, GrantError> {
        let room = room.into();
        let identity = identity.into();
        validate_name("room", &room)?;
        validate_name("identity", &identity)?;

        Ok(Self {
            room,
            identity,
            can_publish,
            can_subscribe,
        })
    }

    /// Room this grant authorizes joining.
    #[must_use]
    pub fn room(&self) -> &str {
        &self.room
    }

    /// Participant identity encoded into the credential.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Whether the holder may publish to the room.
    #[must_use]
    pub fn can_publish(&self) -> bool {
        self.can_publish
    }

    /// Whether the holder may subscribe to room traffic.
    #[must_use]
    pub fn can_subscribe(&self) -> bool {
        self.can_subscribe
    }
}

fn validate_name(field: &str, value: &str) -> Result<(), GrantError> {
    if value.is_empty() {
        return Err(GrantError::InvalidGrant(format!("{field} must not be empty")));
    }
    if value.len() > MAX_NAME_LEN {
        return Err(GrantError::InvalidGrant(format!(
            "{field} exceeds {MAX_NAME_LEN} bytes"
        )));
    }
    Ok(())
}

/// Two-part signing key: a public identifier and a shared secret.
///
/// The secret half is redacted in `Debug` output via [`SecretString`].
#[derive(Debug, Clone)]
pub struct SigningKey {
    /// Key identifier, carried as the token issuer (`iss`) claim.
    pub key_id: String,

    /// Shared secret used for HS256 signing.
    pub secret: SecretString,
}

impl SigningKey {
    /// Create a signing key from its two halves.
    #[must_use]
    pub fn new(key_id: impl Into<String>, secret: SecretString) -> Self {
        Self {
            key_id: key_id.into(),
            secret,
        }
    }

    /// True when both halves are present and non-empty.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.key_id.is_empty() && !self.secret.expose_secret().is_empty()
    }
}

/// Room-level permission block inside the JWT.
///
/// Field names follow the transport verifier's camelCase wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomGrantClaims {
    /// Room the token is valid for.
    pub room: String,

    /// Join permission; always true for minted tokens.
    #[serde(rename = "roomJoin")]
    pub room_join: bool,

    /// Publish capability.
    #[serde(rename = "canPublish")]
    pub can_publish: bool,

    /// Subscribe capability.
    #[serde(rename = "canSubscribe")]
    pub can_subscribe: bool,
}

/// Full claim set of a minted room-join credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Issuer: the signing key id.
    pub iss: String,

    /// Subject: the participant identity.
    pub sub: String,

    /// Not-before timestamp (Unix epoch seconds).
    pub nbf: i64,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Optional display name shown to other participants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Room permission block.
    pub video: RoomGrantClaims,
}

/// Mint a signed room-join credential for `grant`.
///
/// The optional `display_name` is carried in the `name` claim. Two calls
/// with identical inputs may produce different strings (issuance time is
/// embedded), but both verify to the same grant.
///
/// # Errors
///
/// - [`GrantError::MissingKeyMaterial`] if either half of `key` is empty.
///   Checked before signing: a missing secret must not be discovered
///   partway through.
/// - [`GrantError::Signing`] if JWT encoding fails.
pub fn mint(
    grant: &AccessGrant,
    key: &SigningKey,
    display_name: Option<&str>,
) -> Result<String, GrantError> {
    if !key.is_configured() {
        return Err(GrantError::MissingKeyMaterial);
    }

    let now = Utc::now().timestamp();
    let claims = AccessClaims {
        iss: key.key_id.clone(),
        sub: grant.identity.clone(),
        nbf: now,
        iat: now,
        exp: now + DEFAULT_TOKEN_TTL_SECS,
        name: display_name.map(ToString::to_string),
        video: RoomGrantClaims {
            room: grant.room.clone(),
            room_join: true,
            can_publish: grant.can_publish,
            can_subscribe: grant.can_subscribe,
        },
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(key.secret.expose_secret().as_bytes()),
    )
    .map_err(|e| GrantError::Signing(e.to_string()))
}

/// Verify a credential with the matching key and recover its claims.
///
/// This is the public-equivalent check: any holder of the shared secret can
/// validate a minted token and read back the encoded grant.
///
/// # Errors
///
/// - [`GrantError::MissingKeyMaterial`] if either half of `key` is empty.
/// - [`GrantError::Verification`] on bad signature, wrong algorithm, or an
///   expired token.
pub fn verify(token: &str, key: &SigningKey) -> Result<AccessClaims, GrantError> {
    if !key.is_configured() {
        return Err(GrantError::MissingKeyMaterial);
    }

    let validation = Validation::new(Algorithm::HS256);
    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(key.secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| GrantError::Verification(e.to_string()))
}
