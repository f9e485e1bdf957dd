//! Session broker: room naming, identity derivation, credential issuance.
//!
//! The broker decides WHAT goes into a grant; the actual signing lives in
//! [`common::grant`]. Issuance is stateless: nothing is recorded, the caller
//! receives the only copy of the token.

use common::grant::{self, AccessGrant, GrantError, SigningKey};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Default prefix for generated room names.
pub const DEFAULT_ROOM_PREFIX: &str = "sess";

/// Fixed prefix for identities derived from a user id.
const IDENTITY_PREFIX: &str = "user-";

/// A freshly brokered session.
#[derive(Debug, Clone)]
pub struct BrokeredSession {
    /// Room the credential is valid for.
    pub room: String,

    /// Identity derived from the user id.
    pub identity: String,

    /// Signed room-join credential.
    pub token: String,
}

/// Brokers room-join credentials against a single signing key.
#[derive(Debug, Clone)]
pub struct SessionBroker {
    signing_key: SigningKey,
}

impl SessionBroker {
    /// Create a broker over the given signing key. The key may be
    /// unconfigured; every issuance re-checks it.
    #[must_use]
    pub fn new(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }

    /// Create a session for `user_id`.
    ///
    /// Without an explicit `room`, a fresh name is generated as
    /// `{prefix}-{uuid}`; the 128-bit suffix makes collisions across
    /// concurrent callers negligible. The identity is derived
    /// deterministically (`user-{user_id}`) so the same user can rejoin a
    /// room under the same identity. Both capabilities are always granted
    /// in this revision.
    ///
    /// # Errors
    ///
    /// - [`GrantError::InvalidGrant`] for an empty `user_id` or an invalid
    ///   explicit room name
    /// - [`GrantError::MissingKeyMaterial`] when the signing key is absent
    #[instrument(skip(self), fields(has_room = room.is_some()))]
    pub fn create_session(
        &self,
        user_id: &str,
        room: Option<&str>,
        room_prefix: Option<&str>,
        display_name: Option<&str>,
    ) -> Result<BrokeredSession, GrantError> {
        if user_id.is_empty() {
            return Err(GrantError::InvalidGrant(
                "user_id must not be empty".to_string(),
            ));
        }

        let room = match room {
            Some(explicit) => explicit.to_string(),
            None => generate_room_name(room_prefix.unwrap_or(DEFAULT_ROOM_PREFIX)),
        };
        let identity = format!("{IDENTITY_PREFIX}{user_id}");

        let grant = AccessGrant::new(room.clone(), identity.clone(), true, true)?;
        let token = grant::mint(&grant, &self.signing_key, display_name)?;

        debug!(
            target: "api.broker",
            room = %room,
            identity = %identity,
            "Issued session credential"
        );

        Ok(BrokeredSession {
            room,
            identity,
            token,
        })
    }

    /// Mint a credential for a caller-supplied identity/room pair.
    ///
    /// No auto-generation: used for pre-provisioned flows such as the agent
    /// joining its configured room.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SessionBroker::create_session`], with the
    /// identity validated as given.
    #[instrument(skip(self))]
    pub fn mint_for(
        &self,
        identity: &str,
        room: &str,
        display_name: Option<&str>,
    ) -> Result<String, GrantError> {
        let grant = AccessGrant::new(room, identity, true, true)?;
        grant::mint(&grant, &self.signing_key, display_name)
    }
}

/// Generate a collision-resistant room name.
fn generate_room_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::secret::SecretString;

    fn broker() -> SessionBroker {
        SessionBroker::new(SigningKey::new(
            "api-key-01",
            SecretString::from("0123456789abcdef0123456789abcdef"),
        ))
    }

    fn key() -> SigningKey {
        SigningKey::new(
            "api-key-01",
            SecretString::from("0123456789abcdef0123456789abcdef"),
        )
    }

    #[test]
    fn test_same_user_twice_gets_distinct_rooms_same_identity() {
        let broker = broker();

        let first = broker.create_session("42", None, None, None).unwrap();
        let second = broker.create_session("42", None, None, None).unwrap();

        assert_ne!(first.room, second.room);
        assert_eq!(first.identity, "user-42");
        assert_eq!(second.identity, "user-42");
    }

    #[test]
    fn test_generated_room_uses_prefix() {
        let broker = broker();

        let default = broker.create_session("42", None, None, None).unwrap();
        assert!(default.room.starts_with("sess-"));

        let custom = broker
            .create_session("42", None, Some("standup"), None)
            .unwrap();
        assert!(custom.room.starts_with("standup-"));
    }

    #[test]
    fn test_explicit_room_is_kept_verbatim() {
        let broker = broker();

        let session = broker
            .create_session("42", Some("dev-room"), Some("ignored"), None)
            .unwrap();
        assert_eq!(session.room, "dev-room");
    }

    #[test]
    fn test_issued_token_grants_both_capabilities() {
        let broker = broker();

        let session = broker.create_session("42", None, None, None).unwrap();
        let claims = grant::verify(&session.token, &key()).unwrap();

        assert_eq!(claims.sub, session.identity);
        assert_eq!(claims.video.room, session.room);
        assert!(claims.video.can_publish);
        assert!(claims.video.can_subscribe);
    }

    #[test]
    fn test_display_name_is_carried_through() {
        let broker = broker();

        let session = broker
            .create_session("42", None, None, Some("Alice"))
            .unwrap();
        let claims = grant::verify(&session.token, &key()).unwrap();
        assert_eq!(claims.name, Some("Alice".to_string()));
    }

    #[test]
    fn test_empty_user_id_is_rejected() {
        let result = broker().create_session("", None, None, None);
        assert!(matches!(result, Err(GrantError::InvalidGrant(_))));
    }

    #[test]
    fn test_unconfigured_key_fails_issuance() {
        let broker = SessionBroker::new(SigningKey::new("", SecretString::from("")));

        let result = broker.create_session("42", None, None, None);
        assert!(matches!(result, Err(GrantError::MissingKeyMaterial)));

        let result = broker.mint_for("agent", "dev-room", None);
        assert!(matches!(result, Err(GrantError::MissingKeyMaterial)));
    }

    #[test]
    fn test_mint_for_verifies_back_to_inputs() {
        let broker = broker();

        let token = broker.mint_for("agent-cora", "dev-room", Some("Cora")).unwrap();
        let claims = grant::verify(&token, &key()).unwrap();

        assert_eq!(claims.sub, "agent-cora");
        assert_eq!(claims.video.room, "dev-room");
        assert_eq!(claims.name, Some("Cora".to_string()));
    }
}
