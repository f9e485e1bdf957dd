//! Event envelope types.
//!
//! Every data-channel message is a versioned, identified, timestamped
//! envelope around a typed payload. The envelope layer knows the shape of
//! the types it recognizes and carries everything else opaquely, so foreign
//! traffic on a shared channel round-trips without loss.

use serde_json::{Map, Value};
use std::fmt;

/// Current protocol revision. Always 1 on the wire.
pub const PROTOCOL_VERSION: u8 = 1;

/// Wire tag for inbound user text events.
pub const TYPE_USER_TEXT: &str = "user_text";

/// Wire tag for outbound markdown reactions.
pub const TYPE_ASSISTANT_MARKDOWN: &str = "assistant_markdown";

/// Number of random bytes behind a generated envelope id.
const ID_RANDOM_BYTES: usize = 8;

/// Unique per-envelope identifier: 8 random bytes, hex-encoded.
///
/// Generated fresh for every envelope and never reused. Decoded ids are
/// carried as-is; only [`EnvelopeId::is_well_formed`] distinguishes ids this
/// implementation would have produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvelopeId(String);

impl EnvelopeId {
    /// Generate a fresh random id.
    #[must_use]
    #[allow(clippy::expect_used)] // CSPRNG fill on 8 bytes is an unreachable failure condition
    pub fn generate() -> Self {
        use ring::rand::{SecureRandom, SystemRandom};

        let rng = SystemRandom::new();
        let mut bytes = [0u8; ID_RANDOM_BYTES];
        // SystemRandom uses OS-level entropy sources which only fail if the
        // OS itself is catastrophically broken
        rng.fill(&mut bytes)
            .expect("OS entropy source unavailable");

        Self(hex::encode(bytes))
    }

    /// Wrap an id received off the wire without validation.
    #[must_use]
    pub fn from_wire(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for 16 lowercase hex characters, the shape [`generate`] emits.
    ///
    /// [`generate`]: EnvelopeId::generate
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == ID_RANDOM_BYTES * 2
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl fmt::Display for EnvelopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A typed data-channel event.
///
/// Closed set of payload shapes per recognized wire tag, plus an opaque
/// variant that preserves unrecognized types for forward compatibility.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Text typed by a human participant (`user_text`).
    UserText {
        /// Message text; absent on the wire decodes as empty.
        text: String,
    },

    /// Markdown reaction published by the agent (`assistant_markdown`).
    AssistantMarkdown {
        /// Rendered-as-markdown reply body.
        markdown: String,
    },

    /// Any event type this revision does not recognize.
    ///
    /// The payload is carried untouched so the envelope round-trips
    /// losslessly; routers drop these without error.
    Unknown {
        /// The wire `type` tag.
        event_type: String,
        /// The original payload object.
        payload: Map<String, Value>,
    },
}

impl Event {
    /// The wire `type` tag for this event.
    #[must_use]
    pub fn event_type(&self) -> &str {
        match self {
            Event::UserText { .. } => TYPE_USER_TEXT,
            Event::AssistantMarkdown { .. } => TYPE_ASSISTANT_MARKDOWN,
            Event::Unknown { event_type, .. } => event_type,
        }
    }

    /// Build the wire payload object for this event.
    #[must_use]
    pub(crate) fn to_payload(&self) -> Map<String, Value> {
        match self {
            Event::UserText { text } => {
                let mut payload = Map::new();
                payload.insert("text".to_string(), Value::String(text.clone()));
                payload
            }
            Event::AssistantMarkdown { markdown } => {
                let mut payload = Map::new();
                payload.insert("markdown".to_string(), Value::String(markdown.clone()));
                payload
            }
            Event::Unknown { payload, .. } => payload.clone(),
        }
    }

    /// Reconstruct an event from its wire tag and payload object.
    ///
    /// Recognized types tolerate missing fields (defaulting to empty
    /// strings); payload shape validation beyond that is the router's
    /// responsibility.
    #[must_use]
    pub(crate) fn from_wire(event_type: String, payload: Map<String, Value>) -> Self {
        fn string_field(payload: &Map<String, Value>, key: &str) -> String {
            payload
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        }

        match event_type.as_str() {
            TYPE_USER_TEXT => Event::UserText {
                text: string_field(&payload, "text"),
            },
            TYPE_ASSISTANT_MARKDOWN => Event::AssistantMarkdown {
                markdown: string_field(&payload, "markdown"),
            },
            _ => Event::Unknown {
                event_type,
                payload,
            },
        }
    }
}

/// A complete data-channel envelope.
///
/// Constructed immediately before transmission and decoded immediately on
/// receipt; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Protocol revision; always [`PROTOCOL_VERSION`].
    pub version: u8,

    /// Fresh per-envelope identifier.
    pub id: EnvelopeId,

    /// Milliseconds since the Unix epoch at construction time.
    ///
    /// Informative only: there are no sequence numbers and no ordering
    /// guarantee derived from timestamps.
    pub timestamp_ms: i64,

    /// The typed payload.
    pub event: Event,
}

impl Envelope {
    /// Wrap `event` in a new envelope with a fresh id and current timestamp.
    #[must_use]
    pub fn new(event: Event) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            id: EnvelopeId::generate(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            event,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_is_well_formed() {
        let id = EnvelopeId::generate();
        assert!(id.is_well_formed(), "generated id {id} should be 16 hex chars");
        assert_eq!(id.as_str().len(), 16);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(EnvelopeId::generate()));
        }
    }

    #[test]
    fn test_wire_ids_are_carried_verbatim() {
        let id = EnvelopeId::from_wire("not-hex-at-all");
        assert_eq!(id.as_str(), "not-hex-at-all");
        assert!(!id.is_well_formed());
    }

    #[test]
    fn test_uppercase_hex_is_not_well_formed() {
        assert!(!EnvelopeId::from_wire("A1B2C3D4E5F60718").is_well_formed());
        assert!(EnvelopeId::from_wire("a1b2c3d4e5f60718").is_well_formed());
    }

    #[test]
    fn test_event_type_tags() {
        let user = Event::UserText { text: "hi".to_string() };
        assert_eq!(user.event_type(), "user_text");

        let agent = Event::AssistantMarkdown { markdown: "# hi".to_string() };
        assert_eq!(agent.event_type(), "assistant_markdown");

        let other = Event::Unknown {
            event_type: "ping".to_string(),
            payload: Map::new(),
        };
        assert_eq!(other.event_type(), "ping");
    }

    #[test]
    fn test_user_text_missing_field_defaults_empty() {
        let event = Event::from_wire("user_text".to_string(), Map::new());
        assert_eq!(event, Event::UserText { text: String::new() });
    }

    #[test]
    fn test_unknown_event_preserves_payload() {
        let mut payload = Map::new();
        payload.insert("nonce".to_string(), Value::from(17));

        let event = Event::from_wire("ping".to_string(), payload.clone());
        match event {
            Event::Unknown {
                event_type,
                payload: carried,
            } => {
                assert_eq!(event_type, "ping");
                assert_eq!(carried, payload);
            }
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_new_envelope_stamps_version_and_time() {
        let before = chrono::Utc::now().timestamp_millis();
        let envelope = Envelope::new(Event::UserText { text: "x".to_string() });
        let after = chrono::Utc::now().timestamp_millis();

        assert_eq!(envelope.version, PROTOCOL_VERSION);
        assert!(envelope.id.is_well_formed());
        assert!(envelope.timestamp_ms >= before && envelope.timestamp_ms <= after);
    }
}
