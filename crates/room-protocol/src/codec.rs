//! Codec for encoding and decoding data-channel envelopes.
//!
//! Wire format is one JSON object per message:
//!
//! ```json
//! {"v":1, "id":"a1b2c3d4e5f60718", "ts":1700000000000, "type":"user_text", "payload":{"text":"hi"}}
//! ```
//!
//! Decode failures are ordinary values, never panics: on a shared channel
//! malformed and foreign traffic is expected, and callers drop it silently.

use crate::envelope::{Envelope, EnvelopeId, Event, PROTOCOL_VERSION};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error type for codec operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Input was not valid UTF-8 JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Input parsed as JSON but the top level is not an object.
    #[error("envelope is not a JSON object")]
    NotAnObject,

    /// A required envelope field is absent or has the wrong shape.
    #[error("missing or malformed envelope field: {0}")]
    MalformedField(&'static str),

    /// The `v` field named a protocol revision this codec does not speak.
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u64),

    /// Serialization to JSON failed.
    #[error("failed to encode envelope: {0}")]
    Encode(String),
}

/// Serde mirror of the wire object.
#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    v: u8,
    id: String,
    ts: i64,
    #[serde(rename = "type")]
    event_type: String,
    payload: Map<String, Value>,
}

/// Encode an envelope to its UTF-8 JSON wire form.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if JSON serialization fails.
pub fn encode(envelope: &Envelope) -> Result<Bytes, CodecError> {
    let wire = WireEnvelope {
        v: envelope.version,
        id: envelope.id.as_str().to_string(),
        ts: envelope.timestamp_ms,
        event_type: envelope.event.event_type().to_string(),
        payload: envelope.event.to_payload(),
    };

    serde_json::to_vec(&wire)
        .map(Bytes::from)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode one wire message into an envelope.
///
/// Validates the top-level envelope fields only. The payload must be a JSON
/// object but its per-type shape is not checked here; recognized types with
/// missing fields decode with empty-string defaults and everything
/// unrecognized becomes [`Event::Unknown`].
///
/// # Errors
///
/// - [`CodecError::InvalidJson`] for non-UTF-8 or non-JSON input
/// - [`CodecError::NotAnObject`] when the top level is an array/scalar
/// - [`CodecError::MalformedField`] when `v`, `id`, `ts`, `type`, or
///   `payload` is absent or mistyped
/// - [`CodecError::UnsupportedVersion`] for any `v` other than 1
pub fn decode(data: &[u8]) -> Result<Envelope, CodecError> {
    let value: Value =
        serde_json::from_slice(data).map_err(|e| CodecError::InvalidJson(e.to_string()))?;

    let object = value.as_object().ok_or(CodecError::NotAnObject)?;

    let version = object
        .get("v")
        .and_then(Value::as_u64)
        .ok_or(CodecError::MalformedField("v"))?;
    if version != u64::from(PROTOCOL_VERSION) {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let id = object
        .get("id")
        .and_then(Value::as_str)
        .ok_or(CodecError::MalformedField("id"))?;

    let timestamp_ms = object
        .get("ts")
        .and_then(Value::as_i64)
        .ok_or(CodecError::MalformedField("ts"))?;

    let event_type = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(CodecError::MalformedField("type"))?;

    let payload = object
        .get("payload")
        .and_then(Value::as_object)
        .ok_or(CodecError::MalformedField("payload"))?;

    Ok(Envelope {
        version: PROTOCOL_VERSION,
        id: EnvelopeId::from_wire(id),
        timestamp_ms,
        event: Event::from_wire(event_type.to_string(), payload.clone()),
    })
}
