//! Types at the boundary to the real-time transport.
//!
//! The transport is an opaque external service: whatever adapter joins the
//! room feeds raw data-channel messages into a bounded inbound channel and
//! drains reactions from a bounded outbound channel. Backpressure and
//! shutdown are therefore explicit channel semantics, not callbacks.

use bytes::Bytes;
use tokio::sync::mpsc;

/// Default capacity for the inbound and outbound channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// One raw message delivered by the transport.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Identity the transport attached to the sender, if any.
    pub participant: Option<String>,

    /// Raw data-channel payload.
    pub payload: Bytes,
}

impl InboundMessage {
    /// Message from a known participant.
    #[must_use]
    pub fn from_participant(participant: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            participant: Some(participant.into()),
            payload: payload.into(),
        }
    }

    /// Message the transport could not attribute to a participant.
    #[must_use]
    pub fn anonymous(payload: impl Into<Bytes>) -> Self {
        Self {
            participant: None,
            payload: payload.into(),
        }
    }
}

/// Build the bounded channel pair a transport adapter wires into.
///
/// Returns `(inbound_tx, inbound_rx, outbound_tx, outbound_rx)`: the
/// adapter keeps `inbound_tx` and `outbound_rx`, the router takes
/// `inbound_rx` and `outbound_tx`.
#[must_use]
pub fn channel_pair(
    capacity: usize,
) -> (
    mpsc::Sender<InboundMessage>,
    mpsc::Receiver<InboundMessage>,
    mpsc::Sender<Bytes>,
    mpsc::Receiver<Bytes>,
) {
    let (inbound_tx, inbound_rx) = mpsc::channel(capacity);
    let (outbound_tx, outbound_rx) = mpsc::channel(capacity);
    (inbound_tx, inbound_rx, outbound_tx, outbound_rx)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_message_constructors() {
        let known = InboundMessage::from_participant("user-42", &b"{}"[..]);
        assert_eq!(known.participant.as_deref(), Some("user-42"));

        let unknown = InboundMessage::anonymous(&b"{}"[..]);
        assert_eq!(unknown.participant, None);
    }

    #[tokio::test]
    async fn test_channel_pair_wires_both_directions() {
        let (inbound_tx, mut inbound_rx, outbound_tx, mut outbound_rx) = channel_pair(4);

        inbound_tx
            .send(InboundMessage::anonymous(&b"hello"[..]))
            .await
            .unwrap();
        assert_eq!(inbound_rx.recv().await.unwrap().payload, Bytes::from("hello"));

        outbound_tx.send(Bytes::from("reply")).await.unwrap();
        assert_eq!(outbound_rx.recv().await.unwrap(), Bytes::from("reply"));
    }
}
