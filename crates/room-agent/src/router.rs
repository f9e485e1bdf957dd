//! Data-channel router: the per-connection receive/dispatch loop.
//!
//! One router instance serves one connection. It pulls raw messages from
//! the transport's inbound channel in delivery order, decodes them, and
//! hands recognized events to the handler. Reactions are published as
//! independent, semaphore-capped tasks, so one slow publish never delays
//! decoding of the next inbound message - and outbound completion order is
//! therefore NOT guaranteed to match inbound order.
//!
//! Malformed traffic and unrecognized event types are dropped silently:
//! the channel is shared and foreign messages are expected, not
//! exceptional. The [`RouterStats`] counters keep the drops observable.

use crate::handler::EventHandler;
use crate::transport::InboundMessage;
use bytes::Bytes;
use room_protocol::{codec, Envelope};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

/// Default cap on concurrently in-flight outbound publishes.
pub const DEFAULT_MAX_INFLIGHT_PUBLISHES: usize = 32;

/// Sentinel identity for messages the transport could not attribute.
pub const UNKNOWN_SENDER: &str = "unknown";

/// Connection lifecycle states, tracked for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    /// Channels exist but the loop has not started.
    Connecting,
    /// The transport delivered the channel pair; about to listen.
    Joined,
    /// Pulling inbound messages.
    Listening,
    /// Terminal: transport closed or shutdown requested. No reconnection
    /// is attempted in this revision.
    Disconnected,
}

/// Counters for everything the router saw and did.
///
/// Shared between the router and its spawned publish tasks; read them
/// after (or during) `run` via the handle from [`DataChannelRouter::stats`].
#[derive(Debug, Default)]
pub struct RouterStats {
    received: AtomicU64,
    decode_failures: AtomicU64,
    ignored: AtomicU64,
    published: AtomicU64,
    publish_failures: AtomicU64,
}

impl RouterStats {
    /// Total inbound messages pulled from the transport.
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Inbound messages that failed envelope decoding.
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures.load(Ordering::Relaxed)
    }

    /// Decoded events the handler produced no reaction for.
    pub fn ignored(&self) -> u64 {
        self.ignored.load(Ordering::Relaxed)
    }

    /// Reactions successfully handed to the outbound channel.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Reactions lost to encoding errors or a closed outbound channel.
    pub fn publish_failures(&self) -> u64 {
        self.publish_failures.load(Ordering::Relaxed)
    }
}

/// The router over one connection's channel pair.
pub struct DataChannelRouter<H: EventHandler> {
    handler: Arc<H>,
    inbound: mpsc::Receiver<InboundMessage>,
    outbound: mpsc::Sender<Bytes>,
    publish_limit: Arc<Semaphore>,
    cancel_token: CancellationToken,
    stats: Arc<RouterStats>,
    state: RouterState,
}

impl<H: EventHandler> DataChannelRouter<H> {
    /// Create a router over a connection's channel pair.
    ///
    /// `max_inflight_publishes` caps concurrently outstanding reaction
    /// tasks; once reached, the receive loop waits for a slot before
    /// dispatching the next reaction.
    #[must_use]
    pub fn new(
        handler: H,
        inbound: mpsc::Receiver<InboundMessage>,
        outbound: mpsc::Sender<Bytes>,
        max_inflight_publishes: usize,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            handler: Arc::new(handler),
            inbound,
            outbound,
            publish_limit: Arc::new(Semaphore::new(max_inflight_publishes.max(1))),
            cancel_token,
            stats: Arc::new(RouterStats::default()),
            state: RouterState::Connecting,
        }
    }

    /// Handle to the router's counters, usable after `run` consumes it.
    #[must_use]
    pub fn stats(&self) -> Arc<RouterStats> {
        Arc::clone(&self.stats)
    }

    /// Run the receive loop until the transport disconnects or the
    /// cancellation token fires. Returns the terminal state.
    #[instrument(skip_all, name = "agent.router")]
    pub async fn run(mut self) -> RouterState {
        self.set_state(RouterState::Joined);
        self.set_state(RouterState::Listening);

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    debug!(target: "agent.router", "Shutdown requested");
                    break;
                }

                maybe_message = self.inbound.recv() => {
                    match maybe_message {
                        Some(message) => self.handle_inbound(message).await,
                        None => {
                            debug!(target: "agent.router", "Transport closed inbound channel");
                            break;
                        }
                    }
                }
            }
        }

        self.set_state(RouterState::Disconnected);
        info!(
            target: "agent.router",
            received = self.stats.received(),
            decode_failures = self.stats.decode_failures(),
            ignored = self.stats.ignored(),
            published = self.stats.published(),
            publish_failures = self.stats.publish_failures(),
            "Router stopped"
        );

        self.state
    }

    /// Process one raw inbound message.
    async fn handle_inbound(&mut self, message: InboundMessage) {
        self.stats.received.fetch_add(1, Ordering::Relaxed);

        let envelope = match codec::decode(&message.payload) {
            Ok(envelope) => envelope,
            Err(err) => {
                // Expected noise on a shared channel; never surfaced
                trace!(target: "agent.router", error = %err, "Dropping undecodable message");
                self.stats.decode_failures.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        let sender = message
            .participant
            .as_deref()
            .unwrap_or(UNKNOWN_SENDER)
            .to_string();

        let Some(reaction) = self.handler.react(&sender, &envelope.event) else {
            trace!(
                target: "agent.router",
                event_type = envelope.event.event_type(),
                "No reaction for event"
            );
            self.stats.ignored.fetch_add(1, Ordering::Relaxed);
            return;
        };

        // Bounded fire-and-forget: waiting here only happens once the
        // in-flight cap is reached
        let Ok(permit) = Arc::clone(&self.publish_limit).acquire_owned().await else {
            // Semaphore is never closed
            return;
        };

        let outbound = self.outbound.clone();
        let stats = Arc::clone(&self.stats);
        tokio::spawn(async move {
            let _permit = permit;

            match codec::encode(&Envelope::new(reaction)) {
                Ok(bytes) => {
                    if outbound.send(bytes).await.is_ok() {
                        stats.published.fetch_add(1, Ordering::Relaxed);
                    } else {
                        warn!(target: "agent.router", "Outbound channel closed; reaction dropped");
                        stats.publish_failures.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Err(err) => {
                    warn!(target: "agent.router", error = %err, "Failed to encode reaction");
                    stats.publish_failures.fetch_add(1, Ordering::Relaxed);
                }
            }
        });
    }

    fn set_state(&mut self, next: RouterState) {
        trace!(target: "agent.router", from = ?self.state, to = ?next, "State transition");
        self.state = next;
    }
}
