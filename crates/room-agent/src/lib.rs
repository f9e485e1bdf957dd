//! Automated room participant for Roomcast.
//!
//! Decodes data-channel traffic arriving from an opaque real-time
//! transport, routes recognized events to a pluggable handler, and
//! publishes the handler's reactions back onto the channel. The transport
//! itself (room hosting, media, networking) is an external collaborator
//! reached through the channel pair in [`transport`].
//!
//! # Modules
//!
//! - `config` - Agent configuration and join-token minting
//! - `handler` - The [`handler::EventHandler`] seam and the default echo
//! - `router` - The per-connection receive/dispatch loop
//! - `transport` - Types at the boundary to the real-time transport

#![warn(clippy::pedantic)]

pub mod config;
pub mod handler;
pub mod router;
pub mod transport;
