//! Data-channel event protocol for Roomcast.
//!
//! This crate implements the versioned JSON envelope exchanged between the
//! agent and human participants over a room's data channel, and the codec
//! that moves it on and off the wire.

#![warn(clippy::pedantic)]

pub mod envelope;
pub mod codec;

pub use codec::{decode, encode, CodecError};
pub use envelope::{Envelope, EnvelopeId, Event, PROTOCOL_VERSION};
