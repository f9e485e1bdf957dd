//! Common utilities shared across Roomcast components.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for access grants and signed room-join credentials
pub mod grant;
