//! Session Service Library
//!
//! HTTP API that brokers short-lived access credentials for real-time
//! collaboration rooms and proxies the realtime provider's ephemeral-secret
//! issuance so the long-lived provider key stays server-side.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `errors` - Error types and HTTP mapping
//! - `handlers` - HTTP request handlers
//! - `models` - Request/response bodies
//! - `routes` - Router construction and shared state
//! - `services` - Business logic (session broker, realtime proxy)

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
