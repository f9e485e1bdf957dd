//! Business logic for the session service.

pub mod broker;
pub mod realtime;

pub use broker::SessionBroker;
pub use realtime::RealtimeProxy;
