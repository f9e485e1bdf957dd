//! HTTP request handlers for the session service.

pub mod health;
pub mod session;
pub mod token;

pub use health::{health_check, healthz_check};
pub use session::{create_session, get_ephemeral_session};
pub use token::mint_token;
