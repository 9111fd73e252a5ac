//! Domain models for the web frontend.

pub mod session;

pub use session::{SessionError, SessionStatus, TokenPair};
