//! Application layer - use cases and ports

pub mod ports;
pub mod session;

pub use session::{ActiveSession, PushSession, SessionCallbacks, SessionError, SessionState};
