//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the push gateway, the desktop notification
//! service, and the filesystem.

pub mod alert;
pub mod config;
pub mod platform;

// Re-export adapters
pub use alert::{ConsoleAlerter, NotifyRustAlerter};
pub use config::XdgConfigStore;
pub use platform::{GatewayPlatform, SimulatedPlatform};
