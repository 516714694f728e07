//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod alerter;
pub mod config;
pub mod platform;

// Re-export common types
pub use alerter::{AlertError, AlertSeverity, Alerter};
pub use config::ConfigStore;
pub use platform::{
    PlatformError, PushPlatform, ReceivedHandler, ResponseHandler, Subscription, SubscriptionId,
};
