//! PushInspector - push-registration and notification inspection CLI
//!
//! This crate registers a device with a push-notification platform, exposes
//! the issued push token, and tracks the most recently received notification
//! for display.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core value objects, notification model, extraction policy, and errors
//! - **Application**: The push-session use case and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (HTTP gateway, simulated platform, alerts, config)
//! - **CLI**: Command-line interface, argument parsing, and the display screen

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
