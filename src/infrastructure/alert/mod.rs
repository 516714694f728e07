//! Alert adapters

mod console;
mod notify_rust;

pub use console::ConsoleAlerter;
pub use notify_rust::NotifyRustAlerter;
