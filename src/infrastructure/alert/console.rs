//! Console alert adapter
//!
//! Prints alerts to stderr. Used when desktop alerts are disabled or the
//! environment has no notification service.

use async_trait::async_trait;
use colored::*;

use crate::application::ports::{AlertError, AlertSeverity, Alerter};

/// Alerter that writes to stderr
pub struct ConsoleAlerter;

impl ConsoleAlerter {
    /// Create a new console alerter
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleAlerter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Alerter for ConsoleAlerter {
    async fn alert(
        &self,
        title: &str,
        message: &str,
        severity: AlertSeverity,
    ) -> Result<(), AlertError> {
        match severity {
            AlertSeverity::Info => eprintln!("{} {}: {}", "ℹ".cyan(), title, message),
            AlertSeverity::Warning => eprintln!("{} {}: {}", "⚠".yellow(), title, message),
        }
        Ok(())
    }
}
