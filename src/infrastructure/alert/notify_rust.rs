//! Cross-platform alert adapter using notify-rust
//!
//! Works on Windows, macOS, and Linux.

use async_trait::async_trait;

use crate::application::ports::{AlertError, AlertSeverity, Alerter};

/// Cross-platform alerter using notify-rust
pub struct NotifyRustAlerter {
    /// Application name for desktop notifications
    app_name: String,
}

impl NotifyRustAlerter {
    /// Create a new notify-rust alerter
    pub fn new() -> Self {
        Self {
            app_name: "PushInspector".to_string(),
        }
    }

    /// Create with custom app name
    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Default for NotifyRustAlerter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Alerter for NotifyRustAlerter {
    async fn alert(
        &self,
        title: &str,
        message: &str,
        severity: AlertSeverity,
    ) -> Result<(), AlertError> {
        let title = title.to_owned();
        let message = message.to_owned();
        let app_name = self.app_name.clone();
        let icon_name = severity.icon_name().to_string();

        // notify-rust operations can block, so run in spawn_blocking
        tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .appname(&app_name)
                .summary(&title)
                .body(&message)
                .icon(&icon_name)
                .show()
                .map_err(|e| AlertError::ShowFailed(e.to_string()))?;

            Ok(())
        })
        .await
        .map_err(|e| AlertError::ShowFailed(format!("Task join error: {}", e)))?
    }
}
