//! User-visible alert port interface

use async_trait::async_trait;
use thiserror::Error;

/// Alert errors
#[derive(Debug, Clone, Error)]
pub enum AlertError {
    #[error("Failed to show alert: {0}")]
    ShowFailed(String),
}

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Info,
    Warning,
}

impl AlertSeverity {
    /// Get the freedesktop icon name
    pub const fn icon_name(&self) -> &'static str {
        match self {
            Self::Info => "dialog-information",
            Self::Warning => "dialog-warning",
        }
    }
}

/// Port for user-visible alerts (foreground notification presentation and
/// registration warnings).
#[async_trait]
pub trait Alerter: Send + Sync {
    /// Show an alert to the user.
    ///
    /// # Arguments
    /// * `title` - The alert title
    /// * `message` - The alert body
    /// * `severity` - The severity to display
    async fn alert(
        &self,
        title: &str,
        message: &str,
        severity: AlertSeverity,
    ) -> Result<(), AlertError>;
}

/// Blanket implementation for boxed alerter types
#[async_trait]
impl Alerter for Box<dyn Alerter> {
    async fn alert(
        &self,
        title: &str,
        message: &str,
        severity: AlertSeverity,
    ) -> Result<(), AlertError> {
        self.as_ref().alert(title, message, severity).await
    }
}
