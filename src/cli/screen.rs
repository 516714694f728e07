//! Display screen
//!
//! Pure read-and-render over session state: four labeled text regions
//! (token, title, body, raw payload), recomputed on every render.

use colored::*;

use crate::domain::notification::{derive_body, derive_title, render_payload, NotificationEvent};
use crate::domain::registration::RegistrationState;

/// Placeholder shown while no token has been obtained.
pub const TOKEN_NOT_AVAILABLE: &str = "Not available";

/// Snapshot of everything the screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenModel {
    pub token: String,
    pub title: String,
    pub body: String,
    pub payload: String,
}

impl ScreenModel {
    /// Project session state into displayable text.
    pub fn project(
        registration: &RegistrationState,
        notification: Option<&NotificationEvent>,
    ) -> Self {
        let token = registration
            .token()
            .map(|t| t.as_str().to_string())
            .unwrap_or_else(|| TOKEN_NOT_AVAILABLE.to_string());

        Self {
            token,
            title: derive_title(notification).to_string(),
            body: derive_body(notification).to_string(),
            payload: render_payload(notification),
        }
    }

    /// Render the four text regions.
    pub fn render(&self) -> String {
        format!(
            "{}\n{}\n\n{}\n{}\n\n{}\n{}\n\n{}\n{}\n",
            "Push Token:".bold(),
            self.token,
            "Notification Title:".bold(),
            self.title,
            "Notification Body:".bold(),
            self.body,
            "Notification Payload:".bold(),
            self.payload,
        )
    }
}
