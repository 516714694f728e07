//! Notification event value objects

use serde::{Deserialize, Serialize};

/// The primary content block of a delivered notification.
/// Both fields are optional; an empty string is treated as absent
/// by the extraction policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Provider-specific data carried by a remote origin.
/// May hold an alternate title/message distinct from the content block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// How and why the notification was delivered.
///
/// Tagged union over the origin shapes the platform produces. Only the
/// remote shape carries a nested data payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    /// Remote push delivery with its nested data payload.
    Remote {
        #[serde(default)]
        data: OriginData,
    },
    /// Locally scheduled notification.
    Local,
    /// Origin the platform reported but this model does not recognize.
    Unknown,
}

/// One delivered notification: content plus an optional origin block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(default)]
    pub content: NotificationContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

impl NotificationEvent {
    /// Build an event from a plain content block.
    pub fn with_content(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            content: NotificationContent {
                title: Some(title.into()),
                body: Some(body.into()),
            },
            origin: None,
        }
    }

    /// The nested origin data payload, if the origin is remote.
    pub fn origin_data(&self) -> Option<&OriginData> {
        match self.origin {
            Some(Origin::Remote { ref data }) => Some(data),
            _ => None,
        }
    }
}

/// A user interaction with a delivered notification.
///
/// Observed and logged only; no in-app action routing is performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResponse {
    /// Identifier of the action the user took (the platform's default
    /// action for a plain tap).
    pub action_id: String,
    /// The notification that was responded to.
    pub notification: NotificationEvent,
}
