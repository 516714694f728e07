//! Registration value objects and the session registration state machine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidOsError;

/// Opaque platform-issued push token addressing this device+project.
/// Held in memory only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushToken(String);

impl PushToken {
    pub fn new(data: impl Into<String>) -> Self {
        Self(data.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PushToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Project identifier the token request is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Permission status as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Undetermined,
    Granted,
    Denied,
}

/// Operating system of the device, as far as channel provisioning cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformOs {
    Android,
    Ios,
    #[default]
    Other,
}

impl fmt::Display for PlatformOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformOs::Android => write!(f, "android"),
            PlatformOs::Ios => write!(f, "ios"),
            PlatformOs::Other => write!(f, "other"),
        }
    }
}

impl FromStr for PlatformOs {
    type Err = InvalidOsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "android" => Ok(PlatformOs::Android),
            "ios" => Ok(PlatformOs::Ios),
            "other" => Ok(PlatformOs::Other),
            _ => Err(InvalidOsError {
                input: s.to_string(),
            }),
        }
    }
}

/// Hardware facts the registration routine consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Physical hardware; simulators and emulators cannot register.
    pub is_physical: bool,
    pub os: PlatformOs,
}

/// How the OS presents a notification while the app is in the foreground.
/// Installed once at session activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationPolicy {
    pub show_alert: bool,
    pub play_sound: bool,
    pub set_badge: bool,
}

impl PresentationPolicy {
    /// Show the alert visually, no sound, no badge update.
    pub const fn foreground() -> Self {
        Self {
            show_alert: true,
            play_sound: false,
            set_badge: false,
        }
    }
}

/// Android notification channel declaration. Declared once per
/// registration, not per notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannel {
    pub name: String,
    /// Channel importance on the platform's 0..=5 scale.
    pub importance: u8,
    /// Delay/vibrate millisecond pairs.
    pub vibration_pattern: Vec<u32>,
    /// LED color as a #AARRGGBB hex string.
    pub light_color: String,
}

impl NotificationChannel {
    /// Maximum channel importance.
    pub const IMPORTANCE_MAX: u8 = 5;

    /// The default channel every registration declares on Android.
    pub fn default_channel() -> Self {
        Self {
            name: "default".to_string(),
            importance: Self::IMPORTANCE_MAX,
            vibration_pattern: vec![0, 250, 250, 250],
            light_color: "#FF231F7C".to_string(),
        }
    }
}

/// Session registration state. Transitions are one-directional:
/// `Unregistered` moves to exactly one of the other two and stays there
/// for the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    PermissionDenied,
    Registered(PushToken),
}

impl RegistrationState {
    /// The token, once registered.
    pub fn token(&self) -> Option<&PushToken> {
        match self {
            RegistrationState::Registered(token) => Some(token),
            _ => None,
        }
    }
}

/// Resolved result of one registration attempt.
///
/// Denied permission and an unsupported (non-physical) environment are both
/// ordinary outcomes of the same routine, not errors; only the presentation
/// layer treats them differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered(PushToken),
    PermissionDenied,
    UnsupportedDevice,
}
