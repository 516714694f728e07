//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::registration::{DeviceInfo, PlatformOs, ProjectId};

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Project identifier the token request is scoped to.
    pub project_id: Option<String>,
    /// Base URL of the push gateway.
    pub gateway_url: Option<String>,
    /// Stable identifier for this device at the gateway.
    pub device_id: Option<String>,
    /// Whether this installation counts as physical hardware.
    pub physical_device: Option<bool>,
    /// Platform OS: android, ios, or other.
    pub os: Option<String>,
    /// Whether foreground alerts surface as desktop notifications.
    pub desktop_alerts: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            project_id: None,
            gateway_url: Some("http://localhost:8787".to_string()),
            device_id: None,
            physical_device: Some(true),
            os: Some("other".to_string()),
            desktop_alerts: Some(true),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            project_id: other.project_id.or(self.project_id),
            gateway_url: other.gateway_url.or(self.gateway_url),
            device_id: other.device_id.or(self.device_id),
            physical_device: other.physical_device.or(self.physical_device),
            os: other.os.or(self.os),
            desktop_alerts: other.desktop_alerts.or(self.desktop_alerts),
        }
    }

    /// Get the project id, if configured.
    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(ProjectId::new)
    }

    /// Get the gateway URL, or the local default if not set.
    pub fn gateway_url_or_default(&self) -> &str {
        self.gateway_url
            .as_deref()
            .unwrap_or("http://localhost:8787")
    }

    /// Get the device id, or a fixed local default if not set.
    pub fn device_id_or_default(&self) -> &str {
        self.device_id.as_deref().unwrap_or("local-device")
    }

    /// Get the OS as parsed PlatformOs, or Other if not set/invalid.
    pub fn os_or_default(&self) -> PlatformOs {
        self.os
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get the physical-device setting, or true if not set.
    pub fn physical_device_or_default(&self) -> bool {
        self.physical_device.unwrap_or(true)
    }

    /// Get the desktop-alerts setting, or true if not set.
    pub fn desktop_alerts_or_default(&self) -> bool {
        self.desktop_alerts.unwrap_or(true)
    }

    /// Device facts derived from configuration.
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            is_physical: self.physical_device_or_default(),
            os: self.os_or_default(),
        }
    }
}
