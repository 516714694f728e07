//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

use crate::domain::registration::{DeviceInfo, ProjectId};

/// PushInspector - inspect push registration and incoming notifications
#[derive(Parser, Debug)]
#[command(name = "push-inspector")]
#[command(version)]
#[command(about = "Registers a device for push notifications and shows the latest one")]
#[command(long_about = None)]
pub struct Cli {
    /// Project identifier the token request is scoped to
    #[arg(short = 'p', long, value_name = "ID")]
    pub project_id: Option<String>,

    /// Push gateway base URL
    #[arg(long, value_name = "URL")]
    pub gateway_url: Option<String>,

    /// Device identifier at the gateway
    #[arg(long, value_name = "ID")]
    pub device_id: Option<String>,

    /// Platform OS (android, ios, other)
    #[arg(long, value_name = "OS")]
    pub os: Option<String>,

    /// Run against an in-memory emulator (registration is skipped)
    #[arg(long, conflicts_with = "simulate_device")]
    pub simulate: bool,

    /// Run against an in-memory physical-device double; notifications are
    /// injected as JSON lines on stdin
    #[arg(long)]
    pub simulate_device: bool,

    /// Wait for registration, drain injected input, render once, and exit
    #[arg(long)]
    pub once: bool,

    /// Print alerts to stderr instead of desktop notifications
    #[arg(long)]
    pub no_desktop_alerts: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Which platform adapter backs the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// HTTP push gateway
    Gateway,
    /// In-memory emulator (non-physical hardware)
    SimulateEmulator,
    /// In-memory physical-device double
    SimulateDevice,
}

/// Resolved run options
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: RunMode,
    pub project_id: ProjectId,
    pub gateway_url: String,
    pub device_id: String,
    pub device: DeviceInfo,
    pub desktop_alerts: bool,
    pub once: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "project_id",
    "gateway_url",
    "device_id",
    "physical_device",
    "os",
    "desktop_alerts",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
