//! Configuration storage port
//!
//! The CLI keeps one persisted config (project id, gateway coordinates,
//! device facts, alert preference). Absent storage is not an error: loading
//! yields an empty config that merges cleanly under the built-in defaults
//! and CLI flags.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for reading and writing the persisted configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the stored configuration.
    ///
    /// Yields an empty, mergeable config when nothing has been stored yet;
    /// only unreadable or malformed storage is an error.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist the given configuration, creating storage as needed.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location of the backing config file.
    fn path(&self) -> PathBuf;

    /// Whether anything has been stored yet.
    fn exists(&self) -> bool;

    /// Seed storage with the built-in defaults.
    /// Refuses to overwrite existing storage.
    async fn init(&self) -> Result<(), ConfigError>;
}
