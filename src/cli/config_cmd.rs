//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::error::ConfigError;
use crate::domain::registration::PlatformOs;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    // Validate value based on key type
    validate_config_value(key, value)?;

    // Load existing config
    let mut config = store.load().await?;

    // Update the appropriate field
    match key {
        "project_id" => config.project_id = Some(value.to_string()),
        "gateway_url" => config.gateway_url = Some(value.to_string()),
        "device_id" => config.device_id = Some(value.to_string()),
        "os" => config.os = Some(value.to_lowercase()),
        "physical_device" => {
            config.physical_device = Some(parse_bool(value).map_err(|_| bool_error(key))?)
        }
        "desktop_alerts" => {
            config.desktop_alerts = Some(parse_bool(value).map_err(|_| bool_error(key))?)
        }
        _ => unreachable!(), // Already validated
    }

    // Save config
    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;

    let value = match key {
        "project_id" => config.project_id,
        "gateway_url" => config.gateway_url,
        "device_id" => config.device_id,
        "os" => config.os,
        "physical_device" => config.physical_device.map(|b| b.to_string()),
        "desktop_alerts" => config.desktop_alerts.map(|b| b.to_string()),
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value(
        "project_id",
        config.project_id.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "gateway_url",
        config.gateway_url.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "device_id",
        config.device_id.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "physical_device",
        &config
            .physical_device
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value("os", config.os.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "desktop_alerts",
        &config
            .desktop_alerts
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "os" => {
            value
                .parse::<PlatformOs>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "physical_device" | "desktop_alerts" => {
            parse_bool(value).map_err(|_| bool_error(key))?;
        }
        _ => {} // project_id, gateway_url, device_id accept any string
    }
    Ok(())
}

fn bool_error(key: &str) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be 'true' or 'false'".to_string(),
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("invalid").is_err());
    }

    #[test]
    fn validate_os_valid() {
        assert!(validate_config_value("os", "android").is_ok());
        assert!(validate_config_value("os", "ios").is_ok());
        assert!(validate_config_value("os", "other").is_ok());
    }

    #[test]
    fn validate_os_invalid() {
        assert!(validate_config_value("os", "windows").is_err());
    }

    #[test]
    fn validate_booleans() {
        assert!(validate_config_value("physical_device", "true").is_ok());
        assert!(validate_config_value("desktop_alerts", "no").is_ok());
        assert!(validate_config_value("physical_device", "maybe").is_err());
    }

    #[test]
    fn validate_free_strings() {
        assert!(validate_config_value("project_id", "anything").is_ok());
        assert!(validate_config_value("gateway_url", "http://x").is_ok());
    }
}
