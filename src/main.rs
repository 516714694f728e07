//! PushInspector CLI entry point

use std::process::ExitCode;

use clap::Parser;

use push_inspector::cli::app::{get_project_id, load_merged_config, run, EXIT_ERROR, EXIT_USAGE_ERROR};
use push_inspector::cli::args::{Cli, Commands, RunMode, RunOptions};
use push_inspector::cli::config_cmd::handle_config_command;
use push_inspector::cli::presenter::Presenter;
use push_inspector::domain::config::AppConfig;
use push_inspector::domain::registration::DeviceInfo;
use push_inspector::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        project_id: cli.project_id.clone(),
        gateway_url: cli.gateway_url.clone(),
        device_id: cli.device_id.clone(),
        physical_device: None,
        os: cli.os.clone(),
        desktop_alerts: if cli.no_desktop_alerts {
            Some(false)
        } else {
            None
        },
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    let mode = if cli.simulate {
        RunMode::SimulateEmulator
    } else if cli.simulate_device {
        RunMode::SimulateDevice
    } else {
        RunMode::Gateway
    };

    let project_id = match get_project_id(&config, mode) {
        Some(id) => id,
        None => {
            presenter.error(
                "Missing project id. Set it via 'push-inspector config set project_id <id>' or --project-id",
            );
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    // Simulate flags override the configured device facts.
    let device = match mode {
        RunMode::SimulateEmulator => DeviceInfo {
            is_physical: false,
            os: config.os_or_default(),
        },
        RunMode::SimulateDevice => DeviceInfo {
            is_physical: true,
            os: config.os_or_default(),
        },
        RunMode::Gateway => config.device_info(),
    };

    let options = RunOptions {
        mode,
        project_id,
        gateway_url: config.gateway_url_or_default().to_string(),
        device_id: config.device_id_or_default().to_string(),
        device,
        desktop_alerts: config.desktop_alerts_or_default(),
        once: cli.once,
    };

    run(options).await
}
