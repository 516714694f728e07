//! Main app runner

use std::process::ExitCode;
use std::sync::Arc;

use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::ports::{Alerter, ConfigStore, PushPlatform};
use crate::application::{PushSession, SessionCallbacks, SessionState};
use crate::domain::config::AppConfig;
use crate::domain::notification::NotificationEvent;
use crate::infrastructure::{
    ConsoleAlerter, GatewayPlatform, NotifyRustAlerter, SimulatedPlatform, XdgConfigStore,
};

use super::args::{RunMode, RunOptions};
use super::presenter::Presenter;
use super::screen::ScreenModel;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Load and merge configuration from file and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Merge: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Run a push session until Ctrl-C (or, with `--once`, until registration
/// and injected input have been processed).
pub async fn run(options: RunOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let alerter: Arc<dyn Alerter> = if options.desktop_alerts {
        Arc::new(NotifyRustAlerter::new())
    } else {
        Arc::new(ConsoleAlerter::new())
    };

    // Build the platform adapter. Simulate modes keep a concrete handle so
    // stdin-injected notifications can be delivered through it.
    let mut simulated: Option<Arc<SimulatedPlatform>> = None;
    let platform: Arc<dyn PushPlatform> = match options.mode {
        RunMode::Gateway => Arc::new(
            GatewayPlatform::new(&options.gateway_url, &options.device_id, options.device)
                .with_alerter(Arc::clone(&alerter)),
        ),
        RunMode::SimulateEmulator => {
            let sim = Arc::new(SimulatedPlatform::emulator(options.device.os));
            simulated = Some(Arc::clone(&sim));
            sim
        }
        RunMode::SimulateDevice => {
            let sim = Arc::new(SimulatedPlatform::device(options.device.os));
            simulated = Some(Arc::clone(&sim));
            sim
        }
    };

    // Callbacks (simplified - use eprintln for status)
    let callbacks = SessionCallbacks {
        on_diagnostic: Some(Box::new(|line: &str| {
            eprintln!("{} {}", "ℹ".cyan(), line);
        })),
        on_received: Some(Box::new(|event: &NotificationEvent| {
            let json = serde_json::to_string(event).unwrap_or_default();
            eprintln!("{} Notification received: {}", "ℹ".cyan(), json);
        })),
        on_response: Some(Box::new(|response| {
            let json = serde_json::to_string(response).unwrap_or_default();
            eprintln!("{} Notification response: {}", "ℹ".cyan(), json);
        })),
    };

    let session = PushSession::new(platform, alerter, options.project_id.clone());
    let (mut active, mut state) = match session.activate(callbacks).await {
        Ok(activated) => activated,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if options.once {
        // One-shot: resolve registration, drain injected input, render, exit.
        presenter.start_spinner("Registering for push notifications...");
        let registration = active.wait_for_registration().await;
        match &registration {
            Ok(()) => presenter.stop_spinner(),
            Err(e) => presenter.spinner_fail(&e.to_string()),
        }

        if let Some(sim) = simulated {
            feed_stdin(sim).await;
        }

        render(&presenter, &state);

        if let Err(e) = active.shutdown().await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return match registration {
            Ok(()) => ExitCode::from(EXIT_SUCCESS),
            Err(_) => ExitCode::from(EXIT_ERROR),
        };
    }

    if let Some(sim) = simulated {
        tokio::spawn(feed_stdin(sim));
    }

    presenter.info("Session active; press Ctrl-C to exit");
    render(&presenter, &state);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = state.changed() => {
                if !changed {
                    break;
                }
                render(&presenter, &state);
            }
        }
    }

    match active.shutdown().await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn render(presenter: &Presenter, state: &SessionState) {
    let registration = state.registration();
    let notification = state.notification();
    let model = ScreenModel::project(&registration, notification.as_ref());
    presenter.output(&model.render());
}

/// Deliver JSON notification events read from stdin, one per line.
async fn feed_stdin(platform: Arc<SimulatedPlatform>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<NotificationEvent>(line) {
            Ok(event) => {
                platform.deliver(event);
            }
            Err(e) => {
                eprintln!("{} Ignoring malformed notification: {}", "⚠".yellow(), e);
            }
        }
    }
}

/// Resolve the configured project id, falling back to a fixed placeholder
/// for simulate modes.
pub fn get_project_id(
    config: &AppConfig,
    mode: RunMode,
) -> Option<crate::domain::registration::ProjectId> {
    match config.project_id() {
        Some(id) => Some(id),
        None if mode != RunMode::Gateway => Some(crate::domain::registration::ProjectId::new(
            "simulated-project",
        )),
        None => None,
    }
}
