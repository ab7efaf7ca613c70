pub mod driver;
pub mod errors;
pub mod host;
pub mod models;
pub mod provider;
pub mod render;
pub mod scheduler;
pub mod settings;

use crate::driver::{SystemClock, WidgetDriver};
use crate::errors::{AppError, AppResult};
use crate::host::DashboardHost;
use crate::models::Screen;
use crate::settings::HostSettings;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

pub const SETTINGS_ENV: &str = "DASHBOARD_SETTINGS";

pub async fn run(settings_path: Option<PathBuf>) -> AppResult<()> {
    let settings = HostSettings::load(settings_path.as_deref())?;
    init_tracing(settings.log_dir.as_deref()).map_err(AppError::Internal)?;

    let configuration = settings.display_configuration();
    let host = DashboardHost::new(settings.build_provider(), settings.fetch_timeout());
    tracing::info!(
        display_mode = configuration.display_mode.as_str(),
        color_theme = configuration.color_theme.as_str(),
        refresh_cycles = settings.refresh_cycles,
        "dashboard host started"
    );

    let mut driver = WidgetDriver::new(&host, SystemClock, std::io::stdout());
    for screen in Screen::ALL {
        let layout = host.render_screen(screen).await?;
        tracing::debug!(screen = screen.as_str(), "screen rendered");
        driver.emit(&json!({ "screen": screen.as_str(), "layout": layout }))?;
    }

    driver.emit_entry("placeholder", &host.placeholder_entry())?;
    driver.run(configuration, settings.refresh_cycles).await
}

pub fn init_tracing(log_dir: Option<&Path>) -> Result<(), String> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let Some(log_dir) = log_dir else {
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|error| error.to_string());
    };

    std::fs::create_dir_all(log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "dashboard.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}
