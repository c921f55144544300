mod config;
mod diagram;
mod io;
mod model;
mod state;
mod ui;

use anyhow::{Context, Result};
use tracing::{error, info};

use config::AppConfig;
use state::AppState;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    if let Err(e) = run() {
        error!("Application error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    info!("Starting connection manager...");

    let config = AppConfig::from_env().context("Failed to read configuration")?;
    info!("Backend page: {}", config.page_url);

    let title = config.window_title.clone();
    let state = AppState::new(config)?;

    info!("Launching UI...");

    #[cfg(feature = "desktop")]
    let builder = dioxus::LaunchBuilder::desktop().with_cfg(
        dioxus::desktop::Config::new().with_window(
            dioxus::desktop::WindowBuilder::new()
                .with_title(title)
                .with_always_on_top(false),
        ),
    );
    #[cfg(not(feature = "desktop"))]
    let builder = {
        let _ = title;
        dioxus::LaunchBuilder::new()
    };

    builder.with_context(state).launch(ui::App);

    Ok(())
}
