mod app;
mod cli;
mod color;
mod state;
mod ui;

use anyhow::Context;
use app::BikeDashApp;
use bike_dash::Loader;
use bike_dash::config::DashboardConfig;
use clap::Parser;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = cli::Cli::parse();
    let config = DashboardConfig::from_env()
        .context("reading configuration")?
        .with_overrides(cli.source.as_deref(), cli.timeout);

    let mut state = AppState::new(Loader::new(config.http_timeout));
    if let Some(source) = &config.source {
        state.source_input = source.to_string();
        state.load(source);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(BikeDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
