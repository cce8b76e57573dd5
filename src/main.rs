mod app;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::CaseBrowserApp;
use case_browser::config::BrowserConfig;
use case_browser::state::BrowserState;
use clap::Parser;
use eframe::egui;

#[derive(Parser, Debug)]
#[command(name = "case-browser", version, about = "Browse and filter case-note datasets")]
struct Cli {
    /// Dataset to open on start (.parquet, .json or .csv)
    path: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BrowserConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BrowserConfig::load().unwrap_or_else(|e| {
            log::warn!("ignoring unreadable config: {e}");
            BrowserConfig::default()
        }),
    };

    let mut state = BrowserState::new(config);
    if let Some(path) = &cli.path {
        state.path_input = path.display().to_string();
    }
    state.load_path();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 850.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Case Browser – ethics committee notes",
        options,
        Box::new(|_cc| Ok(Box::new(CaseBrowserApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
