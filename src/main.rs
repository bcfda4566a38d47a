mod app;
mod config;
mod display;
mod error;
mod export;
mod logging;
mod position;
mod session;

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use log::{error, info};

use crate::app::HotspotApp;
use crate::config::AppConfig;
use crate::session::SourceFile;

/// Mark one hotspot per image across an image sequence and export the
/// positions as JSON percentages.
#[derive(Parser, Debug)]
#[command(name = "hotspot-picker", version)]
struct Cli {
    /// Images to load at startup, in order
    paths: Vec<PathBuf>,

    /// Marker radius subtracted from click coordinates
    #[arg(long)]
    marker_half_size: Option<f64>,

    /// Plot on right-click instead of clearing the position
    #[arg(long)]
    no_secondary_clear: bool,

    /// Reject non-numeric coordinates and clamp to 0-100
    #[arg(long)]
    strict: bool,
}

impl Cli {
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(half) = self.marker_half_size {
            config.marker_half_size = half;
        }
        if self.no_secondary_clear {
            config.secondary_clears = false;
        }
        if self.strict {
            config.strict_coordinates = true;
        }
    }
}

fn main() -> eframe::Result<()> {
    logging::setup_logger();
    let cli = Cli::parse();

    let saved_config = AppConfig::load();
    let mut config = saved_config.clone();
    cli.apply_to(&mut config);
    info!("Starting with {config:?}");

    let mut initial = Vec::with_capacity(cli.paths.len());
    for path in &cli.paths {
        match SourceFile::read(path) {
            Ok(file) => initial.push(file),
            Err(err) => error!("{err}"),
        }
    }

    let title = "hotspot-picker";
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title(title)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        title,
        options,
        Box::new(move |cc| Ok(Box::new(HotspotApp::new(cc, saved_config, config, initial)))),
    )
}
