mod app;
mod app_dir;
mod input;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context as _};
use clap::Parser;
use eframe::egui;
use tracing::{info, warn};

use glance_core::{DiskLoader, ViewController};
use glance_settings::{SettingsFile, WindowBoundsKeeper};

use crate::app::{GlanceApp, APP_NAME, DEFAULT_WINDOW_SIZE, WINDOW_BOUNDS_KEY};

/// Minimal image viewer: browse the JPEG files of one directory.
#[derive(Parser, Debug)]
#[command(name = "Glance", version, about)]
struct Cli {
    /// Image file to open, or a directory to browse. Defaults to the working directory.
    path: Option<PathBuf>,

    /// Settings file to use instead of the per-user one.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("Starting {APP_NAME}");

    let settings_path = cli.settings.unwrap_or_else(app_dir::settings_path);
    if let Err(e) = app_dir::create_settings_directory(&settings_path) {
        warn!(
            "Could not create settings directory for {}: {e}",
            settings_path.display()
        );
    }
    let mut settings = SettingsFile::open(&settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;

    let keeper = WindowBoundsKeeper::new(WINDOW_BOUNDS_KEY);
    let mut viewport = egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size(DEFAULT_WINDOW_SIZE);
    match keeper.restore(&mut settings)? {
        Some(bounds) => {
            info!("Restoring window bounds {bounds}");
            viewport = viewport
                .with_position([bounds.left as f32, bounds.top as f32])
                .with_inner_size([bounds.width as f32, bounds.height as f32]);
        }
        None => info!("No saved window bounds, using defaults"),
    }

    let controller = ViewController::open(cli.path.as_deref(), DiskLoader)
        .context("failed to list images")?;

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |_cc| Ok(Box::new(GlanceApp::new(controller, settings, keeper)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
