#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use clap::Parser;
use std::path::PathBuf;

use holiday_lights::photo::street_view_url;
use holiday_lights::{AppConfig, HolidayLightsApp, ImageSource};

/// Sketch light strands on a photo of your home and preview them lit up
#[derive(Debug, Parser)]
#[command(name = "holiday-lights", version, about)]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Photo to open at startup: a file path, an http(s) URL or a data URI
    #[arg(long, conflicts_with = "address")]
    image: Option<String>,

    /// Street address to fetch a street-level photo for
    #[arg(long)]
    address: Option<String>,
}

fn initial_source(args: &Args, config: &AppConfig) -> Option<ImageSource> {
    if let Some(image) = &args.image {
        return Some(ImageSource::parse(image));
    }
    let address = args.address.as_deref()?;
    match &config.mapping_api_key {
        Some(key) => Some(ImageSource::Url(street_view_url(address, key))),
        None => {
            log::error!("--address needs a mapping service key; ignoring it");
            None
        }
    }
}

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let args = Args::parse();
    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid configuration, using defaults: {}", err);
            let mut config = AppConfig::default();
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
    };
    let initial = initial_source(&args, &config);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Holiday Lights",
        native_options,
        Box::new(|cc| Ok(Box::new(HolidayLightsApp::new(cc, config, initial)))),
    )
}
