// GUI-subsystem binary: no console window is allocated on Windows.
#![windows_subsystem = "windows"]
#![allow(dead_code)] // API surface kept for the state machine's accessors and tests

mod app;
mod cli;
mod components;
mod editor;
mod io;
mod layout;
pub mod logger;

use app::TrackerApp;
use clap::Parser;
use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    // Session log (overwrites the previous session's file)
    logger::init();

    let args = cli::CliArgs::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 620.0])
            .with_title("Spirit Tracker"),
        ..Default::default()
    };

    eframe::run_native(
        "Spirit Tracker",
        options,
        Box::new(move |cc| Box::new(TrackerApp::new(cc, args))),
    )
}
