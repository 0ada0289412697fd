//! Command-line surface: startup arguments only. There is no headless mode —
//! the application always opens its window.

use clap::Parser;
use std::path::PathBuf;

/// Spirit Tracker — clickable icon grid for tracking game progression.
#[derive(Parser, Debug)]
#[command(
    name = "spirit-tracker",
    about = "Game progression item tracker",
    long_about = "Displays a layout of clickable tracker icons. Left-click an icon to\n\
                  cycle its state; right-click to jump to a state by name. The built-in\n\
                  editor (F3) edits element properties and saves the layout back to disk."
)]
pub struct CliArgs {
    /// Layout file to open at startup.
    #[arg(value_name = "LAYOUT")]
    pub layout: Option<PathBuf>,

    /// Open the layout editor window immediately.
    #[arg(long)]
    pub editor: bool,
}
