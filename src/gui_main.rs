//! txcast GUI entry point
//!
//! Launches the egui window for the broadcast form.

#![cfg_attr(windows, windows_subsystem = "windows")]

use clap::Parser;
use txcast::ConfigArgs;

/// txcast window - broadcast raw transactions through a local relay
#[derive(Parser)]
#[command(name = "txcast-gui")]
#[command(version)]
struct GuiCli {
    #[command(flatten)]
    config: ConfigArgs,
}

fn main() {
    let cli = GuiCli::parse();

    let result = cli.config.resolve().and_then(|config| {
        if let Err(e) = txcast::logging::init(&config) {
            eprintln!("Warning: {}", e);
        }
        txcast::gui::run(config)
    });

    txcast::logging::flush();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
