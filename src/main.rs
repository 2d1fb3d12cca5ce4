/// `LiveCrab` - A live log viewer
///
/// Copyright (C) 2025 Daniel Freiermuth
///
/// This program is free software: you can redistribute it and/or modify
/// it under the terms of the GNU General Public License as published by
/// the Free Software Foundation, either version 3 of the License, or
/// (at your option) any later version.
///
/// This program is distributed in the hope that it will be useful,
/// but WITHOUT ANY WARRANTY; without even the implied warranty of
/// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
/// GNU General Public License for more details.
///
/// You should have received a copy of the GNU General Public License
/// along with this program.  If not, see <https://www.gnu.org/licenses/>.
mod config;
mod core;
mod ui;

use clap::Parser;
use ui::app::LiveCrabApp;

#[derive(Parser, Debug)]
#[command(name = "livecrab")]
#[command(author = "LiveCrab Team")]
#[command(version)]
#[command(about = "Follow a server's live log stream in a growing table", long_about = None)]
struct Args {
    /// Base URL of the log server (e.g. http://localhost:8080/)
    #[arg(value_name = "SERVER_URL")]
    server: Option<String>,
}

fn main() -> eframe::Result<()> {
    // Initialize logger with millisecond precision timestamps
    // Set RUST_LOG environment variable to override (e.g., RUST_LOG=debug)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!(
        "LiveCrab starting up (version {})",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    if let Some(ref server) = args.server {
        log::info!("Following server from command line: {server}");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([700.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "LiveCrab - Live Log Viewer",
        native_options,
        Box::new(move |cc| Ok(Box::new(LiveCrabApp::new(cc, args.server)))),
    )
}
