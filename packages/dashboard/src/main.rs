#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the flood dashboard.
//!
//! `serve` starts the JSON API, `report` prints one rendered report, and
//! with no subcommand (or `interactive`) the dashboard runs as a terminal
//! menu.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flood_map_dashboard::{
    COORDINATES_ENV, DATA_ENV, DashboardConfig, build_dashboard, interactive, load_coordinates,
    load_dataset, report, resolve_selection, serve_blocking,
};

#[derive(Parser)]
#[command(
    name = "flood_map_dashboard",
    about = "West Java flood dashboard (JSON API and terminal report)"
)]
struct Cli {
    /// Extracted flood CSV
    #[arg(long, global = true, env = DATA_ENV)]
    data: Option<PathBuf>,

    /// Replacement city coordinate table (TOML)
    #[arg(long, global = true, env = COORDINATES_ENV)]
    coordinates: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the JSON API server (BIND_ADDR, PORT)
    Serve,
    /// Print the dashboard report once
    Report {
        /// Year to show, or `all`
        #[arg(long)]
        year: Option<String>,
        /// City to show, or `all`
        #[arg(long)]
        city: Option<String>,
    },
    /// Browse the dashboard interactively
    Interactive,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _multi = flood_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = DashboardConfig {
        data_path: cli.data.unwrap_or_else(|| DashboardConfig::default().data_path),
        coordinates_path: cli.coordinates,
    };

    match cli.command {
        Some(Commands::Serve) => serve_blocking(config)?,
        Some(Commands::Report { year, city }) => {
            print_report(&config, year.as_deref(), city.as_deref());
        }
        Some(Commands::Interactive) | None => interactive::run(&config)?,
    }

    Ok(())
}

/// Prints the report, or the error in its place.
fn print_report(config: &DashboardConfig, year: Option<&str>, city: Option<&str>) {
    let rendered = load_coordinates(config.coordinates_path.as_deref()).and_then(|table| {
        let dataset = load_dataset(&config.data_path)?;
        let selection = resolve_selection(&dataset.records, year, city)?;
        Ok(report::render(&build_dashboard(
            &dataset.records,
            &selection,
            &table,
        )))
    });

    match rendered {
        Ok(text) => print!("{text}"),
        Err(e) => eprintln!("Error: {e}"),
    }
}
