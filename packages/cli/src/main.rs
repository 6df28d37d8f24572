#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive CLI orchestrator for the flood map toolchain.
//!
//! Provides a unified entry point that lets users pick which tool to run
//! (extract, report, interactive dashboard, server) and guides them
//! through the configuration for each.
//!
//! Uses `indicatif-log-bridge` (via [`flood_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

use dialoguer::Select;
use flood_map_analytics::Selection;
use flood_map_cli_utils::IndicatifProgress;
use flood_map_dashboard::{
    DashboardConfig, build_dashboard, load_coordinates, load_dataset, report,
};
use flood_map_extract::{ExtractOptions, run_extraction};
use indicatif::MultiProgress;

/// Top-level tool selection for the flood map toolchain.
enum Tool {
    ExtractAndReport,
    Extract,
    Report,
    Dashboard,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[
        Self::ExtractAndReport,
        Self::Extract,
        Self::Report,
        Self::Dashboard,
        Self::Server,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ExtractAndReport => "Extract, then show the report",
            Self::Extract => "Extract flood records",
            Self::Report => "Show the dashboard report",
            Self::Dashboard => "Browse the dashboard",
            Self::Server => "Start server",
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = flood_map_cli_utils::init_logger();

    println!("Flood Map Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::ExtractAndReport => {
            if let Some(options) = extract(&multi)? {
                show_report(&DashboardConfig {
                    data_path: options.output,
                    coordinates_path: None,
                });
            }
        }
        Tool::Extract => {
            extract(&multi)?;
        }
        Tool::Report => show_report(&DashboardConfig::default()),
        Tool::Dashboard => flood_map_dashboard::interactive::run(&DashboardConfig::default())?,
        Tool::Server => flood_map_dashboard::serve_blocking(DashboardConfig::default())?,
    }

    Ok(())
}

/// Prompts for extraction options and runs the extractor.
///
/// Returns the options used, or `None` if the user cancelled.
fn extract(multi: &MultiProgress) -> Result<Option<ExtractOptions>, Box<dyn std::error::Error>> {
    let Some(options) =
        flood_map_extract::interactive::prompt_options(&ExtractOptions::default())?
    else {
        log::info!("Extraction cancelled");
        return Ok(None);
    };

    let progress = IndicatifProgress::rows_bar(multi, "Reading source");
    let summary = run_extraction(&options, progress.as_ref())?;

    println!(
        "{} records written to {}",
        summary.retained,
        options.output.display()
    );
    print!("{}", summary.preview_table());

    Ok(Some(options))
}

/// Prints the unfiltered report, or the error in its place.
fn show_report(config: &DashboardConfig) {
    let rendered = load_coordinates(config.coordinates_path.as_deref()).and_then(|table| {
        let dataset = load_dataset(&config.data_path)?;
        Ok(report::render(&build_dashboard(
            &dataset.records,
            &Selection::default(),
            &table,
        )))
    });

    match rendered {
        Ok(text) => print!("{text}"),
        Err(e) => eprintln!("Error: {e}"),
    }
}
