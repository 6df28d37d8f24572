#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the flood record extractor.
//!
//! `run` executes the pipeline from flags; with no subcommand the tool
//! prompts for its options interactively.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use flood_map_cli_utils::IndicatifProgress;
use flood_map_disaster_models::{
    DEFAULT_DISASTER_TYPE_KEYWORD, DEFAULT_PROVINCE_KEYWORD, FilterKeywords,
};
use flood_map_extract::{ExtractOptions, interactive, paths, run_extraction};

#[derive(Parser)]
#[command(
    name = "flood_map_extract",
    about = "Extract West Java flood records from the disaster spreadsheet"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the extraction with the given options
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Source spreadsheet (.xlsx, .xls, .ods) or CSV
    #[arg(long, env = "FLOOD_MAP_INPUT")]
    input: Option<PathBuf>,

    /// Destination CSV
    #[arg(long, env = "FLOOD_MAP_OUTPUT")]
    output: Option<PathBuf>,

    /// Keyword the disaster type must contain (case-insensitive)
    #[arg(long, default_value = DEFAULT_DISASTER_TYPE_KEYWORD)]
    disaster_type: String,

    /// Keyword the province must contain (case-insensitive)
    #[arg(long, default_value = DEFAULT_PROVINCE_KEYWORD)]
    province: String,
}

impl RunArgs {
    fn into_options(self) -> ExtractOptions {
        ExtractOptions {
            input: self.input.unwrap_or_else(paths::default_input_path),
            output: self.output.unwrap_or_else(paths::default_output_path),
            keywords: FilterKeywords::new(self.disaster_type, self.province),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = flood_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let options = match cli.command {
        Some(Commands::Run(args)) => args.into_options(),
        None => {
            let Some(options) = interactive::prompt_options(&ExtractOptions::default())? else {
                log::info!("Extraction cancelled");
                return Ok(());
            };
            options
        }
    };

    let progress = IndicatifProgress::rows_bar(&multi, "Reading source");
    let summary = run_extraction(&options, progress.as_ref())?;

    log::info!(
        "{} flood records retained out of {} rows",
        summary.retained,
        summary.rows_read
    );
    println!("{} records written to {}", summary.retained, options.output.display());
    print!("{}", summary.preview_table());

    Ok(())
}
