//! Interactive prompts for the extractor.
//!
//! Asks for the input and output paths and the two filter keywords,
//! pre-filled with the current defaults, so the extractor can be run
//! without remembering flags.

use dialoguer::Confirm;
use flood_map_cli_utils::{prompt_path, prompt_text};
use flood_map_disaster_models::FilterKeywords;

use crate::ExtractOptions;

/// Prompts for extraction options starting from `defaults`.
///
/// Returns `None` if the user declines to start the run.
///
/// # Errors
///
/// Returns a [`dialoguer::Error`] if the terminal interaction fails.
pub fn prompt_options(
    defaults: &ExtractOptions,
) -> Result<Option<ExtractOptions>, dialoguer::Error> {
    let input = prompt_path("Source spreadsheet", &defaults.input)?;
    let output = prompt_path("Output CSV", &defaults.output)?;
    let disaster_type = prompt_text(
        "Disaster type keyword",
        &defaults.keywords.disaster_type,
    )?;
    let province = prompt_text("Province keyword", &defaults.keywords.province)?;

    let options = ExtractOptions {
        input,
        output,
        keywords: FilterKeywords::new(disaster_type.trim(), province.trim()),
    };

    let proceed = Confirm::new()
        .with_prompt(format!(
            "Extract '{}' records in '{}' from {} into {}?",
            options.keywords.disaster_type,
            options.keywords.province,
            options.input.display(),
            options.output.display()
        ))
        .default(true)
        .interact()?;

    Ok(proceed.then_some(options))
}
