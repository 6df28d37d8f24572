//! Interactive terminal dashboard.
//!
//! Renders the report for the current year/city selection, then lets the
//! user change either selector from the values present in the data. Errors
//! are printed in place of the report and the loop keeps running.

use dialoguer::Select;
use flood_map_analytics::{CitySelection, Selection, YearSelection, selector};
use flood_map_extract::dataset::Dataset;

use crate::{
    DashboardConfig, DashboardError, build_dashboard, load_coordinates, load_dataset, report,
};

/// Menu actions offered after each render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ChangeYear,
    ChangeCity,
    Reset,
    Reload,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ChangeYear,
        Self::ChangeCity,
        Self::Reset,
        Self::Reload,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ChangeYear => "Change year",
            Self::ChangeCity => "Change city",
            Self::Reset => "Show all years and cities",
            Self::Reload => "Reload data file",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if the coordinate table cannot be loaded or the
/// terminal interaction fails.
pub fn run(config: &DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let coordinates = load_coordinates(config.coordinates_path.as_deref())?;
    let mut dataset = load_dataset(&config.data_path);
    let mut selection = Selection::default();

    loop {
        match &dataset {
            Ok(data) => {
                let dashboard = build_dashboard(&data.records, &selection, &coordinates);
                print!("{}", report::render(&dashboard));
            }
            Err(e) => print_error(e),
        }
        println!();

        let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
        let idx = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::ChangeYear => {
                if let Ok(data) = &dataset {
                    selection.year = pick_year(data, selection.year)?;
                }
            }
            Action::ChangeCity => {
                if let Ok(data) = &dataset {
                    selection.city = pick_city(data, &selection.city)?;
                }
            }
            Action::Reset => selection = Selection::default(),
            Action::Reload => {
                dataset = load_dataset(&config.data_path);
                if let Ok(data) = &dataset
                    && selection.validate(&data.records).is_err()
                {
                    log::info!("Selection ({selection}) no longer matches the data; resetting");
                    selection = Selection::default();
                }
            }
            Action::Quit => return Ok(()),
        }
    }
}

fn print_error(e: &DashboardError) {
    eprintln!("{}", console::style(format!("Error: {e}")).red());
}

fn pick_year(data: &Dataset, current: YearSelection) -> Result<YearSelection, dialoguer::Error> {
    let years = selector::year_options(&data.records);
    let mut labels = vec!["All years".to_string()];
    labels.extend(years.iter().map(ToString::to_string));

    let default = match current {
        YearSelection::All => 0,
        YearSelection::Year(y) => years.iter().position(|&v| v == y).map_or(0, |i| i + 1),
    };

    let idx = Select::new()
        .with_prompt("Year")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(idx
        .checked_sub(1)
        .and_then(|i| years.get(i))
        .map_or(YearSelection::All, |&y| YearSelection::Year(y)))
}

fn pick_city(data: &Dataset, current: &CitySelection) -> Result<CitySelection, dialoguer::Error> {
    let cities = selector::city_options(&data.records);
    let mut labels = vec!["All cities".to_string()];
    labels.extend(cities.iter().cloned());

    let default = match current {
        CitySelection::All => 0,
        CitySelection::City(c) => cities.iter().position(|v| v == c).map_or(0, |i| i + 1),
    };

    let idx = Select::new()
        .with_prompt("City")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(idx
        .checked_sub(1)
        .and_then(|i| cities.get(i))
        .map_or(CitySelection::All, |c| CitySelection::City(c.clone())))
}
