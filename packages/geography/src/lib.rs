#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City coordinate lookup for the flood map.
//!
//! The map places one marker per city at a fixed centroid. Centroids come
//! from a small TOML table; the West Java table is embedded at compile
//! time via [`include_str!`] and another file of the same shape can be
//! loaded at runtime. Cities missing from the table are simply not mapped.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Embedded coordinate table for West Java.
const JAWA_BARAT_TOML: &str = include_str!("../coordinates/jawa_barat.toml");

/// Errors that can occur loading a coordinate table.
#[derive(Debug, Error)]
pub enum CoordinateError {
    /// Reading the table file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The same city appears twice.
    #[error("Duplicate city '{name}' in coordinate table")]
    DuplicateCity {
        /// The repeated name.
        name: String,
    },

    /// A latitude or longitude is outside its valid range.
    #[error("Invalid coordinates for '{name}': ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// City name.
        name: String,
        /// Offending latitude.
        latitude: f64,
        /// Offending longitude.
        longitude: f64,
    },
}

/// Initial map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Web-map zoom level.
    pub zoom: u8,
}

/// One city centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCoordinate {
    /// City name exactly as it appears in the data.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// City name to centroid lookup, plus the map's starting viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTable {
    /// Human-readable region name.
    pub name: String,
    /// Starting viewport.
    pub center: MapCenter,
    /// Centroids, in file order.
    pub cities: Vec<CityCoordinate>,
}

impl CoordinateTable {
    /// Parses and validates a table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] if the TOML is malformed, names a city
    /// twice, or holds out-of-range coordinates.
    pub fn from_toml(text: &str) -> Result<Self, CoordinateError> {
        let table: Self = toml::from_str(text)?;
        table.validate()?;
        Ok(table)
    }

    /// Reads a table from a TOML file.
    ///
    /// # Errors
    ///
    /// See [`CoordinateTable::from_toml`]; also fails if the file cannot be
    /// read.
    pub fn load_from_path(path: &Path) -> Result<Self, CoordinateError> {
        let table = Self::from_toml(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Loaded {} city coordinates for {} from {}",
            table.cities.len(),
            table.name,
            path.display()
        );
        Ok(table)
    }

    /// The embedded West Java table.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] if the embedded TOML does not parse.
    pub fn jawa_barat() -> Result<Self, CoordinateError> {
        Self::from_toml(JAWA_BARAT_TOML)
    }

    /// Loads `path` if given, otherwise the embedded West Java table.
    ///
    /// # Errors
    ///
    /// See [`CoordinateTable::load_from_path`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CoordinateError> {
        path.map_or_else(Self::jawa_barat, Self::load_from_path)
    }

    /// Looks up a city by exact name.
    #[must_use]
    pub fn get(&self, city: &str) -> Option<&CityCoordinate> {
        self.cities.iter().find(|c| c.name == city)
    }

    /// Whether `city` has a centroid.
    #[must_use]
    pub fn contains(&self, city: &str) -> bool {
        self.get(city).is_some()
    }

    /// Number of cities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the table has no cities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    fn validate(&self) -> Result<(), CoordinateError> {
        for (i, city) in self.cities.iter().enumerate() {
            if self.cities[..i].iter().any(|c| c.name == city.name) {
                return Err(CoordinateError::DuplicateCity {
                    name: city.name.clone(),
                });
            }
            if !(-90.0..=90.0).contains(&city.latitude)
                || !(-180.0..=180.0).contains(&city.longitude)
            {
                return Err(CoordinateError::InvalidCoordinate {
                    name: city.name.clone(),
                    latitude: city.latitude,
                    longitude: city.longitude,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_has_twelve_uppercase_cities() {
        let table = CoordinateTable::jawa_barat().unwrap();
        assert_eq!(table.len(), 12);
        assert!(
            table
                .cities
                .iter()
                .all(|c| c.name == c.name.to_uppercase())
        );
        assert_eq!(table.center.zoom, 9);
    }

    #[test]
    fn looks_up_known_cities() {
        let table = CoordinateTable::jawa_barat().unwrap();
        let bekasi = table.get("BEKASI").unwrap();
        assert!((bekasi.latitude - -6.2383).abs() < 1e-9);
        assert!((bekasi.longitude - 106.9756).abs() < 1e-9);
        assert!(table.contains("KARAWANG"));
        assert!(!table.contains("SURABAYA"));
        assert!(!table.contains("bekasi"));
    }

    #[test]
    fn rejects_duplicate_city() {
        let text = r#"
            name = "x"
            center = { latitude = 0.0, longitude = 0.0, zoom = 5 }
            [[cities]]
            name = "A"
            latitude = 1.0
            longitude = 1.0
            [[cities]]
            name = "A"
            latitude = 2.0
            longitude = 2.0
        "#;
        assert!(matches!(
            CoordinateTable::from_toml(text),
            Err(CoordinateError::DuplicateCity { ref name }) if name == "A"
        ));
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let text = r#"
            name = "x"
            center = { latitude = 0.0, longitude = 0.0, zoom = 5 }
            [[cities]]
            name = "A"
            latitude = 107.6
            longitude = -6.9
        "#;
        assert!(matches!(
            CoordinateTable::from_toml(text),
            Err(CoordinateError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn loads_from_file_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "name = \"Banten\"\n\
             cities = []\n\
             [center]\n\
             latitude = -6.1\n\
             longitude = 106.1\n\
             zoom = 8\n",
        )
        .unwrap();

        let custom = CoordinateTable::load_or_default(Some(&path)).unwrap();
        assert_eq!(custom.name, "Banten");
        assert!(custom.is_empty());

        let default = CoordinateTable::load_or_default(None).unwrap();
        assert_eq!(default.name, "Jawa Barat");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            CoordinateTable::from_toml("name = "),
            Err(CoordinateError::Toml(_))
        ));
    }
}
