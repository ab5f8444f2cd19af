//! Element, season and station descriptors used to label charts.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label shown while station metadata has not arrived.
pub const LOADING: &str = "loading";

/// Display strings for a climate element (e.g. `avgt`, `pcpn`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub label: String,
    pub axis_label: String,
    pub tooltip_units: String,
}

/// Display strings for a season (e.g. `ANN`, `JJA`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonInfo {
    pub title: String,
}

/// Lookup tables for elements and seasons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    elements: HashMap<String, ElementInfo>,
    seasons: HashMap<String, SeasonInfo>,
}

static ELEMENTS: &[(&str, &str, &str, &str)] = &[
    ("avgt", "Average Temperature", "Temperature (°F)", "°F"),
    ("maxt", "Maximum Temperature", "Temperature (°F)", "°F"),
    ("mint", "Minimum Temperature", "Temperature (°F)", "°F"),
    ("pcpn", "Total Precipitation", "Precipitation (inches)", "in"),
    ("snow", "Total Snowfall", "Snowfall (inches)", "in"),
    ("gdd50", "Growing Degree Days (base 50°F)", "Degree Days", "GDD"),
    ("hdd65", "Heating Degree Days (base 65°F)", "Degree Days", "HDD"),
    ("cdd65", "Cooling Degree Days (base 65°F)", "Degree Days", "CDD"),
];

static SEASONS: &[(&str, &str)] = &[
    ("ANN", "Annual"),
    ("MAM", "Spring"),
    ("JJA", "Summer"),
    ("SON", "Fall"),
    ("DJF", "Winter"),
];

impl Catalog {
    /// The standard element and season tables.
    pub fn builtin() -> Self {
        let elements = ELEMENTS
            .iter()
            .map(|(code, label, axis, units)| {
                (
                    code.to_string(),
                    ElementInfo {
                        label: label.to_string(),
                        axis_label: axis.to_string(),
                        tooltip_units: units.to_string(),
                    },
                )
            })
            .collect();
        let seasons = SEASONS
            .iter()
            .map(|(code, title)| {
                (
                    code.to_string(),
                    SeasonInfo {
                        title: title.to_string(),
                    },
                )
            })
            .collect();

        Self { elements, seasons }
    }

    /// Loads a catalog from a JSON file with `elements` and `seasons` objects.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn element(&self, code: &str) -> Option<&ElementInfo> {
        self.elements.get(code)
    }

    pub fn season(&self, code: &str) -> Option<&SeasonInfo> {
        self.seasons.get(code)
    }
}

/// Source of station display names.
pub trait MetadataLookup {
    fn station_name(&self, sid: &str) -> Option<&str>;

    /// The station name, or [`LOADING`] when unknown.
    fn display_name(&self, sid: &str) -> String {
        self.station_name(sid).unwrap_or(LOADING).to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationInfo {
    pub name: String,
}

/// Station metadata keyed by station id.
///
/// Stored as a JSON object on disk; fields other than `name` are ignored:
/// ```json
/// { "304174": { "name": "Ithaca Cornell Univ", "state": "NY" } }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StationMeta {
    entries: HashMap<String, StationInfo>,
}

impl StationMeta {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let entries: HashMap<String, StationInfo> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }
}

impl MetadataLookup for StationMeta {
    fn station_name(&self, sid: &str) -> Option<&str> {
        self.entries.get(sid).map(|s| s.name.as_str())
    }
}

impl<M: MetadataLookup> MetadataLookup for Option<M> {
    fn station_name(&self, sid: &str) -> Option<&str> {
        self.as_ref().and_then(|m| m.station_name(sid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookups() {
        let catalog = Catalog::builtin();
        let avgt = catalog.element("avgt").unwrap();
        assert_eq!(avgt.label, "Average Temperature");
        assert_eq!(avgt.tooltip_units, "°F");
        assert_eq!(catalog.season("JJA").unwrap().title, "Summer");
        assert!(catalog.element("nope").is_none());
    }

    #[test]
    fn test_station_name_falls_back_to_loading() {
        let meta =
            StationMeta::from_json(r#"{"304174": {"name": "Ithaca", "state": "NY"}}"#).unwrap();
        assert_eq!(meta.display_name("304174"), "Ithaca");
        assert_eq!(meta.display_name("999"), LOADING);

        let absent: Option<StationMeta> = None;
        assert_eq!(absent.display_name("304174"), LOADING);
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "elements": {"x": {"label": "X", "axis_label": "X axis", "tooltip_units": "u"}},
            "seasons": {"S": {"title": "Some"}}
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.element("x").unwrap().axis_label, "X axis");
        assert_eq!(catalog.season("S").unwrap().title, "Some");
    }
}
