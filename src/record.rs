//! Per-year derived records and the year-keyed index over them.

use serde::Serialize;
use std::collections::BTreeMap;

/// Everything derived for one year.
///
/// Field ownership is split by pass: the observation pass writes
/// `observed` and `observed_mean`, the projection pass writes `projected`
/// and `projected_mean`. Records from both passes are combined with
/// [`YearRecord::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct YearRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_mean: Option<f64>,
    /// `[low, median, high]` for the year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected: Option<[f64; 3]>,
    /// Trailing 5-year mean of each envelope component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_mean: Option<[f64; 3]>,
}

impl YearRecord {
    pub fn observation(observed: f64, observed_mean: Option<f64>) -> Self {
        Self {
            observed: Some(observed),
            observed_mean,
            ..Default::default()
        }
    }

    pub fn projection(projected: [f64; 3], projected_mean: Option<[f64; 3]>) -> Self {
        Self {
            projected: Some(projected),
            projected_mean,
            ..Default::default()
        }
    }

    /// Fills fields that are still empty from `other`; set fields are kept.
    pub fn merge(&mut self, other: &YearRecord) {
        self.observed = self.observed.or(other.observed);
        self.observed_mean = self.observed_mean.or(other.observed_mean);
        self.projected = self.projected.or(other.projected);
        self.projected_mean = self.projected_mean.or(other.projected_mean);
    }

    pub fn is_empty(&self) -> bool {
        *self == YearRecord::default()
    }

    /// Holds something a hover can point at.
    pub fn is_selectable(&self) -> bool {
        self.observed.is_some() || self.projected.is_some()
    }
}

/// Year used by the tooltip collaborator to mean "nothing selected".
pub const NO_SELECTION: i32 = 0;

/// Lookup from exact year to its [`YearRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct YearIndex {
    records: BTreeMap<i32, YearRecord>,
}

impl YearIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `record` under `year`, merging into any existing entry.
    pub fn insert(&mut self, year: i32, record: YearRecord) {
        self.records
            .entry(year)
            .and_modify(|existing| existing.merge(&record))
            .or_insert(record);
    }

    /// Merges every entry of `other` into this index.
    pub fn absorb(&mut self, other: &YearIndex) {
        for (year, record) in other.iter() {
            self.insert(year, *record);
        }
    }

    pub fn get(&self, year: i32) -> Option<&YearRecord> {
        self.records.get(&year)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.records.contains_key(&year)
    }

    /// Tooltip lookup: an empty record when `year` is absent or [`NO_SELECTION`].
    pub fn lookup(&self, year: i32) -> YearRecord {
        if year == NO_SELECTION {
            return YearRecord::default();
        }
        self.get(year).copied().unwrap_or_default()
    }

    /// Snaps a hovered year to a selectable one, or [`NO_SELECTION`].
    pub fn select(&self, year: i32) -> i32 {
        match self.get(year) {
            Some(record) if record.is_selectable() => year,
            _ => NO_SELECTION,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entries in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &YearRecord)> {
        self.records.iter().map(|(y, r)| (*y, r))
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.records.keys().copied()
    }
}
