//! Rolling statistics over one station's yearly observations.

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::plot::{LinePoint, ObservedPoint};
use crate::range::{AxisRange, RangeTracker};
use crate::record::{YearIndex, YearRecord};
use crate::series::{RawPoint, TracePolicy, round2};
use crate::window::rolling_means;

/// Width of the trailing mean, in years.
pub const DEFAULT_WINDOW: usize = 5;

/// One row of the observation export file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExportRow {
    pub year: i32,
    #[serde(serialize_with = "shortest_decimal")]
    pub obs: f64,
}

impl ExportRow {
    /// The row as a `"year,obs"` line.
    pub fn line(&self) -> String {
        format!("{},{}", self.year, self.obs)
    }
}

/// Writes `10.0` as `10`, matching the export row lines.
fn shortest_decimal<S: Serializer>(v: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(v)
}

/// Result of [`ObservationAggregator::summarize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObservationSummary {
    pub by_year: YearIndex,
    pub year_range: Option<AxisRange<i32>>,
    pub value_range: Option<AxisRange<f64>>,
    /// One entry per qualifying input, in input order.
    pub points: Vec<ObservedPoint>,
    /// `"year,value"` lines for export; absent when nothing qualified.
    pub rows: Option<Vec<String>>,
    /// Inputs dropped as missing.
    pub skipped: usize,
}

impl ObservationSummary {
    pub fn has_data(&self) -> bool {
        !self.points.is_empty()
    }

    /// The trailing-mean polyline, skipping years without a mean.
    pub fn smoothed_line(&self) -> Vec<LinePoint> {
        self.points
            .iter()
            .filter_map(|p| p.mean.map(|value| LinePoint { year: p.year, value }))
            .collect()
    }

    /// Structured form of `rows`, ascending by year.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.by_year
            .iter()
            .filter_map(|(year, r)| r.observed.map(|obs| ExportRow { year, obs }))
            .collect()
    }
}

/// Single-series aggregator tolerant of missing years.
#[derive(Debug, Clone, Copy)]
pub struct ObservationAggregator {
    window: usize,
    trace: TracePolicy,
}

impl Default for ObservationAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, TracePolicy::default())
    }
}

impl ObservationAggregator {
    pub fn new(window: usize, trace: TracePolicy) -> Self {
        Self { window, trace }
    }

    /// Summarizes a year-ascending series.
    ///
    /// Missing readings are skipped entirely. Values are rounded to 2
    /// decimals before use, and a year carries a mean only when it closes
    /// a gap-free run of `window` qualifying years.
    pub fn summarize(&self, series: &[RawPoint]) -> ObservationSummary {
        let mut summary = ObservationSummary::default();
        let mut years = RangeTracker::new();
        let mut values = RangeTracker::new();

        let qualifying = series.iter().filter_map(|p| {
            let resolved = p.reading.resolve(self.trace).map(|v| (p.year, [v]));
            if resolved.is_none() {
                summary.skipped += 1;
            }
            resolved
        });

        let mut points = Vec::with_capacity(series.len());
        let mut by_year = YearIndex::new();

        for item in rolling_means(qualifying, self.window) {
            let [value] = item.values;
            let mean = item.mean.map(|[m]| round2(m));

            years.include(item.year);
            values.include(value);

            points.push(ObservedPoint {
                year: item.year,
                value,
                mean,
            });
            by_year.insert(item.year, YearRecord::observation(value, mean));
        }

        summary.points = points;
        summary.by_year = by_year;
        summary.year_range = years.finish();
        summary.value_range = values.finish();

        if summary.has_data() {
            summary.rows = Some(
                summary
                    .export_rows()
                    .iter()
                    .map(ExportRow::line)
                    .collect(),
            );
        }

        debug!(
            qualifying = summary.points.len(),
            skipped = summary.skipped,
            "Observation series summarized"
        );

        summary
    }
}
