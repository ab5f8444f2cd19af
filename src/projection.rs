//! Rolling statistics over a low/median/high multi-model envelope,
//! split into a historical and a projected period.

use serde::Serialize;
use tracing::debug;

use crate::observation::DEFAULT_WINDOW;
use crate::plot::{BandPoint, LinePoint};
use crate::range::{AxisRange, RangeTracker};
use crate::record::{YearIndex, YearRecord};
use crate::series::EnvelopePoint;
use crate::window::RollingWindow;

/// Last year of the historical period.
pub const DEFAULT_BOUNDARY_YEAR: i32 = 2020;

/// Mean of the median component over each period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodMeans {
    pub historical: Option<f64>,
    pub projected: Option<f64>,
    /// First year after the boundary, if the series reaches it.
    pub split_year: Option<i32>,
}

/// Result of [`ProjectionAggregator::summarize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectionSummary {
    pub by_year: YearIndex,
    pub year_range: Option<AxisRange<i32>>,
    pub value_range: Option<AxisRange<f64>>,
    pub historical_band: Vec<BandPoint>,
    pub projected_band: Vec<BandPoint>,
    /// Trailing mean of the median, across both periods.
    pub smoothed_line: Vec<LinePoint>,
    pub period_means: PeriodMeans,
    pub points: usize,
    /// Envelopes dropped for a non-finite component.
    pub skipped: usize,
}

#[derive(Default)]
struct PeriodTotal {
    sum: f64,
    count: usize,
}

impl PeriodTotal {
    fn add(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Multi-series aggregator with a hard period boundary.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionAggregator {
    window: usize,
    boundary_year: i32,
}

impl Default for ProjectionAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_BOUNDARY_YEAR)
    }
}

impl ProjectionAggregator {
    pub fn new(window: usize, boundary_year: i32) -> Self {
        Self {
            window,
            boundary_year,
        }
    }

    pub fn boundary_year(&self) -> i32 {
        self.boundary_year
    }

    /// Summarizes a year-ascending envelope series.
    ///
    /// The rolling window and the period total restart at the first year
    /// past the boundary, so no projected mean ever includes a historical
    /// value. Envelopes with a non-finite component are skipped like a
    /// missing year. The summary is returned even when too short to chart.
    pub fn summarize(&self, series: &[EnvelopePoint]) -> ProjectionSummary {
        let mut summary = ProjectionSummary::default();
        let mut years = RangeTracker::new();
        let mut values = RangeTracker::new();
        let mut window = RollingWindow::<3>::new(self.window);
        let mut total = PeriodTotal::default();
        let mut projected = false;

        for point in series {
            let year = point.year;
            let v = point.rounded();
            if !v.iter().all(|c| c.is_finite()) {
                summary.skipped += 1;
                continue;
            }

            years.include(year);
            values.include(v[0]);
            values.include(v[2]);

            if !projected && year > self.boundary_year {
                summary.period_means.historical = total.mean();
                summary.period_means.split_year = Some(year);
                total = PeriodTotal::default();
                window.reset();
                projected = true;
                debug!(year, historical = ?summary.period_means.historical, "Crossed period boundary");
            }

            total.add(v[1]);
            let mean = window.push(year, v);

            if let Some(m) = mean {
                let band = BandPoint::from_envelope(year, m);
                summary.smoothed_line.push(band.median_point());
                if projected {
                    summary.projected_band.push(band);
                } else {
                    summary.historical_band.push(band);
                }
            }

            summary.by_year.insert(year, YearRecord::projection(v, mean));
            summary.points += 1;
        }

        if projected {
            summary.period_means.projected = total.mean();
        } else {
            summary.period_means.historical = total.mean();
        }

        summary.year_range = years.finish();
        summary.value_range = values.finish();

        debug!(
            points = summary.points,
            skipped = summary.skipped,
            historical_band = summary.historical_band.len(),
            projected_band = summary.projected_band.len(),
            "Projection series summarized"
        );

        summary
    }
}
