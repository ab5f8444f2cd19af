//! Chart view models: everything the renderer needs, in data space.

use serde::Serialize;
use std::fmt;

use crate::catalog::{Catalog, MetadataLookup};
use crate::observation::ObservationSummary;
use crate::plot::{BandPoint, LinePoint, ObservedPoint};
use crate::projection::{PeriodMeans, ProjectionSummary};
use crate::range::{AxisRange, merge_ranges};
use crate::record::{NO_SELECTION, YearIndex, YearRecord};

/// Whether a chart has enough data to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    Sufficient,
    /// Shown as "Insufficient Data Coverage" instead of a plot.
    Insufficient,
}

impl Coverage {
    pub fn is_sufficient(self) -> bool {
        self == Coverage::Sufficient
    }
}

/// Titles and labels around a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartHeader {
    pub title: String,
    pub station_name: String,
    pub axis_label: String,
    pub tooltip_units: String,
}

impl ChartHeader {
    /// Unknown element or season codes are shown verbatim.
    pub fn new(
        catalog: &Catalog,
        meta: &impl MetadataLookup,
        sid: &str,
        element: &str,
        season: &str,
    ) -> Self {
        let season_title = catalog
            .season(season)
            .map(|s| s.title.as_str())
            .unwrap_or(season);

        let (label, axis_label, tooltip_units) = match catalog.element(element) {
            Some(e) => (e.label.as_str(), e.axis_label.clone(), e.tooltip_units.clone()),
            None => (element, element.to_string(), String::new()),
        };

        Self {
            title: format!("{season_title} {label}"),
            station_name: meta.display_name(sid),
            axis_label,
            tooltip_units,
        }
    }
}

/// Observations of one station: dots plus the trailing-mean line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationChart {
    pub header: ChartHeader,
    pub coverage: Coverage,
    pub x_domain: Option<AxisRange<i32>>,
    pub y_domain: Option<AxisRange<f64>>,
    pub points: Vec<ObservedPoint>,
    pub mean_line: Vec<LinePoint>,
    /// Selected year, or [`NO_SELECTION`].
    pub selected: i32,
    /// Vertical rule across the value domain at the selected year.
    pub highlight: Option<[LinePoint; 2]>,
    pub rows: Option<Vec<String>>,
}

impl StationChart {
    pub fn build(summary: &ObservationSummary, header: ChartHeader, year: i32) -> Self {
        let coverage = if summary.year_range.is_some() {
            Coverage::Sufficient
        } else {
            Coverage::Insufficient
        };
        let selected = summary.by_year.select(year);

        let highlight = match summary.value_range {
            Some(r) if selected != NO_SELECTION => Some([
                LinePoint {
                    year: selected,
                    value: r.min,
                },
                LinePoint {
                    year: selected,
                    value: r.max,
                },
            ]),
            _ => None,
        };

        Self {
            header,
            coverage,
            x_domain: summary.year_range.map(|r| r.padded_years()),
            y_domain: summary.value_range,
            points: summary.points.clone(),
            mean_line: summary.smoothed_line(),
            selected,
            highlight,
            rows: summary.rows.clone(),
        }
    }
}

/// Projection envelope with the station's observations overlaid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridChart {
    pub header: ChartHeader,
    pub coverage: Coverage,
    pub x_domain: Option<AxisRange<i32>>,
    pub y_domain: Option<AxisRange<f64>>,
    pub by_year: YearIndex,
    pub observed: Vec<ObservedPoint>,
    pub observed_line: Vec<LinePoint>,
    pub historical_band: Vec<BandPoint>,
    pub projected_band: Vec<BandPoint>,
    pub projected_line: Vec<LinePoint>,
    pub period_means: PeriodMeans,
}

impl GridChart {
    /// Combines both passes into one year index and one pair of domains.
    ///
    /// The chart is drawable only with at least `min_points` observed points.
    pub fn build(
        observed: &ObservationSummary,
        projected: &ProjectionSummary,
        header: ChartHeader,
        min_points: usize,
    ) -> Self {
        let mut by_year = projected.by_year.clone();
        by_year.absorb(&observed.by_year);

        let coverage = if observed.points.len() >= min_points {
            Coverage::Sufficient
        } else {
            Coverage::Insufficient
        };

        Self {
            header,
            coverage,
            x_domain: merge_ranges(projected.year_range, observed.year_range)
                .map(|r| r.padded_years()),
            y_domain: merge_ranges(projected.value_range, observed.value_range),
            by_year,
            observed: observed.points.clone(),
            observed_line: observed.smoothed_line(),
            historical_band: projected.historical_band.clone(),
            projected_band: projected.projected_band.clone(),
            projected_line: projected.smoothed_line.clone(),
            period_means: projected.period_means,
        }
    }
}

/// Tooltip table for one year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfoPanel {
    pub units: String,
    pub observed_year: Option<String>,
    pub observed: Option<String>,
    /// e.g. `"2016–2020"`
    pub mean_years: Option<String>,
    pub mean: Option<String>,
}

impl InfoPanel {
    pub fn new(year: i32, record: &YearRecord, window: usize, units: &str) -> Self {
        let span = i32::try_from(window.saturating_sub(1)).unwrap_or(i32::MAX);
        Self {
            units: units.to_string(),
            observed_year: record.observed.map(|_| year.to_string()),
            observed: record.observed.map(|v| v.to_string()),
            mean_years: record
                .observed_mean
                .map(|_| format!("{}–{}", year.saturating_sub(span), year)),
            mean: record.observed_mean.map(|v| v.to_string()),
        }
    }

    /// Panel for whatever `index` holds at `year`; blank when nothing does.
    pub fn lookup(index: &YearIndex, year: i32, window: usize, units: &str) -> Self {
        Self::new(year, &index.lookup(year), window, units)
    }
}

impl fmt::Display for InfoPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blank = String::new();
        writeln!(f, "Observed {}", self.units)?;
        writeln!(
            f,
            "{:>9}  {}",
            self.observed_year.as_ref().unwrap_or(&blank),
            self.observed.as_ref().unwrap_or(&blank)
        )?;
        writeln!(
            f,
            "5-yr Mean  {}",
            self.mean.as_ref().unwrap_or(&blank)
        )?;
        write!(f, "{:>9}", self.mean_years.as_ref().unwrap_or(&blank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StationMeta;
    use crate::observation::ObservationAggregator;
    use crate::projection::ProjectionAggregator;
    use crate::series::{EnvelopePoint, RawPoint, Reading};

    fn header() -> ChartHeader {
        let meta = StationMeta::from_json(r#"{"sid1": {"name": "Albany"}}"#).unwrap();
        ChartHeader::new(&Catalog::builtin(), &meta, "sid1", "avgt", "ANN")
    }

    fn observed(years: std::ops::RangeInclusive<i32>) -> ObservationSummary {
        let series: Vec<_> = years
            .map(|y| RawPoint::new(y, Reading::Value(f64::from(y % 10))))
            .collect();
        ObservationAggregator::default().summarize(&series)
    }

    #[test]
    fn test_header_labels() {
        let h = header();
        assert_eq!(h.title, "Annual Average Temperature");
        assert_eq!(h.station_name, "Albany");
        assert_eq!(h.axis_label, "Temperature (°F)");

        let meta: Option<StationMeta> = None;
        let unknown = ChartHeader::new(&Catalog::builtin(), &meta, "x", "zzz", "Q1");
        assert_eq!(unknown.title, "Q1 zzz");
        assert_eq!(unknown.station_name, "loading");
    }

    #[test]
    fn test_station_chart_domains_and_highlight() {
        let summary = observed(2000..=2009);
        let chart = StationChart::build(&summary, header(), 2005);

        assert!(chart.coverage.is_sufficient());
        assert_eq!(chart.x_domain, Some(AxisRange { min: 1998, max: 2009 }));
        assert_eq!(chart.selected, 2005);
        let [bottom, top] = chart.highlight.unwrap();
        assert_eq!(bottom.value, 0.0);
        assert_eq!(top.value, 9.0);
        assert_eq!(chart.mean_line.len(), 6);
    }

    #[test]
    fn test_station_chart_unselectable_year() {
        let summary = observed(2000..=2009);
        let chart = StationChart::build(&summary, header(), 1950);
        assert_eq!(chart.selected, NO_SELECTION);
        assert_eq!(chart.highlight, None);
    }

    #[test]
    fn test_station_chart_empty_is_insufficient() {
        let summary = ObservationAggregator::default().summarize(&[]);
        let chart = StationChart::build(&summary, header(), 0);
        assert_eq!(chart.coverage, Coverage::Insufficient);
        assert_eq!(chart.x_domain, None);
    }

    #[test]
    fn test_grid_chart_merges_passes() {
        let obs = observed(2015..=2020);
        let proj_series: Vec<_> = (2010..=2030)
            .map(|y| EnvelopePoint::new(y, -5.0, 1.0, 20.0))
            .collect();
        let proj = ProjectionAggregator::default().summarize(&proj_series);
        let chart = GridChart::build(&obs, &proj, header(), 6);

        assert!(chart.coverage.is_sufficient());
        assert_eq!(chart.x_domain, Some(AxisRange { min: 2008, max: 2030 }));
        assert_eq!(chart.y_domain, Some(AxisRange { min: -5.0, max: 20.0 }));

        let r = chart.by_year.get(2018).unwrap();
        assert!(r.observed.is_some());
        assert!(r.projected.is_some());
        assert_eq!(chart.by_year.len(), 21);
    }

    #[test]
    fn test_grid_chart_needs_min_points() {
        let obs = observed(2016..=2020);
        let proj = ProjectionAggregator::default().summarize(&[]);
        let chart = GridChart::build(&obs, &proj, header(), 6);
        assert_eq!(chart.coverage, Coverage::Insufficient);
    }

    #[test]
    fn test_info_panel() {
        let summary = observed(2010..=2020);
        let panel = InfoPanel::lookup(&summary.by_year, 2020, 5, "°F");

        assert_eq!(panel.observed_year.as_deref(), Some("2020"));
        assert_eq!(panel.observed.as_deref(), Some("0"));
        assert_eq!(panel.mean_years.as_deref(), Some("2016–2020"));
        assert!(panel.to_string().contains("5-yr Mean"));

        let blank = InfoPanel::lookup(&summary.by_year, NO_SELECTION, 5, "°F");
        assert_eq!(blank.observed, None);
        assert_eq!(blank.mean, None);
    }

    #[test]
    fn test_info_panel_with_oversized_window() {
        let record = YearRecord::observation(1.5, Some(1.25));
        let panel = InfoPanel::new(2020, &record, usize::MAX, "in");

        assert_eq!(panel.mean.as_deref(), Some("1.25"));
        assert_eq!(panel.mean_years, Some(format!("{}–2020", 2020 - i32::MAX)));
    }
}
