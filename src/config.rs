use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::observation::{DEFAULT_WINDOW, ObservationAggregator};
use crate::projection::{DEFAULT_BOUNDARY_YEAR, ProjectionAggregator};
use crate::series::TracePolicy;
use crate::window::MAX_WINDOW;

/// Tunables for both aggregators and the coverage check.
///
/// Stored as a JSON object on disk; every field is optional:
/// ```json
/// { "window": 5, "boundary_year": 2020, "trace": "zero", "min_points": 6 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Width of the trailing mean, in years.
    pub window: usize,
    /// Last year of the historical projection period.
    pub boundary_year: i32,
    pub trace: TracePolicy,
    /// Fewest observed points a grid chart needs to be drawn.
    pub min_points: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            boundary_year: DEFAULT_BOUNDARY_YEAR,
            trace: TracePolicy::Zero,
            min_points: 6,
        }
    }
}

impl ChartConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: ChartConfig = serde_json::from_str(content)?;
        if !(1..=MAX_WINDOW).contains(&config.window) {
            bail!(
                "window must be between 1 and {} years, got {}",
                MAX_WINDOW,
                config.window
            );
        }
        Ok(config)
    }

    pub fn observation(&self) -> ObservationAggregator {
        ObservationAggregator::new(self.window, self.trace)
    }

    pub fn projection(&self) -> ProjectionAggregator {
        ProjectionAggregator::new(self.window, self.boundary_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(ChartConfig::from_json("{}").unwrap(), ChartConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let c = ChartConfig::from_json(r#"{"boundary_year": 2005, "trace": "exclude"}"#).unwrap();
        assert_eq!(c.boundary_year, 2005);
        assert_eq!(c.trace, TracePolicy::Exclude);
        assert_eq!(c.window, 5);
        assert_eq!(c.projection().boundary_year(), 2005);
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(ChartConfig::from_json(r#"{"window": 0}"#).is_err());
    }

    #[test]
    fn test_oversized_window_rejected() {
        let json = format!(r#"{{"window": {}}}"#, u64::MAX);
        assert!(ChartConfig::from_json(&json).is_err());
        assert!(ChartConfig::from_json(r#"{"window": 201}"#).is_err());
        assert_eq!(ChartConfig::from_json(r#"{"window": 200}"#).unwrap().window, MAX_WINDOW);
    }

    #[test]
    fn test_unknown_trace_rejected() {
        assert!(ChartConfig::from_json(r#"{"trace": "maybe"}"#).is_err());
    }
}
