//! Plot primitives handed to the renderer.
//!
//! Coordinates are data-space values; scaling to pixels is left to the renderer.

use serde::Serialize;

/// A dot for one observed year, with its trailing mean when one exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObservedPoint {
    pub year: i32,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
}

/// A vertex of a polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinePoint {
    pub year: i32,
    pub value: f64,
}

/// A column of a two-part area band: lower area spans `low..median`,
/// upper area spans `median..high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandPoint {
    pub year: i32,
    pub low: f64,
    pub median: f64,
    pub high: f64,
}

impl BandPoint {
    pub fn from_envelope(year: i32, envelope: [f64; 3]) -> Self {
        let [low, median, high] = envelope;
        Self {
            year,
            low,
            median,
            high,
        }
    }

    pub fn median_point(&self) -> LinePoint {
        LinePoint {
            year: self.year,
            value: self.median,
        }
    }
}
