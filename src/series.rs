//! Input series types shared by both aggregators.

use serde::{Deserialize, Serialize};

/// A single yearly reading as delivered by the data service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Value(f64),
    /// Trace amount, flagged `T` upstream (e.g. precipitation below measurable).
    Trace,
    /// Missing data, flagged `M` upstream.
    Missing,
}

impl Reading {
    /// Builds a reading from a number, treating NaN and infinities as missing.
    pub fn from_f64(v: f64) -> Self {
        if v.is_finite() {
            Reading::Value(v)
        } else {
            Reading::Missing
        }
    }

    /// Decodes the upstream string form: `"M"`, `"T"` or a decimal number.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "M" => Reading::Missing,
            "T" => Reading::Trace,
            s => s
                .parse::<f64>()
                .map(Reading::from_f64)
                .unwrap_or(Reading::Missing),
        }
    }

    /// Resolves the reading to the value of record, rounded to 2 decimals.
    ///
    /// Returns `None` when the reading does not qualify for aggregation.
    pub fn resolve(self, trace: TracePolicy) -> Option<f64> {
        match self {
            Reading::Value(v) if v.is_finite() => Some(round2(v)),
            Reading::Value(_) | Reading::Missing => None,
            Reading::Trace => match trace {
                TracePolicy::Zero => Some(0.0),
                TracePolicy::Exclude => None,
            },
        }
    }
}

/// How trace-flagged observations enter the aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracePolicy {
    /// Trace counts as a measured 0.00.
    #[default]
    Zero,
    /// Trace is dropped like a missing value.
    Exclude,
}

/// One `(year, reading)` pair of a station observation series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub year: i32,
    pub reading: Reading,
}

impl RawPoint {
    pub fn new(year: i32, reading: Reading) -> Self {
        Self { year, reading }
    }
}

/// One `(year, [low, median, high])` tuple of a multi-model projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvelopePoint {
    pub year: i32,
    pub values: [f64; 3],
}

impl EnvelopePoint {
    pub fn new(year: i32, low: f64, median: f64, high: f64) -> Self {
        Self {
            year,
            values: [low, median, high],
        }
    }

    /// Envelope with every component rounded to 2 decimals independently.
    pub fn rounded(&self) -> [f64; 3] {
        self.values.map(round2)
    }
}

/// Rounds half away from zero to 2 decimal places.
///
/// Magnitudes too large to scale are returned as-is; they carry no
/// hundredths anyway.
pub fn round2(v: f64) -> f64 {
    let scaled = v * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        v
    }
}
