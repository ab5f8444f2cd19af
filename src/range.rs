//! Axis domain inference.

use serde::Serialize;

/// Inclusive `[min, max]` domain of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange<T> {
    pub min: T,
    pub max: T,
}

impl AxisRange<i32> {
    /// Year domain as the charts draw it: two spare years on the left.
    pub fn padded_years(&self) -> AxisRange<i32> {
        AxisRange {
            min: self.min - 2,
            max: self.max,
        }
    }
}

impl<T: PartialOrd + Copy> AxisRange<T> {
    /// Smallest range covering both `self` and `other`.
    pub fn union(&self, other: &AxisRange<T>) -> AxisRange<T> {
        AxisRange {
            min: if other.min < self.min { other.min } else { self.min },
            max: if other.max > self.max { other.max } else { self.max },
        }
    }
}

/// Tightens a range monotonically as values are observed.
///
/// Stays empty until the first value; `finish` then yields `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeTracker<T> {
    range: Option<AxisRange<T>>,
}

impl<T: PartialOrd + Copy> RangeTracker<T> {
    pub fn new() -> Self {
        Self { range: None }
    }

    pub fn include(&mut self, v: T) {
        self.range = Some(match self.range {
            None => AxisRange { min: v, max: v },
            Some(r) => AxisRange {
                min: if v < r.min { v } else { r.min },
                max: if v > r.max { v } else { r.max },
            },
        });
    }

    pub fn finish(self) -> Option<AxisRange<T>> {
        self.range
    }
}

/// Union of two optional ranges.
pub fn merge_ranges<T: PartialOrd + Copy>(
    a: Option<AxisRange<T>>,
    b: Option<AxisRange<T>>,
) -> Option<AxisRange<T>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(&b)),
        (a, None) => a,
        (None, b) => b,
    }
}
