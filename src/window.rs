//! Trailing rolling means over gappy yearly series.
//!
//! A window only yields a mean when it holds `width` entries whose years
//! form an unbroken run, so a mean is never computed across a data gap.

use std::collections::VecDeque;

/// Widest window accepted, in years.
pub const MAX_WINDOW: usize = 200;

/// Fixed-width trailing window over `C` parallel components.
///
/// Entries are keyed by their position in the qualifying sequence; the
/// year of each entry is kept alongside to check contiguity. Means are
/// summed fresh from the stored entries on every call.
#[derive(Debug, Clone)]
pub struct RollingWindow<const C: usize> {
    width: usize,
    entries: VecDeque<(i32, [f64; C])>,
}

impl<const C: usize> RollingWindow<C> {
    /// Creates an empty window. The width is clamped to `1..=MAX_WINDOW`.
    pub fn new(width: usize) -> Self {
        Self {
            width: width.clamp(1, MAX_WINDOW),
            entries: VecDeque::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pushes the next entry, evicting the oldest one once full, and
    /// returns the trailing mean if the window is now a contiguous run.
    pub fn push(&mut self, year: i32, values: [f64; C]) -> Option<[f64; C]> {
        if self.entries.len() == self.width {
            self.entries.pop_front();
        }
        self.entries.push_back((year, values));

        self.mean()
    }

    /// Full and the oldest entry is exactly `width - 1` years before the newest.
    pub fn is_contiguous(&self) -> bool {
        if self.entries.len() < self.width {
            return false;
        }

        match (self.entries.front(), self.entries.back()) {
            (Some((first, _)), Some((last, _))) => {
                i64::from(*last) - i64::from(*first) == self.width as i64 - 1
            }
            _ => false,
        }
    }

    /// Per-component mean of the current window, if contiguous.
    pub fn mean(&self) -> Option<[f64; C]> {
        if !self.is_contiguous() {
            return None;
        }
        let n = self.width as f64;
        Some(std::array::from_fn(|i| {
            let sum: f64 = self.entries.iter().map(|(_, v)| v[i]).sum();
            if sum.is_finite() {
                sum / n
            } else {
                // overflowed; scale first
                self.entries.iter().map(|(_, v)| v[i] / n).sum()
            }
        }))
    }

    /// Drops all entries.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

/// One item yielded by [`RollingMeans`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Windowed<const C: usize> {
    pub year: i32,
    pub values: [f64; C],
    pub mean: Option<[f64; C]>,
}

/// Lazy single-pass adapter attaching trailing means to a yearly series.
pub struct RollingMeans<I, const C: usize> {
    inner: I,
    window: RollingWindow<C>,
}

impl<I, const C: usize> Iterator for RollingMeans<I, C>
where
    I: Iterator<Item = (i32, [f64; C])>,
{
    type Item = Windowed<C>;

    fn next(&mut self) -> Option<Self::Item> {
        let (year, values) = self.inner.next()?;
        let mean = self.window.push(year, values);
        Some(Windowed { year, values, mean })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Wraps `series` so each item carries its `width`-year trailing mean.
pub fn rolling_means<I, const C: usize>(series: I, width: usize) -> RollingMeans<I::IntoIter, C>
where
    I: IntoIterator<Item = (i32, [f64; C])>,
{
    RollingMeans {
        inner: series.into_iter(),
        window: RollingWindow::new(width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mean_requires_full_window() {
        let mut w = RollingWindow::<1>::new(3);
        assert_eq!(w.push(2000, [1.0]), None);
        assert_eq!(w.push(2001, [2.0]), None);
        let mean = w.push(2002, [6.0]).unwrap();
        assert!(close(mean[0], 3.0));
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn test_window_slides() {
        let mut w = RollingWindow::<1>::new(2);
        w.push(2000, [1.0]);
        w.push(2001, [3.0]);
        let mean = w.push(2002, [5.0]).unwrap();
        assert!(close(mean[0], 4.0));
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn test_gap_blocks_mean() {
        let mut w = RollingWindow::<1>::new(3);
        w.push(2000, [1.0]);
        w.push(2001, [1.0]);
        assert_eq!(w.push(2003, [1.0]), None);
        assert_eq!(w.push(2004, [1.0]), None);
        assert!(w.push(2005, [1.0]).is_some());
    }

    #[test]
    fn test_components_are_independent() {
        let mut w = RollingWindow::<3>::new(2);
        w.push(2030, [1.0, 2.0, 3.0]);
        let mean = w.push(2031, [3.0, 4.0, 9.0]).unwrap();
        assert!(close(mean[0], 2.0));
        assert!(close(mean[1], 3.0));
        assert!(close(mean[2], 6.0));
    }

    #[test]
    fn test_reset_clears_state() {
        let mut w = RollingWindow::<1>::new(2);
        w.push(2019, [100.0]);
        w.push(2020, [100.0]);
        w.reset();
        assert!(w.is_empty());
        assert_eq!(w.push(2021, [1.0]), None);
        let mean = w.push(2022, [3.0]).unwrap();
        assert!(close(mean[0], 2.0));
    }

    #[test]
    fn test_width_is_clamped() {
        let mut w = RollingWindow::<1>::new(0);
        assert_eq!(w.width(), 1);
        assert_eq!(w.push(1990, [4.5]), Some([4.5]));

        let wide = RollingWindow::<1>::new(usize::MAX);
        assert_eq!(wide.width(), MAX_WINDOW);
    }

    #[test]
    fn test_large_value_leaves_no_residue() {
        let mut w = RollingWindow::<1>::new(5);
        w.push(2000, [1e15]);
        let mut last = None;
        for year in 2001..=2010 {
            last = w.push(year, [0.01]);
        }
        assert!(close(last.unwrap()[0], 0.01));
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let mut w = RollingWindow::<1>::new(2);
        w.push(2000, [f64::MAX]);
        let mean = w.push(2001, [f64::MAX]).unwrap();
        assert!(mean[0].is_finite());
    }

    #[test]
    fn test_rolling_means_iterator() {
        let series = vec![(2000, [2.0]), (2001, [4.0]), (2002, [6.0]), (2004, [8.0])];
        let out: Vec<_> = rolling_means(series, 2).collect();

        assert_eq!(out.len(), 4);
        assert_eq!(out[0].mean, None);
        assert!(close(out[1].mean.unwrap()[0], 3.0));
        assert!(close(out[2].mean.unwrap()[0], 5.0));
        assert_eq!(out[3].mean, None);
        assert_eq!(out[3].values, [8.0]);
    }
}
