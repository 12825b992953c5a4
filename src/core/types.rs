use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// One drawable sample taken from a series.
///
/// `index` points back into the owning series so record payloads can be
/// looked up without cloning them into every output array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

impl SeriesPoint {
    #[must_use]
    pub fn new(index: usize, x: f64, y: f64) -> Self {
        Self { index, x, y }
    }
}

/// Closed numeric range `[min, max]`.
///
/// `Extent::EMPTY` is the `(+inf, -inf)` sentinel: merging anything into it
/// yields that thing, and it reports `is_empty() == true`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Default for Extent {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Extent {
    pub const EMPTY: Self = Self {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Builds an extent from two finite bounds in either order.
    pub fn new(a: f64, b: f64) -> ChartResult<Self> {
        if !a.is_finite() || !b.is_finite() {
            return Err(ChartError::InvalidData(
                "extent bounds must be finite".to_owned(),
            ));
        }
        Ok(Self {
            min: a.min(b),
            max: a.max(b),
        })
    }

    /// Min/max over finite values; `EMPTY` when none are finite.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(Self::EMPTY, |acc, value| Self {
                min: acc.min.min(value),
                max: acc.max.max(value),
            })
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.min > self.max
    }

    #[must_use]
    pub fn span(self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max - self.min
        }
    }

    /// Componentwise union. Never shrinks either operand.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    #[must_use]
    pub fn as_pair(self) -> (f64, f64) {
        (self.min, self.max)
    }
}

/// Cached per-series narrowing state.
///
/// `low..high` is the index range known to cover the last requested domain;
/// `bin_count` is the last number of output bins, `0` until the first binning
/// pass. Invariant: `low <= high <= len` of the owning series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesWindow {
    pub low: usize,
    pub high: usize,
    pub bin_count: usize,
}

impl SeriesWindow {
    /// Full window over a series of `len` samples with no cached bin count.
    #[must_use]
    pub fn full(len: usize) -> Self {
        Self {
            low: 0,
            high: len,
            bin_count: 0,
        }
    }

    #[must_use]
    pub fn span(self) -> usize {
        self.high.saturating_sub(self.low)
    }

    /// Clamps a window that may have been built for a different length.
    #[must_use]
    pub fn clamped(self, len: usize) -> Self {
        let high = self.high.min(len);
        Self {
            low: self.low.min(high),
            high,
            bin_count: self.bin_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Extent, SeriesWindow};

    #[test]
    fn empty_extent_is_neutral_for_merge() {
        let extent = Extent::new(3.0, -1.0).expect("finite extent");
        assert_eq!(Extent::EMPTY.merge(extent), extent);
        assert_eq!(extent.min, -1.0);
        assert!(Extent::EMPTY.is_empty());
    }

    #[test]
    fn from_values_skips_non_finite() {
        let extent = Extent::from_values([f64::NAN, 2.0, -4.0, f64::INFINITY]);
        assert_eq!(extent.as_pair(), (-4.0, 2.0));
    }

    #[test]
    fn clamped_window_respects_shorter_series() {
        let window = SeriesWindow {
            low: 8,
            high: 12,
            bin_count: 5,
        };
        assert_eq!(
            window.clamped(6),
            SeriesWindow {
                low: 6,
                high: 6,
                bin_count: 5
            }
        );
    }

    #[test]
    fn inverted_window_has_zero_span() {
        let window = SeriesWindow {
            low: 5,
            high: 2,
            bin_count: 1,
        };
        assert_eq!(window.span(), 0);
    }
}
