use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::series::SampleSource;
use crate::core::types::{SeriesPoint, SeriesWindow};
use crate::core::windowing::{EmptyReason, SeriesOutcome, WindowPass, scan_window};

/// Policy choosing which sample represents a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremumRule {
    /// Largest `y` wins.
    #[default]
    Max,
    /// Smallest `y` wins (minima datasets such as transmittance dips).
    Min,
    /// Largest `|y|` wins.
    MaxMagnitude,
}

impl ExtremumRule {
    /// Whether `candidate` replaces `current` as the bin representative.
    ///
    /// Ties go to the candidate, so the later sample of equal rank wins.
    #[must_use]
    pub fn prefers(self, current: f64, candidate: f64) -> bool {
        match self {
            Self::Max => !(current > candidate),
            Self::Min => !(current < candidate),
            Self::MaxMagnitude => !(current.abs() > candidate.abs()),
        }
    }
}

/// Domain width covered by one of `bin_count` bins spread over `extent`.
///
/// With fewer than two bins every sample lands in bin `0`.
#[must_use]
pub fn bin_step(extent: (f64, f64), bin_count: usize) -> f64 {
    if bin_count > 1 {
        (extent.1 - extent.0).abs() / (bin_count - 1) as f64
    } else {
        f64::INFINITY
    }
}

/// Output of an `ExtremumBinner` run.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedPoints {
    pub points: Vec<SeriesPoint>,
    /// At least one bin between `0` and the last emitted bin stayed empty.
    pub skipped_bins: bool,
}

/// Single-pass reducer collapsing x-ordered samples into one representative
/// per occupied bin.
///
/// Output is compacted: empty bins take no slot, which is why callers track
/// `skipped_bins` to keep the next step consistent with what was emitted.
#[derive(Debug, Clone)]
pub struct ExtremumBinner {
    x0: f64,
    step: f64,
    rule: ExtremumRule,
    points: Vec<SeriesPoint>,
    last_bin: Option<usize>,
    skipped_bins: bool,
}

impl ExtremumBinner {
    #[must_use]
    pub fn new(x0: f64, step: f64, rule: ExtremumRule) -> Self {
        Self {
            x0,
            step,
            rule,
            points: Vec::new(),
            last_bin: None,
            skipped_bins: false,
        }
    }

    /// Bin slot for `x`. Degenerate steps map everything to `0`.
    #[must_use]
    pub fn bin_index(&self, x: f64) -> usize {
        if !self.step.is_finite() || self.step <= 0.0 {
            return 0;
        }
        // float-to-int casts saturate, so x < x0 clamps to bin 0
        ((x - self.x0) / self.step).floor() as usize
    }

    /// Feeds the next sample. Samples must arrive in non-decreasing `x`.
    pub fn push(&mut self, point: SeriesPoint) {
        let bin = self.bin_index(point.x);
        if self.last_bin == Some(bin) {
            if let Some(current) = self.points.last_mut() {
                if self.rule.prefers(current.y, point.y) {
                    *current = point;
                }
            }
            return;
        }

        if bin > self.points.len() {
            self.skipped_bins = true;
        }
        self.points.push(point);
        self.last_bin = Some(bin);
    }

    #[must_use]
    pub fn finish(self) -> BinnedPoints {
        BinnedPoints {
            points: self.points,
            skipped_bins: self.skipped_bins,
        }
    }
}

/// Bins one series for the visible `extent`, threading its window through.
///
/// `window.bin_count == 0` means "never binned": the count is derived from
/// the pixel width and then reused by later calls until the window is reset.
/// When bins were skipped the emitted length becomes the new bin count.
#[must_use]
pub fn bin_series<S: SampleSource + ?Sized>(
    source: &S,
    window: SeriesWindow,
    extent: (f64, f64),
    pixel_width: u32,
    bin_width_px: f64,
    rule: ExtremumRule,
) -> WindowPass {
    if source.is_empty() {
        return WindowPass {
            outcome: SeriesOutcome::Empty(EmptyReason::NoSamples),
            window: SeriesWindow {
                bin_count: window.bin_count,
                ..SeriesWindow::full(0)
            },
        };
    }

    let mut window = window;
    if window.bin_count == 0 {
        window.bin_count = (f64::from(pixel_width) / bin_width_px).ceil().max(1.0) as usize;
    }

    let step = bin_step(extent, window.bin_count);
    let mut binner = ExtremumBinner::new(extent.0, step, rule);
    let mut next = scan_window(source, window, extent, |point| binner.push(point));
    let binned = binner.finish();

    if binned.skipped_bins {
        next.bin_count = binned.points.len();
    }

    trace!(
        low = next.low,
        high = next.high,
        bin_count = next.bin_count,
        emitted = binned.points.len(),
        skipped_bins = binned.skipped_bins,
        "binned series window"
    );

    WindowPass {
        outcome: SeriesOutcome::from_points(binned.points),
        window: next,
    }
}
