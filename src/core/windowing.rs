use serde::Serialize;

use crate::core::series::SampleSource;
use crate::core::types::{SeriesPoint, SeriesWindow};

/// Why a series produced no drawable points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmptyReason {
    /// The series holds no samples at all.
    NoSamples,
    /// The series has samples but none fall inside the visible domain.
    OutsideDomain,
}

/// Drawable output for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SeriesOutcome {
    Points(Vec<SeriesPoint>),
    Empty(EmptyReason),
}

impl SeriesOutcome {
    pub(crate) fn from_points(points: Vec<SeriesPoint>) -> Self {
        if points.is_empty() {
            Self::Empty(EmptyReason::OutsideDomain)
        } else {
            Self::Points(points)
        }
    }

    #[must_use]
    pub fn points(&self) -> &[SeriesPoint] {
        match self {
            Self::Points(points) => points,
            Self::Empty(_) => &[],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}

/// Result of a windowing pass: what to draw plus the window to carry into the
/// next call for the same series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowPass {
    pub outcome: SeriesOutcome,
    pub window: SeriesWindow,
}

/// Grows `window` outward until it covers every sample inside `[x0, x1]`.
///
/// Starts from the previous bounds, so a small pan or zoom only walks the
/// samples that entered the view instead of rescanning the series.
#[must_use]
pub fn expand_window<S: SampleSource + ?Sized>(
    source: &S,
    window: SeriesWindow,
    extent: (f64, f64),
) -> SeriesWindow {
    let len = source.len();
    let (x0, x1) = extent;
    let window = window.clamped(len);

    let mut low = window.low;
    while low > 0 && source.x_at(low - 1) >= x0 {
        low -= 1;
    }

    let mut high = window.high;
    while high < len && source.x_at(high) <= x1 {
        high += 1;
    }

    SeriesWindow {
        low,
        high,
        bin_count: window.bin_count,
    }
}

/// Expands the window, then visits every in-domain sample in index order.
///
/// Samples left of `x0` pull `low` past them and the first sample right of
/// `x1` becomes `high`, so the returned window is tight for the next call.
pub(crate) fn scan_window<S, F>(
    source: &S,
    window: SeriesWindow,
    extent: (f64, f64),
    mut visit: F,
) -> SeriesWindow
where
    S: SampleSource + ?Sized,
    F: FnMut(SeriesPoint),
{
    let (x0, x1) = extent;
    let expanded = expand_window(source, window, extent);
    let mut next = expanded;

    for index in expanded.low..expanded.high {
        let x = source.x_at(index);
        if x < x0 {
            next.low = index + 1;
            continue;
        }
        if x > x1 {
            next.high = index;
            break;
        }
        visit(source.point_at(index));
    }

    next
}

/// Returns every sample with `x0 <= x <= x1`, unbinned.
///
/// The cached bin count is carried through untouched.
#[must_use]
pub fn window_points<S: SampleSource + ?Sized>(
    source: &S,
    window: SeriesWindow,
    extent: (f64, f64),
) -> WindowPass {
    if source.is_empty() {
        return WindowPass {
            outcome: SeriesOutcome::Empty(EmptyReason::NoSamples),
            window: SeriesWindow::full(0),
        };
    }

    let mut points = Vec::new();
    let window = scan_window(source, window, extent, |point| points.push(point));

    WindowPass {
        outcome: SeriesOutcome::from_points(points),
        window,
    }
}
