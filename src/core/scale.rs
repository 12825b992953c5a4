use serde::Serialize;

use crate::core::orientation::orient;
use crate::error::{ChartError, ChartResult};

/// Linear x-scale mapping a numeric domain onto `[0, pixel_width]`.
///
/// The domain is stored as given, so `domain_start > domain_end` describes an
/// inverted axis (IR and NMR spectra are conventionally drawn right-to-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() {
            return Err(ChartError::Configuration(
                "scale domain must be finite".to_owned(),
            ));
        }
        if domain_start == domain_end {
            return Err(ChartError::Configuration(
                "scale domain must have non-zero width".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn is_descending(self) -> bool {
        self.domain_start > self.domain_end
    }

    pub fn domain_to_pixel(self, value: f64, pixel_width: u32) -> ChartResult<f64> {
        validate_pixel_width(pixel_width)?;
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(normalized * f64::from(pixel_width))
    }

    pub fn pixel_to_domain(self, pixel: f64, pixel_width: u32) -> ChartResult<f64> {
        validate_pixel_width(pixel_width)?;
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = pixel / f64::from(pixel_width);
        Ok(self.domain_start + normalized * span)
    }

    /// Visible `[x0, x1]` with `x0 < x1`, regardless of axis direction.
    pub fn visible_extent(self, pixel_width: u32) -> ChartResult<(f64, f64)> {
        let left = self.pixel_to_domain(0.0, pixel_width)?;
        let right = self.pixel_to_domain(f64::from(pixel_width), pixel_width)?;
        Ok(orient(self.is_descending(), (left, right)))
    }
}

/// What the windowing engine needs to know about the current view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportDescriptor {
    pub pixel_width: u32,
    pub scale: LinearScale,
}

impl ViewportDescriptor {
    pub fn new(pixel_width: u32, domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        validate_pixel_width(pixel_width)?;
        Ok(Self {
            pixel_width,
            scale: LinearScale::new(domain_start, domain_end)?,
        })
    }

    pub fn visible_extent(self) -> ChartResult<(f64, f64)> {
        self.scale.visible_extent(self.pixel_width)
    }
}

fn validate_pixel_width(pixel_width: u32) -> ChartResult<()> {
    if pixel_width == 0 {
        return Err(ChartError::InvalidViewport { width: pixel_width });
    }
    Ok(())
}
