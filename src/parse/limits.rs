use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::Extent;
use crate::error::{ChartError, ChartResult};

use super::{lookup_path, value_as_f64};

/// How a series' own numeric range is resolved at load time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitSpec {
    /// Actual min/max of the loaded values.
    #[default]
    Auto,
    /// Explicit numeric bounds.
    Values { min: f64, max: f64 },
    /// Two payload fields holding the bounds (numbers or numeric strings).
    Fields { min: String, max: String },
}

impl LimitSpec {
    pub(crate) fn validate(&self, axis: &str) -> ChartResult<()> {
        match self {
            Self::Auto => Ok(()),
            Self::Values { min, max } => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(ChartError::Configuration(format!(
                        "{axis} limits must be finite"
                    )));
                }
                Ok(())
            }
            Self::Fields { min, max } => {
                if min.is_empty() || max.is_empty() {
                    return Err(ChartError::Configuration(format!(
                        "{axis} limit field names must be non-empty"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Bounds exactly as declared, first then last, or `None` for `Auto`.
///
/// The order is kept so callers can tell a descending declaration apart.
pub fn declared_bounds(spec: &LimitSpec, payload: &Value) -> ChartResult<Option<(f64, f64)>> {
    match spec {
        LimitSpec::Auto => Ok(None),
        LimitSpec::Values { min, max } => Ok(Some((*min, *max))),
        LimitSpec::Fields { min, max } => {
            Ok(Some((read_bound(payload, min)?, read_bound(payload, max)?)))
        }
    }
}

/// Resolves `spec` against `payload`, using `auto` for `LimitSpec::Auto`.
///
/// Resolved bounds are normalized so `min <= max`.
pub fn resolve_limits(spec: &LimitSpec, payload: &Value, auto: Extent) -> ChartResult<Extent> {
    match declared_bounds(spec, payload)? {
        Some((first, last)) => Extent::new(first, last),
        None => Ok(auto),
    }
}

fn read_bound(payload: &Value, field: &str) -> ChartResult<f64> {
    lookup_path(payload, field)
        .and_then(value_as_f64)
        .ok_or_else(|| {
            ChartError::Parse(format!("limit field `{field}` is missing or not numeric"))
        })
}
