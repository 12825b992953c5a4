//! Payload parsers turning fetched sources into `ParsedSeries`.
//!
//! JSON payloads come in two layouts (dense y arrays and explicit records);
//! JCAMP-DX text is parsed block by block into dense series.

pub mod annotations;
pub mod hash;
pub mod jcamp;
pub mod json;
pub mod limits;

use serde_json::Value;

use crate::core::{Extent, Series, SeriesAccessors, SeriesData};

pub use annotations::{AnnotationJoin, join_annotations};
pub use hash::{fresh_seed, hash_code, series_id};
pub use jcamp::{JcampBlock, parse_jcamp};
pub use json::{parse_dense, parse_records};
pub use limits::{LimitSpec, declared_bounds, resolve_limits};

/// Parser output, ready to be inserted into a store.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSeries {
    pub id: String,
    pub title: Option<String>,
    pub accessors: SeriesAccessors,
    pub x_limits: Extent,
    pub y_limits: Extent,
    pub data: SeriesData,
}

impl ParsedSeries {
    #[must_use]
    pub fn into_series(self) -> Series {
        Series::new(
            self.id,
            self.title,
            self.accessors,
            self.x_limits,
            self.y_limits,
            self.data,
        )
    }
}

/// Walks a dotted path (`a.b.c`) through nested objects. An empty path is the
/// payload itself.
#[must_use]
pub fn lookup_path<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(payload);
    }
    path.split('.')
        .try_fold(payload, |value, segment| value.get(segment))
}

/// Reads a JSON number or numeric string as `f64`.
#[must_use]
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Reads a string-ish payload field (strings verbatim, numbers formatted).
pub(crate) fn value_as_label(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
