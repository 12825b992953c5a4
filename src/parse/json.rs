use ordered_float::OrderedFloat;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::StoreConfig;
use crate::core::{DenseSamples, Extent, Record, RecordSamples, SeriesAccessors, SeriesData};
use crate::error::{ChartError, ChartResult};

use super::{
    ParsedSeries, declared_bounds, lookup_path, resolve_limits, series_id, value_as_f64,
    value_as_label,
};

/// Parses a dense payload: one y array plus optional limits on the parent
/// object. `seed` feeds the generated id when the payload carries none.
///
/// When the declared x bounds run high to low the values are reversed, so
/// the first value stays at the first declared x.
pub fn parse_dense(
    payload: &Value,
    config: &StoreConfig,
    seed: &str,
) -> ChartResult<ParsedSeries> {
    let array = lookup_path(payload, &config.y_accessor)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ChartError::Parse(format!(
                "dense payload has no y array at `{}`",
                config.y_accessor
            ))
        })?;

    let mut values = array
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value_as_f64(value)
                .filter(|y| y.is_finite())
                .ok_or_else(|| {
                    ChartError::Parse(format!(
                        "dense value at index {index} is not a finite number"
                    ))
                })
        })
        .collect::<ChartResult<Vec<f64>>>()?;

    let x_limits = match declared_bounds(&config.x_limits, payload)? {
        Some((first, last)) => {
            if first > last {
                values.reverse();
            }
            Extent::new(first, last)?
        }
        None => Extent::new(0.0, values.len() as f64)?,
    };
    let y_limits = resolve_limits(
        &config.y_limits,
        payload,
        Extent::from_values(values.iter().copied()),
    )?;

    let y_name = last_segment(&config.y_accessor);
    let accessors = SeriesAccessors::new("x", if y_name.is_empty() { "y" } else { y_name });

    debug!(
        len = values.len(),
        x_min = x_limits.min,
        x_max = x_limits.max,
        "parsed dense payload"
    );

    Ok(ParsedSeries {
        id: payload_id(payload, config).unwrap_or_else(|| series_id(seed)),
        title: payload_title(payload, config),
        accessors,
        x_limits,
        y_limits,
        data: SeriesData::Dense(DenseSamples::new(values, x_limits)),
    })
}

/// Parses a record payload into one or more series.
///
/// With a dotted x accessor (`peaks.mz`) the prefix locates the record array
/// inside each series object and a top-level array holds one series object per
/// element. Without a prefix the payload itself is the record array.
/// Each element succeeds or fails on its own.
pub fn parse_records(
    payload: &Value,
    config: &StoreConfig,
    seed: &str,
) -> Vec<ChartResult<ParsedSeries>> {
    let (container, _) = split_accessor(&config.x_accessor);
    if container.is_empty() {
        return vec![parse_record_series(payload, payload, config, seed)];
    }

    match payload {
        Value::Array(items) if items.len() == 1 => {
            vec![parse_nested_series(&items[0], container, config, seed)]
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                parse_nested_series(item, container, config, &format!("{seed}:{index}"))
            })
            .collect(),
        _ => vec![parse_nested_series(payload, container, config, seed)],
    }
}

fn parse_nested_series(
    parent: &Value,
    container: &str,
    config: &StoreConfig,
    seed: &str,
) -> ChartResult<ParsedSeries> {
    let records = lookup_path(parent, container).ok_or_else(|| {
        ChartError::Parse(format!("record payload has no array at `{container}`"))
    })?;
    parse_record_series(parent, records, config, seed)
}

fn parse_record_series(
    parent: &Value,
    records: &Value,
    config: &StoreConfig,
    seed: &str,
) -> ChartResult<ParsedSeries> {
    let items = records
        .as_array()
        .ok_or_else(|| ChartError::Parse("record payload is not an array".to_owned()))?;
    let (_, x_field) = split_accessor(&config.x_accessor);
    let (_, y_field) = split_accessor(&config.y_accessor);

    let mut parsed = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(fields) = item else {
            continue;
        };
        let x = fields.get(x_field).and_then(value_as_f64);
        let y = fields.get(y_field).and_then(value_as_f64);
        if let (Some(x), Some(y)) = (x, y) {
            if x.is_finite() && y.is_finite() {
                let mut record = Record::new(x, y);
                record.fields = fields.clone();
                parsed.push(record);
            }
        }
    }

    let records = canonicalize_records(parsed, items.len());
    let x_limits = resolve_limits(
        &config.x_limits,
        parent,
        Extent::from_values(records.iter().map(|record| record.x)),
    )?;
    let y_limits = resolve_limits(
        &config.y_limits,
        parent,
        Extent::from_values(records.iter().map(|record| record.y)),
    )?;

    Ok(ParsedSeries {
        id: payload_id(parent, config).unwrap_or_else(|| series_id(seed)),
        title: payload_title(parent, config),
        accessors: SeriesAccessors::new(x_field, y_field),
        x_limits,
        y_limits,
        data: SeriesData::Records(RecordSamples::from_sorted(records)),
    })
}

fn canonicalize_records(mut records: Vec<Record>, original_count: usize) -> Vec<Record> {
    records.sort_by(|a, b| OrderedFloat(a.x).cmp(&OrderedFloat(b.x)));

    let filtered_count = original_count.saturating_sub(records.len());
    if filtered_count > 0 {
        warn!(
            filtered_count,
            canonical_count = records.len(),
            "dropped records without finite x/y"
        );
    }
    records
}

fn payload_id(payload: &Value, config: &StoreConfig) -> Option<String> {
    let field = config.id_field.as_deref()?;
    lookup_path(payload, field)
        .and_then(value_as_label)
        .filter(|id| !id.is_empty())
}

fn payload_title(payload: &Value, config: &StoreConfig) -> Option<String> {
    let field = config.title_field.as_deref()?;
    lookup_path(payload, field).and_then(value_as_label)
}

/// Splits `a.b.x` into (`a.b`, `x`).
pub(crate) fn split_accessor(path: &str) -> (&str, &str) {
    match path.rfind('.') {
        Some(index) => (&path[..index], &path[index + 1..]),
        None => ("", path),
    }
}

fn last_segment(path: &str) -> &str {
    split_accessor(path).1
}

#[cfg(test)]
mod tests {
    use super::{parse_dense, parse_records, split_accessor};
    use crate::api::{SeriesLayout, StoreConfig};
    use crate::core::{SampleSource, SeriesData};
    use crate::parse::LimitSpec;
    use serde_json::json;

    #[test]
    fn split_accessor_separates_container() {
        assert_eq!(split_accessor("spectrum.peaks.mz"), ("spectrum.peaks", "mz"));
        assert_eq!(split_accessor("mz"), ("", "mz"));
    }

    #[test]
    fn dense_payload_uses_field_limits() {
        let config = StoreConfig::new(SeriesLayout::Dense)
            .with_y_accessor("intensities")
            .with_x_limits(LimitSpec::Fields {
                min: "xmin".to_owned(),
                max: "xmax".to_owned(),
            });
        let payload = json!({ "xmin": 10, "xmax": 20, "intensities": [1, "2", 3] });

        let parsed = parse_dense(&payload, &config, "seed").expect("dense parse");
        assert_eq!(parsed.x_limits.as_pair(), (10.0, 20.0));
        assert_eq!(parsed.y_limits.as_pair(), (1.0, 3.0));
        assert_eq!(parsed.accessors.y, "intensities");
        assert_eq!(parsed.data.len(), 3);
    }

    #[test]
    fn descending_field_limits_reverse_dense_values() {
        let config = StoreConfig::new(SeriesLayout::Dense)
            .with_y_accessor("y")
            .with_x_limits(LimitSpec::Fields {
                min: "FIRSTX".to_owned(),
                max: "LASTX".to_owned(),
            });
        let payload = json!({ "FIRSTX": 4000, "LASTX": 400, "y": [99, 1, 1, 1] });

        let parsed = parse_dense(&payload, &config, "seed").expect("dense parse");
        assert_eq!(parsed.x_limits.as_pair(), (400.0, 4000.0));
        let SeriesData::Dense(samples) = &parsed.data else {
            panic!("expected dense data");
        };
        assert_eq!(samples.values(), &[1.0, 1.0, 1.0, 99.0]);
        assert!(samples.x_at(3) > samples.x_at(0));
    }

    #[test]
    fn dense_payload_rejects_non_numeric_values() {
        let config = StoreConfig::new(SeriesLayout::Dense);
        let err = parse_dense(&json!([1, null, 3]), &config, "seed").expect_err("null must fail");
        assert!(format!("{err}").contains("index 1"));
    }

    #[test]
    fn record_payload_is_sorted_and_filtered() {
        let config = StoreConfig::new(SeriesLayout::Records)
            .with_x_accessor("peaks.mz")
            .with_y_accessor("peaks.intensity")
            .with_title_field("name");
        let payload = json!({
            "name": "caffeine",
            "peaks": [
                { "mz": 195.1, "intensity": 100 },
                { "mz": 138.0, "intensity": 40 },
                { "mz": "n/a", "intensity": 5 },
            ]
        });

        let mut parsed = parse_records(&payload, &config, "seed");
        assert_eq!(parsed.len(), 1);
        let parsed = parsed.remove(0).expect("record parse");
        assert_eq!(parsed.title.as_deref(), Some("caffeine"));
        let SeriesData::Records(samples) = &parsed.data else {
            panic!("expected record data");
        };
        assert_eq!(samples.len(), 2);
        assert_eq!(samples.x_at(0), 138.0);
        assert_eq!(parsed.x_limits.as_pair(), (138.0, 195.1));
    }

    #[test]
    fn array_of_series_objects_yields_one_series_each() {
        let config = StoreConfig::new(SeriesLayout::Records)
            .with_x_accessor("data.x")
            .with_y_accessor("data.y");
        let payload = json!([
            { "data": [{ "x": 1, "y": 2 }] },
            { "data": [{ "x": 3, "y": 4 }] },
            { "nodata": true },
        ]);

        let parsed = parse_records(&payload, &config, "seed");
        assert_eq!(parsed.len(), 3);
        assert!(parsed[0].is_ok());
        assert!(parsed[1].is_ok());
        assert!(parsed[2].is_err());
        let first = parsed[0].as_ref().expect("first");
        let second = parsed[1].as_ref().expect("second");
        assert_ne!(first.id, second.id);
    }
}
