use serde_json::Value;
use tracing::debug;

use crate::core::Record;
use crate::error::{ChartError, ChartResult};

use super::value_as_f64;

/// Counts from one annotation join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnnotationJoin {
    pub matched: usize,
    pub unmatched: usize,
}

/// Attaches annotation rows `[x_ref, col...]` to the records whose `x` equals
/// `x_ref`.
///
/// `records` must be sorted by `x`; lookup is a binary search with a relative
/// tolerance of `1e-9`. When several records share an x the first one gets the
/// row. Rows that are not arrays or have no numeric head count as unmatched.
pub fn join_annotations(
    records: &mut [Record],
    annotations: &Value,
) -> ChartResult<AnnotationJoin> {
    let rows = annotations
        .as_array()
        .ok_or_else(|| ChartError::Parse("annotation payload is not an array".to_owned()))?;

    let mut join = AnnotationJoin::default();
    for row in rows {
        let Some((head, columns)) = row.as_array().and_then(|cells| cells.split_first()) else {
            join.unmatched += 1;
            continue;
        };
        let Some(x_ref) = value_as_f64(head).filter(|x| x.is_finite()) else {
            join.unmatched += 1;
            continue;
        };

        match find_record(records, x_ref) {
            Some(index) => {
                records[index].annotations.push(columns.to_vec());
                join.matched += 1;
            }
            None => join.unmatched += 1,
        }
    }

    debug!(
        matched = join.matched,
        unmatched = join.unmatched,
        "joined annotations"
    );
    Ok(join)
}

fn find_record(records: &[Record], x_ref: f64) -> Option<usize> {
    let tolerance = 1e-9 * x_ref.abs().max(1.0);
    let index = records.partition_point(|record| record.x < x_ref - tolerance);
    records
        .get(index)
        .filter(|record| (record.x - x_ref).abs() <= tolerance)
        .map(|_| index)
}
