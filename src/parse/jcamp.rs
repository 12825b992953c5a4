use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::{DenseSamples, Extent, SeriesAccessors, SeriesData};
use crate::error::{ChartError, ChartResult};

use super::ParsedSeries;

const LABEL_PREFIX: &str = "##";
const COMMENT_MARKER: &str = "$$";
const END: &str = "END";
const XYDATA: &str = "XYDATA";
const Y_TABLE: &str = "(X++(Y..Y))";
const TITLE: &str = "TITLE";
const FIRSTX: &str = "FIRSTX";
const LASTX: &str = "LASTX";
const YFACTOR: &str = "YFACTOR";

/// One `##XYDATA` block of a JCAMP-DX document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JcampBlock {
    /// Labelled data records in file order, keys upper-cased without `##`.
    pub headers: IndexMap<String, String>,
    /// Scaled y values, ordered by ascending x.
    pub points: Vec<f64>,
}

impl JcampBlock {
    #[must_use]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    fn header_f64(&self, key: &str) -> Option<f64> {
        self.header(key)
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|value| value.is_finite())
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.header(TITLE).filter(|title| !title.is_empty())
    }

    /// Converts the block into a dense series spanning `FIRSTX..LASTX`.
    ///
    /// Without both bounds the implicit index range `0..len` is used.
    pub fn into_parsed(self, id: String) -> ChartResult<ParsedSeries> {
        let x_limits = match (self.header_f64(FIRSTX), self.header_f64(LASTX)) {
            (Some(first), Some(last)) => Extent::new(first, last)?,
            _ => Extent::new(0.0, self.points.len() as f64)?,
        };
        let y_limits = Extent::from_values(self.points.iter().copied());
        let title = self.title().map(str::to_owned);

        Ok(ParsedSeries {
            id,
            title,
            accessors: SeriesAccessors::new("x", "y"),
            x_limits,
            y_limits,
            data: SeriesData::Dense(DenseSamples::new(self.points, x_limits)),
        })
    }
}

/// Parses every `(X++(Y..Y))` block in a JCAMP-DX document.
///
/// Data lines are tokenized into signed digit runs; the leading x-check
/// token of each line is dropped and the rest are scaled by `YFACTOR`.
/// Blocks whose `FIRSTX` exceeds `LASTX` are reversed so x ascends.
pub fn parse_jcamp(text: &str) -> ChartResult<Vec<JcampBlock>> {
    let mut blocks = Vec::new();
    let mut current = JcampBlock::default();
    let mut in_data = false;

    for line in text.split(['\n', '\r']) {
        if let Some(labelled) = line.strip_prefix(LABEL_PREFIX) {
            let Some((key, value)) = labelled.split_once('=') else {
                continue;
            };
            let key = key.trim().to_ascii_uppercase();
            let value = value
                .split(COMMENT_MARKER)
                .next()
                .unwrap_or_default()
                .trim()
                .to_owned();

            if key == XYDATA && value == Y_TABLE {
                in_data = true;
            } else if key == END {
                if in_data {
                    blocks.push(finish_block(std::mem::take(&mut current)));
                } else {
                    current = JcampBlock::default();
                }
                in_data = false;
            } else {
                current.headers.insert(key, value);
            }
        } else if in_data {
            let y_factor = current.header_f64(YFACTOR).unwrap_or(1.0);
            let tokens = tokenize_numbers(line);
            current
                .points
                .extend(tokens.iter().skip(1).map(|value| value * y_factor));
        }
    }

    if in_data {
        warn!(points = current.points.len(), "jcamp data block missing ##END");
        return Err(ChartError::Parse(
            "jcamp data block is not terminated by ##END".to_owned(),
        ));
    }

    debug!(blocks = blocks.len(), "parsed jcamp document");
    Ok(blocks)
}

fn finish_block(mut block: JcampBlock) -> JcampBlock {
    if let (Some(first), Some(last)) = (block.header_f64(FIRSTX), block.header_f64(LASTX)) {
        if first > last {
            block.points.reverse();
        }
    }
    block
}

/// Splits a data line into numbers matching `[+-]*\d+\.?\d*`.
///
/// A sign run takes the sign of its last character.
fn tokenize_numbers(line: &str) -> SmallVec<[f64; 16]> {
    let bytes = line.as_bytes();
    let mut tokens = SmallVec::new();
    let mut index = 0;

    while index < bytes.len() {
        let sign_start = index;
        while index < bytes.len() && matches!(bytes[index], b'+' | b'-') {
            index += 1;
        }
        let negative = index > sign_start && bytes[index - 1] == b'-';

        let digits_start = index;
        while index < bytes.len() && bytes[index].is_ascii_digit() {
            index += 1;
        }
        if index == digits_start {
            // no digits after the sign run
            index = index.max(sign_start + 1);
            continue;
        }
        if index < bytes.len() && bytes[index] == b'.' {
            index += 1;
            while index < bytes.len() && bytes[index].is_ascii_digit() {
                index += 1;
            }
        }

        if let Ok(magnitude) = line[digits_start..index].parse::<f64>() {
            tokens.push(if negative { -magnitude } else { magnitude });
        }
    }

    tokens
}
