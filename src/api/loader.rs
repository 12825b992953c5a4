use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::core::SeriesData;
use crate::error::{ChartError, ChartResult};
use crate::parse::{
    ParsedSeries, fresh_seed, join_annotations, parse_dense, parse_jcamp, parse_records, series_id,
};

use super::fetch::resolve_location;
use super::{FetchedPayload, SeriesLayout, SeriesStore, SourceFetcher, SourceRef};

/// A source (or one series of it) that did not make it into the store.
#[derive(Debug)]
pub struct LoadRejection {
    pub source: String,
    pub error: ChartError,
}

/// Outcome of one `load` call.
///
/// Sources fail independently: a rejected source never blocks the others.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Ids of inserted series, in staging order.
    pub loaded: Vec<String>,
    pub rejected: Vec<LoadRejection>,
}

impl LoadReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }

    fn reject(&mut self, source: &str, error: ChartError) {
        warn!(source, error = %error, "rejected source");
        self.rejected.push(LoadRejection {
            source: source.to_owned(),
            error,
        });
    }
}

struct ResolvedSource {
    label: String,
    seed: String,
    payload: ChartResult<FetchedPayload>,
    annotations: Option<ChartResult<FetchedPayload>>,
}

impl SeriesStore {
    /// Resolves every staged source concurrently, then parses and inserts
    /// them in staging order.
    ///
    /// Completes once all fetches have settled. Staged sources are consumed
    /// whether they load or not.
    pub async fn load(&mut self) -> LoadReport {
        let staged = std::mem::take(&mut self.staged);
        let fetcher = Arc::clone(&self.fetcher);
        debug!(count = staged.len(), "loading staged sources");

        let resolved = join_all(
            staged
                .into_iter()
                .map(|source| resolve_source(source, Arc::clone(&fetcher))),
        )
        .await;

        let mut report = LoadReport::default();
        for source in resolved {
            self.ingest(source, &mut report);
        }

        debug!(
            loaded = report.loaded.len(),
            rejected = report.rejected.len(),
            series = self.series.len(),
            "load finished"
        );
        report
    }

    fn ingest(&mut self, source: ResolvedSource, report: &mut LoadReport) {
        let ResolvedSource {
            label,
            seed,
            payload,
            annotations,
        } = source;

        let payload = match payload {
            Ok(payload) => payload,
            Err(error) => return report.reject(&label, error),
        };
        let annotations = match annotations.transpose() {
            Ok(annotations) => annotations,
            Err(error) => return report.reject(&label, error),
        };

        for parsed in self.parse_payload(payload, &seed) {
            let inserted = parsed.and_then(|mut parsed| {
                if let Some(annotations) = &annotations {
                    attach_annotations(&mut parsed, annotations)?;
                }
                self.insert(parsed)
            });
            match inserted {
                Ok(id) => report.loaded.push(id),
                Err(error) => report.reject(&label, error),
            }
        }
    }

    fn parse_payload(&self, payload: FetchedPayload, seed: &str) -> Vec<ChartResult<ParsedSeries>> {
        match payload {
            FetchedPayload::Text(text) => match parse_jcamp(&text) {
                Ok(blocks) if blocks.is_empty() => vec![Err(ChartError::Parse(
                    "jcamp document has no (X++(Y..Y)) data block".to_owned(),
                ))],
                Ok(blocks) => {
                    let multi = blocks.len() > 1;
                    blocks
                        .into_iter()
                        .enumerate()
                        .map(|(index, block)| {
                            let seed = if multi {
                                format!("{seed}:{index}")
                            } else {
                                seed.to_owned()
                            };
                            block.into_parsed(series_id(&seed))
                        })
                        .collect()
                }
                Err(error) => vec![Err(error)],
            },
            FetchedPayload::Json(value) => match self.config.layout {
                SeriesLayout::Dense => vec![parse_dense(&value, &self.config, seed)],
                SeriesLayout::Records => parse_records(&value, &self.config, seed),
            },
        }
    }
}

async fn resolve_source(source: SourceRef, fetcher: Arc<dyn SourceFetcher>) -> ResolvedSource {
    let label = source.label();
    let seed = source.seed().map_or_else(fresh_seed, str::to_owned);

    let fetcher: &dyn SourceFetcher = fetcher.as_ref();
    let payload = resolve_location(source.location, fetcher);
    let annotation_location = source.annotations;
    let annotations = async move {
        match annotation_location {
            Some(location) => Some(resolve_location(location, fetcher).await),
            None => None,
        }
    };
    let (payload, annotations) = futures::join!(payload, annotations);

    ResolvedSource {
        label,
        seed,
        payload,
        annotations,
    }
}

fn attach_annotations(parsed: &mut ParsedSeries, annotations: &FetchedPayload) -> ChartResult<()> {
    let FetchedPayload::Json(rows) = annotations else {
        return Err(ChartError::Parse(
            "annotation payload must be json".to_owned(),
        ));
    };
    match &mut parsed.data {
        SeriesData::Records(samples) => {
            join_annotations(samples.records_mut(), rows)?;
        }
        SeriesData::Dense(_) => {
            debug!(id = %parsed.id, "ignoring annotations for dense series");
        }
    }
    Ok(())
}
