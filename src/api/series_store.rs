use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::{Extent, Series, SeriesAccessors, SeriesWindow};
use crate::error::{ChartError, ChartResult};
use crate::parse::ParsedSeries;

use super::{OfflineFetcher, SourceFetcher, SourceRef, StoreConfig};

/// Addresses series for removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    Id(String),
    Index(usize),
    /// Every target resolves against the store as it was before the call.
    Many(Vec<RemoveTarget>),
    /// Removes everything and resets both global extents.
    All,
}

impl From<&str> for RemoveTarget {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

impl From<usize> for RemoveTarget {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Owns loaded series, their cached windows and the global extents.
///
/// Series keep insertion order; positional accessors index into that order.
/// Global extents only grow on load. Removing a single series leaves them
/// as they were until `recompute_extrema` is called.
pub struct SeriesStore {
    pub(super) config: StoreConfig,
    pub(super) fetcher: Arc<dyn SourceFetcher>,
    pub(super) staged: Vec<SourceRef>,
    pub(super) series: IndexMap<String, Series>,
    pub(super) global_x: Extent,
    pub(super) global_y: Extent,
}

impl std::fmt::Debug for SeriesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesStore")
            .field("config", &self.config)
            .field("staged", &self.staged.len())
            .field("series", &self.series.keys().collect::<Vec<_>>())
            .field("global_x", &self.global_x)
            .field("global_y", &self.global_y)
            .finish_non_exhaustive()
    }
}

impl SeriesStore {
    /// Creates an empty store that resolves URL sources with `OfflineFetcher`.
    pub fn new(config: StoreConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            config,
            fetcher: Arc::new(OfflineFetcher),
            staged: Vec::new(),
            series: IndexMap::new(),
            global_x: Extent::EMPTY,
            global_y: Extent::EMPTY,
        })
    }

    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn SourceFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Stages a source for the next `load`. Nothing is fetched or parsed yet.
    pub fn add(&mut self, source: SourceRef) {
        debug!(source = %source.label(), "stage source");
        self.staged.push(source);
    }

    pub fn add_all(&mut self, sources: impl IntoIterator<Item = SourceRef>) {
        for source in sources {
            self.add(source);
        }
    }

    #[must_use]
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Inserts an already-parsed series and merges its limits into the
    /// global extents. A duplicate id leaves the store untouched.
    pub fn insert(&mut self, parsed: ParsedSeries) -> ChartResult<String> {
        if self.series.contains_key(&parsed.id) {
            warn!(id = %parsed.id, "rejecting series with non-unique id");
            return Err(ChartError::DuplicateSeries { id: parsed.id });
        }

        let series = parsed.into_series();
        let id = series.id().to_owned();
        self.global_x = self.global_x.merge(series.x_limits());
        self.global_y = self.global_y.merge(series.y_limits());
        debug!(
            id = %id,
            len = series.window().high,
            global_x_min = self.global_x.min,
            global_x_max = self.global_x.max,
            "inserted series"
        );
        self.series.insert(id.clone(), series);
        Ok(id)
    }

    /// Removes the addressed series and returns their ids in removal order.
    ///
    /// Unknown ids and out-of-range indices are ignored.
    pub fn remove(&mut self, target: impl Into<RemoveTarget>) -> Vec<String> {
        let target = target.into();
        if target == RemoveTarget::All {
            let removed: Vec<String> = self.series.drain(..).map(|(id, _)| id).collect();
            self.global_x = Extent::EMPTY;
            self.global_y = Extent::EMPTY;
            debug!(count = removed.len(), "removed all series");
            return removed;
        }

        let mut ids = Vec::new();
        self.resolve_targets(&target, &mut ids);

        let removed: Vec<String> = ids
            .into_iter()
            .filter(|id| self.series.shift_remove(id).is_some())
            .collect();
        debug!(removed = ?removed, "removed series");
        removed
    }

    fn resolve_targets(&self, target: &RemoveTarget, ids: &mut Vec<String>) {
        let id = match target {
            RemoveTarget::Id(id) => self.series.contains_key(id).then(|| id.clone()),
            RemoveTarget::Index(index) => self.series.get_index(*index).map(|(id, _)| id.clone()),
            RemoveTarget::Many(targets) => {
                for target in targets {
                    self.resolve_targets(target, ids);
                }
                None
            }
            RemoveTarget::All => {
                ids.extend(self.series.keys().cloned());
                None
            }
        };
        if let Some(id) = id {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    /// Restores every window to `(0, len, 0)`, dropping narrowing and the
    /// cached bin count.
    pub fn reset(&mut self) {
        for series in self.series.values_mut() {
            series.reset_window();
        }
        debug!(count = self.series.len(), "reset series windows");
    }

    /// Recomputes both global extents from the series currently held.
    pub fn recompute_extrema(&mut self) {
        let (global_x, global_y) = self.series.values().fold(
            (Extent::EMPTY, Extent::EMPTY),
            |(x, y), series| (x.merge(series.x_limits()), y.merge(series.y_limits())),
        );
        self.global_x = global_x;
        self.global_y = global_y;
        debug!(
            x_min = global_x.min,
            x_max = global_x.max,
            y_min = global_y.min,
            y_max = global_y.max,
            "recomputed global extrema"
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.series.contains_key(id)
    }

    #[must_use]
    pub fn series(&self, index: usize) -> Option<&Series> {
        self.series.get_index(index).map(|(_, series)| series)
    }

    #[must_use]
    pub fn series_by_id(&self, id: &str) -> Option<&Series> {
        self.series.get(id)
    }

    #[must_use]
    pub fn id(&self, index: usize) -> Option<&str> {
        self.series(index).map(Series::id)
    }

    #[must_use]
    pub fn title(&self, index: usize) -> Option<&str> {
        self.series(index).map(Series::title)
    }

    #[must_use]
    pub fn accessors(&self, index: usize) -> Option<&SeriesAccessors> {
        self.series(index).map(Series::accessors)
    }

    #[must_use]
    pub fn window(&self, index: usize) -> Option<SeriesWindow> {
        self.series(index).map(Series::window)
    }

    #[must_use]
    pub fn global_x_extent(&self) -> Extent {
        self.global_x
    }

    #[must_use]
    pub fn global_y_extent(&self) -> Extent {
        self.global_y
    }
}

#[cfg(test)]
mod tests {
    use super::{RemoveTarget, SeriesStore};
    use crate::api::StoreConfig;
    use crate::core::{DenseSamples, Extent, SeriesAccessors, SeriesData};
    use crate::parse::ParsedSeries;

    fn parsed(id: &str, x: (f64, f64), y: (f64, f64)) -> ParsedSeries {
        let x_limits = Extent::new(x.0, x.1).expect("x extent");
        ParsedSeries {
            id: id.to_owned(),
            title: None,
            accessors: SeriesAccessors::new("x", "y"),
            x_limits,
            y_limits: Extent::new(y.0, y.1).expect("y extent"),
            data: SeriesData::Dense(DenseSamples::new(vec![y.0, y.1], x_limits)),
        }
    }

    fn store_with(ids: &[&str]) -> SeriesStore {
        let mut store = SeriesStore::new(StoreConfig::default()).expect("store");
        for (offset, id) in ids.iter().enumerate() {
            let base = offset as f64 * 10.0;
            store
                .insert(parsed(id, (base, base + 5.0), (0.0, base + 1.0)))
                .expect("insert");
        }
        store
    }

    #[test]
    fn many_resolves_indices_before_removing() {
        let mut store = store_with(&["a", "b", "c"]);
        let removed = store.remove(RemoveTarget::Many(vec![
            RemoveTarget::Index(0),
            RemoveTarget::Index(1),
            RemoveTarget::Id("missing".to_owned()),
        ]));
        assert_eq!(removed, vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(store.id(0), Some("c"));
    }

    #[test]
    fn remove_all_resets_extents() {
        let mut store = store_with(&["a", "b"]);
        let removed = store.remove(RemoveTarget::All);
        assert_eq!(removed.len(), 2);
        assert!(store.global_x_extent().is_empty());
        assert!(store.global_y_extent().is_empty());
    }

    #[test]
    fn recompute_shrinks_extents_after_removal() {
        let mut store = store_with(&["a", "b"]);
        store.remove("b");
        assert_eq!(store.global_x_extent().as_pair(), (0.0, 15.0));

        store.recompute_extrema();
        assert_eq!(store.global_x_extent().as_pair(), (0.0, 5.0));
        assert_eq!(store.global_y_extent().as_pair(), (0.0, 1.0));
    }

    #[test]
    fn out_of_range_index_is_a_no_op() {
        let mut store = store_with(&["a"]);
        assert!(store.remove(7_usize).is_empty());
        assert_eq!(store.len(), 1);
    }
}
