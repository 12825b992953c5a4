use futures::future::{BoxFuture, FutureExt};
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{ChartError, ChartResult};

/// Where a source's payload comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceLocation {
    /// Resolved through the store's `SourceFetcher`.
    Url(String),
    /// Already-parsed JSON handed over by the host.
    Inline(Value),
    /// JCAMP-DX document text.
    JcampText(String),
}

impl SourceLocation {
    fn label(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Inline(_) => "<inline json>".to_owned(),
            Self::JcampText(_) => "<inline jcamp>".to_owned(),
        }
    }
}

/// One data source staged for the next `load`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRef {
    pub location: SourceLocation,
    /// Seed for generated ids of in-memory sources; URLs seed with themselves.
    pub key: Option<String>,
    /// Optional companion payload of `[x_ref, col...]` rows.
    pub annotations: Option<SourceLocation>,
}

impl SourceRef {
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self::from_location(SourceLocation::Url(url.into()))
    }

    #[must_use]
    pub fn inline(payload: Value) -> Self {
        Self::from_location(SourceLocation::Inline(payload))
    }

    #[must_use]
    pub fn jcamp_text(text: impl Into<String>) -> Self {
        Self::from_location(SourceLocation::JcampText(text.into()))
    }

    fn from_location(location: SourceLocation) -> Self {
        Self {
            location,
            key: None,
            annotations: None,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: SourceLocation) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Human-readable name used in load reports and logs.
    #[must_use]
    pub fn label(&self) -> String {
        match (&self.location, &self.key) {
            (SourceLocation::Url(url), _) => url.clone(),
            (_, Some(key)) => key.clone(),
            (location, None) => location.label(),
        }
    }

    /// Stable hash seed, if the source has one.
    pub(crate) fn seed(&self) -> Option<&str> {
        match (&self.location, &self.key) {
            (_, Some(key)) => Some(key),
            (SourceLocation::Url(url), None) => Some(url),
            _ => None,
        }
    }
}

/// Raw payload returned by a fetcher.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedPayload {
    Json(Value),
    Text(String),
}

impl FetchedPayload {
    /// Sniffs a text body: `##` labels mean JCAMP-DX, valid JSON means JSON,
    /// anything else stays text.
    #[must_use]
    pub fn from_text(text: String) -> Self {
        if text.trim_start().starts_with("##") {
            return Self::Text(text);
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }
}

/// Resolves URLs into payloads.
///
/// Fetches for one `load` run concurrently on the caller's executor; the
/// trait does not spawn.
pub trait SourceFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ChartResult<FetchedPayload>>;
}

/// Default fetcher for stores fed only with in-memory sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineFetcher;

impl SourceFetcher for OfflineFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ChartResult<FetchedPayload>> {
        async move {
            Err(ChartError::Fetch {
                source_ref: url.to_owned(),
                reason: "no fetcher configured for url sources".to_owned(),
            })
        }
        .boxed()
    }
}

/// Serves pre-registered payloads by URL.
#[derive(Debug, Default, Clone)]
pub struct MemoryFetcher {
    payloads: IndexMap<String, FetchedPayload>,
}

impl MemoryFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_json(mut self, url: impl Into<String>, payload: Value) -> Self {
        self.payloads.insert(url.into(), FetchedPayload::Json(payload));
        self
    }

    #[must_use]
    pub fn with_text(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.payloads
            .insert(url.into(), FetchedPayload::from_text(text.into()));
        self
    }
}

impl SourceFetcher for MemoryFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ChartResult<FetchedPayload>> {
        async move {
            self.payloads
                .get(url)
                .cloned()
                .ok_or_else(|| ChartError::Fetch {
                    source_ref: url.to_owned(),
                    reason: "not found".to_owned(),
                })
        }
        .boxed()
    }
}

/// Fetches sources over HTTP(S) with `reqwest`.
#[cfg(feature = "http")]
#[derive(Debug, Default, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http")]
impl SourceFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ChartResult<FetchedPayload>> {
        async move {
            let fetch_error = |e: reqwest::Error| ChartError::Fetch {
                source_ref: url.to_owned(),
                reason: e.to_string(),
            };
            let response = self
                .client
                .get(url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(fetch_error)?;
            let body = response.text().await.map_err(fetch_error)?;
            Ok(FetchedPayload::from_text(body))
        }
        .boxed()
    }
}

/// Resolves a location into a payload, going through `fetcher` for URLs.
pub(crate) async fn resolve_location(
    location: SourceLocation,
    fetcher: &dyn SourceFetcher,
) -> ChartResult<FetchedPayload> {
    match location {
        SourceLocation::Url(url) => fetcher.fetch(&url).await,
        SourceLocation::Inline(value) => Ok(FetchedPayload::Json(value)),
        SourceLocation::JcampText(text) => Ok(FetchedPayload::Text(text)),
    }
}
