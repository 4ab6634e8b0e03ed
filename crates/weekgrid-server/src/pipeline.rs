//! The week pipeline: source selection, fetch, cache, fallback.
//!
//! ```text
//! load(overrides, abort)
//!   │
//!   ├─ cache hit ───────────────────────────────► cached WeekData
//!   │
//!   └─ fetch_cacheable
//!        ├─ Cacheable(data) ── store (TTL, tag) ─► data
//!        └─ Skip(reason) ───── fetch_uncached ───► WeekData (never fails)
//! ```
//!
//! "Failed", "aborted", "nothing configured" and "zero events" are all
//! reported as [`Cacheability::Skip`] so none of them ever lands in the cache.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use weekgrid_core::{CanonicalEvent, WeekWindow};
use weekgrid_providers::{
    AbortSignal, CalendarProvider, CalendarSourceConfig, FetchRequest, HttpSettings,
    ProviderErrorCode, ProviderResult, SourceOverrides, SourceSelection, build_provider,
    normalize_events,
};

use crate::cache::{CALENDAR_EVENTS_TAG, DEFAULT_TTL, EventCache};
use crate::week_data::WeekData;

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Lifetime of a cached week.
    pub cache_ttl: Duration,
    /// Tag attached to stored weeks.
    pub cache_tag: String,
    /// Timeout for each outbound request.
    pub request_timeout: Duration,
    /// Base URL of the remote events API.
    pub api_base_url: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let http = HttpSettings::default();
        Self {
            cache_ttl: DEFAULT_TTL,
            cache_tag: CALENDAR_EVENTS_TAG.to_string(),
            request_timeout: http.timeout,
            api_base_url: http.api_base_url,
        }
    }
}

impl PipelineConfig {
    /// Builder method to set the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Builder method to set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builder method to set the API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Transport settings for the adapters.
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings::default()
            .with_timeout(self.request_timeout)
            .with_api_base_url(self.api_base_url.clone())
    }
}

/// Why a fetch result must not be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither a feed URL nor an API key is configured.
    Unconfigured,
    /// The adapter failed or was aborted.
    Failed(ProviderErrorCode),
    /// The adapter answered with zero events.
    Empty,
}

impl SkipReason {
    /// Returns true if the fetch was aborted.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Failed(ProviderErrorCode::Cancelled))
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "unconfigured"),
            Self::Failed(code) => write!(f, "failed ({})", code),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// Outcome of the cacheable path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cacheability {
    /// A fresh result worth storing.
    Cacheable(WeekData),
    /// Nothing worth storing.
    Skip(SkipReason),
}

/// Builds adapters for source selections.
///
/// Lets callers substitute their own providers, e.g. in-memory ones.
pub trait ProviderFactory: Send + Sync {
    /// Returns the adapter for `selection`, or `None` when unconfigured.
    fn build(
        &self,
        selection: &SourceSelection,
    ) -> ProviderResult<Option<Box<dyn CalendarProvider>>>;
}

/// Builds the HTTP adapters from [`weekgrid_providers`].
#[derive(Debug, Clone, Default)]
pub struct HttpProviderFactory {
    settings: HttpSettings,
}

impl HttpProviderFactory {
    /// Creates a factory using `settings` for every adapter.
    pub fn new(settings: HttpSettings) -> Self {
        Self { settings }
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn build(
        &self,
        selection: &SourceSelection,
    ) -> ProviderResult<Option<Box<dyn CalendarProvider>>> {
        build_provider(selection, &self.settings)
    }
}

/// Source of "now" for window computation.
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Loads the current week for a source configuration.
pub struct WeekPipeline {
    base: CalendarSourceConfig,
    config: PipelineConfig,
    cache: Arc<EventCache>,
    factory: Arc<dyn ProviderFactory>,
    now: Clock,
}

impl fmt::Debug for WeekPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeekPipeline")
            .field("base", &self.base)
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl WeekPipeline {
    /// Creates a pipeline with its own cache and the HTTP adapters.
    pub fn new(base: CalendarSourceConfig, config: PipelineConfig) -> Self {
        let cache = Arc::new(EventCache::new(config.cache_ttl));
        let factory = Arc::new(HttpProviderFactory::new(config.http_settings()));
        Self {
            base,
            config,
            cache,
            factory,
            now: Arc::new(Local::now),
        }
    }

    /// Builder method to share an existing cache.
    pub fn with_cache(mut self, cache: Arc<EventCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Builder method to substitute the adapter factory.
    pub fn with_factory(mut self, factory: Arc<dyn ProviderFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Builder method to substitute the clock.
    pub fn with_now<F>(mut self, now: F) -> Self
    where
        F: Fn() -> DateTime<Local> + Send + Sync + 'static,
    {
        self.now = Arc::new(now);
        self
    }

    /// The cache this pipeline reads and fills.
    pub fn cache(&self) -> &Arc<EventCache> {
        &self.cache
    }

    /// The pipeline settings.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The base source configuration with `overrides` applied.
    pub fn source_config(&self, overrides: &SourceOverrides) -> CalendarSourceConfig {
        overrides.apply(&self.base)
    }

    /// Returns the current week. Never fails.
    ///
    /// Serves a valid cached entry when there is one. Otherwise runs the
    /// cacheable path and stores its result, or falls back to an uncached
    /// recompute when the result is not worth storing.
    pub async fn load(&self, overrides: &SourceOverrides, abort: &AbortSignal) -> WeekData {
        let source = self.source_config(overrides);
        let key = source.signature();

        if let Some(hit) = self.cache.get_valid(&key).await {
            debug!(key = %key, events = hit.events.len(), "Cache hit");
            return hit;
        }

        match self.fetch_cacheable(&source, abort).await {
            Cacheability::Cacheable(data) => {
                self.cache
                    .insert_with_ttl(
                        key,
                        self.config.cache_tag.clone(),
                        data.clone(),
                        self.config.cache_ttl,
                    )
                    .await;
                data
            }
            Cacheability::Skip(reason) => {
                debug!(%reason, "Not caching; using uncached path");
                self.fetch_uncached(&source, abort).await
            }
        }
    }

    /// The cacheable path: one adapter call, judged for cache-worthiness.
    pub async fn fetch_cacheable(
        &self,
        source: &CalendarSourceConfig,
        abort: &AbortSignal,
    ) -> Cacheability {
        let window = WeekWindow::containing((self.now)());
        match self.fetch_week(source, &window, abort).await {
            Ok(events) if events.is_empty() => Cacheability::Skip(SkipReason::Empty),
            Ok(events) => {
                Cacheability::Cacheable(WeekData::new(window.filter_events(events), window.start))
            }
            Err(reason) => Cacheability::Skip(reason),
        }
    }

    /// The fallback path. Neither reads nor fills the cache.
    ///
    /// Returns the week's events when the source answers, otherwise no
    /// events stamped with the current time.
    pub async fn fetch_uncached(
        &self,
        source: &CalendarSourceConfig,
        abort: &AbortSignal,
    ) -> WeekData {
        let now = (self.now)();
        let window = WeekWindow::containing(now);
        match self.fetch_week(source, &window, abort).await {
            Ok(events) => WeekData::new(window.filter_events(events), window.start),
            Err(reason) => {
                debug!(%reason, "Uncached fetch produced nothing");
                WeekData::empty(now)
            }
        }
    }

    /// Drops every week stored under the pipeline's tag.
    pub async fn invalidate(&self) -> usize {
        self.cache.invalidate_tag(&self.config.cache_tag).await
    }

    /// Selects, builds and runs the adapter; returns normalized events
    /// before window filtering.
    async fn fetch_week(
        &self,
        source: &CalendarSourceConfig,
        window: &WeekWindow,
        abort: &AbortSignal,
    ) -> Result<Vec<CanonicalEvent>, SkipReason> {
        let selection = source.select();
        if selection.is_unconfigured() {
            debug!("No calendar source configured");
            return Err(SkipReason::Unconfigured);
        }

        let provider = match self.factory.build(&selection) {
            Ok(Some(provider)) => provider,
            Ok(None) => return Err(SkipReason::Unconfigured),
            Err(e) => {
                warn!(source = selection.kind(), error = %e, "Failed to build calendar source");
                return Err(SkipReason::Failed(e.code()));
            }
        };

        let request = FetchRequest::new(*window).with_abort(abort.clone());
        match provider.fetch_events(request).await {
            Ok(raw) => {
                let events = normalize_events(&raw);
                info!(
                    source = provider.name(),
                    fetched = raw.len(),
                    events = events.len(),
                    "Fetched calendar events"
                );
                Ok(events)
            }
            Err(e) if e.is_cancelled() => {
                debug!(source = provider.name(), "Fetch aborted");
                Err(SkipReason::Failed(e.code()))
            }
            Err(e) => {
                warn!(source = provider.name(), error = %e, "Fetch failed");
                Err(SkipReason::Failed(e.code()))
            }
        }
    }
}
