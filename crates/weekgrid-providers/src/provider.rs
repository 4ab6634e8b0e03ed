//! CalendarProvider trait definition.
//!
//! A provider turns one [`FetchRequest`] into the raw events of a single
//! source. Each call makes at most one outbound request and honors the
//! request's abort signal.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use weekgrid_core::WeekWindow;

use crate::abort::AbortSignal;
use crate::config::SourceSelection;
use crate::error::ProviderResult;
use crate::raw_event::RawEvent;

/// Default timeout for outbound calendar requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base URL of the remote events API.
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// A boxed future for async trait methods.
///
/// Keeps [`CalendarProvider`] object-safe so the pipeline can hold a
/// `Box<dyn CalendarProvider>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Parameters of a single fetch.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// The week to fetch. Feed sources ignore it and return everything.
    pub window: WeekWindow,
    /// Aborts the fetch when raised.
    pub abort: AbortSignal,
}

impl FetchRequest {
    /// Creates a request for `window` that can't be aborted.
    pub fn new(window: WeekWindow) -> Self {
        Self {
            window,
            abort: AbortSignal::never(),
        }
    }

    /// Builder method to attach an abort signal.
    pub fn with_abort(mut self, abort: AbortSignal) -> Self {
        self.abort = abort;
        self
    }
}

/// Transport settings shared by the HTTP adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Base URL of the remote events API.
    pub api_base_url: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl HttpSettings {
    /// Builder method to set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to set the API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// The abstraction every calendar source implements.
///
/// # Errors
///
/// A failed or aborted fetch returns a
/// [`ProviderError`](crate::error::ProviderError). An `Ok` with an
/// empty list means the source answered and had nothing; the two must not be
/// conflated.
pub trait CalendarProvider: Send + Sync {
    /// Returns the name of this provider (e.g. "ical", "google").
    fn name(&self) -> &str;

    /// Fetches raw events for the request.
    fn fetch_events(&self, request: FetchRequest) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>>;
}

/// Builds the adapter for a source selection.
///
/// Returns `Ok(None)` for [`SourceSelection::Unconfigured`], which callers
/// must handle without any network I/O.
///
/// # Errors
///
/// Returns a configuration error if the adapter for the selection was
/// compiled out, or if its HTTP client can't be built.
pub fn build_provider(
    selection: &SourceSelection,
    settings: &HttpSettings,
) -> ProviderResult<Option<Box<dyn CalendarProvider>>> {
    match selection {
        SourceSelection::Unconfigured => Ok(None),
        #[cfg(feature = "ical")]
        SourceSelection::Feed { url } => {
            let provider = crate::ical::IcalFeedProvider::new(url.clone(), settings.timeout)?;
            Ok(Some(Box::new(provider)))
        }
        #[cfg(not(feature = "ical"))]
        SourceSelection::Feed { .. } => Err(crate::error::ProviderError::configuration(
            "feed source requested but the `ical` feature is disabled",
        )),
        #[cfg(feature = "google")]
        SourceSelection::RemoteApi {
            api_key,
            calendar_id,
            max_results,
        } => {
            let config = crate::google::GoogleConfig::new(api_key.clone())
                .with_calendar_id(calendar_id.clone())
                .with_max_results(*max_results)
                .with_base_url(settings.api_base_url.clone())
                .with_timeout(settings.timeout);
            let provider = crate::google::GoogleProvider::new(config)?;
            Ok(Some(Box::new(provider)))
        }
        #[cfg(not(feature = "google"))]
        SourceSelection::RemoteApi { .. } => Err(crate::error::ProviderError::configuration(
            "remote API source requested but the `google` feature is disabled",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_settings_defaults() {
        let settings = HttpSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);

        let settings = settings
            .with_timeout(Duration::from_secs(5))
            .with_api_base_url("http://localhost:9999");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.api_base_url, "http://localhost:9999");
    }

    #[test]
    fn unconfigured_builds_nothing() {
        let provider = build_provider(&SourceSelection::Unconfigured, &HttpSettings::default())
            .expect("unconfigured is not an error");
        assert!(provider.is_none());
    }

    #[cfg(feature = "ical")]
    #[test]
    fn feed_selection_builds_ical_provider() {
        let selection = SourceSelection::Feed {
            url: "https://example.com/cal.ics".into(),
        };
        let provider = build_provider(&selection, &HttpSettings::default())
            .unwrap()
            .unwrap();
        assert_eq!(provider.name(), "ical");
    }

    #[cfg(feature = "google")]
    #[test]
    fn remote_selection_builds_google_provider() {
        let selection = SourceSelection::RemoteApi {
            api_key: "key".into(),
            calendar_id: "primary".into(),
            max_results: 50,
        };
        let provider = build_provider(&selection, &HttpSettings::default())
            .unwrap()
            .unwrap();
        assert_eq!(provider.name(), "google");
    }
}
