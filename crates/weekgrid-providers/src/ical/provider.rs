//! iCalendar feed implementation of [`CalendarProvider`].

use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, warn};

use crate::error::ProviderResult;
use crate::http;
use crate::provider::{BoxFuture, CalendarProvider, FetchRequest};
use crate::raw_event::RawEvent;

use super::parse::parse_feed;

const PROVIDER_NAME: &str = "ical";

/// Reads events from an iCalendar feed URL.
///
/// The feed is fetched whole and the request window is not sent upstream.
/// The pipeline filters to the week afterwards.
#[derive(Debug)]
pub struct IcalFeedProvider {
    client: Client,
    url: String,
}

impl IcalFeedProvider {
    /// Creates a provider for `url`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            client: http::build_client(timeout)?,
            url: url.into(),
        })
    }

    /// The feed URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_feed(&self) -> ProviderResult<Vec<RawEvent>> {
        debug!(url = %self.url, "Fetching iCalendar feed");

        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "text/calendar")
            .send()
            .await
            .map_err(http::send_error)?;

        let body = http::success_body(response).await?;
        Ok(parse_feed(&body))
    }
}

impl CalendarProvider for IcalFeedProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch_events(&self, request: FetchRequest) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>> {
        Box::pin(async move {
            request
                .abort
                .guard("ical fetch", self.fetch_feed())
                .await
                .map_err(|e| {
                    if !e.is_cancelled() {
                        warn!(url = %self.url, error = %e, "iCalendar fetch failed");
                    }
                    e.with_provider(PROVIDER_NAME)
                })
        })
    }
}
