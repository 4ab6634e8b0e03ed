//! Google Calendar implementation of [`CalendarProvider`].

use tracing::warn;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, CalendarProvider, FetchRequest};
use crate::raw_event::RawEvent;

use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;

const PROVIDER_NAME: &str = "google";

/// Google Calendar provider.
///
/// Each fetch is a single `events.list` call bounded by the request window.
#[derive(Debug)]
pub struct GoogleProvider {
    client: GoogleCalendarClient,
}

impl GoogleProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config.validate().map_err(ProviderError::configuration)?;
        Ok(Self {
            client: GoogleCalendarClient::new(config)?,
        })
    }

    /// The calendar this provider queries.
    pub fn calendar_id(&self) -> &str {
        &self.client.config().calendar_id
    }
}

impl CalendarProvider for GoogleProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch_events(&self, request: FetchRequest) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>> {
        Box::pin(async move {
            let (time_min, time_max) = (request.window.start_utc(), request.window.end_utc());
            request
                .abort
                .guard("google fetch", self.client.list_events(time_min, time_max))
                .await
                .map_err(|e| {
                    if !e.is_cancelled() {
                        warn!(
                            calendar_id = %self.calendar_id(),
                            error = %e,
                            "Google Calendar fetch failed"
                        );
                    }
                    e.with_provider(PROVIDER_NAME)
                })
        })
    }
}
