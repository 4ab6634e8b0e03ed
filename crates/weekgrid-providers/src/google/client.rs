//! Google Calendar API client.
//!
//! Builds the `events.list` request, maps HTTP failures to provider errors,
//! and converts the JSON items into [`RawEvent`]s.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::http;
use crate::raw_event::{RawEvent, RawEventTime};

use super::config::GoogleConfig;

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: Client,
    config: GoogleConfig,
}

impl GoogleCalendarClient {
    /// Creates a new client for `config`.
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        Ok(Self {
            http_client: http::build_client(config.timeout)?,
            config,
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }

    /// Lists the events starting in `[time_min, time_max]`.
    ///
    /// Makes exactly one request; a `nextPageToken` in the response is not
    /// followed, so `maxResults` bounds what comes back.
    pub async fn list_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> ProviderResult<Vec<RawEvent>> {
        let url = self.config.events_url();
        debug!(
            calendar_id = %self.config.calendar_id,
            %time_min,
            %time_max,
            "Listing calendar events"
        );

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("key", self.config.api_key.clone()),
                ("timeMin", format_time(time_min)),
                ("timeMax", format_time(time_max)),
                ("maxResults", self.config.max_results.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .map_err(http::send_error)?;

        let body = http::success_body(response).await?;
        let list: EventListResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
                .with_source(e)
        })?;

        if list.next_page_token.is_some() {
            debug!(
                max_results = self.config.max_results,
                "More events available than requested; ignoring next page"
            );
        }

        let events: Vec<RawEvent> = list.items.into_iter().filter_map(convert_event).collect();
        debug!(
            count = events.len(),
            calendar_id = %self.config.calendar_id,
            "Fetched events"
        );
        Ok(events)
    }
}

fn format_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Converts an API item, or `None` for items that can't be shown.
fn convert_event(event: ApiEvent) -> Option<RawEvent> {
    if event.status.as_deref() == Some("cancelled") {
        trace!(id = ?event.id, "Skipping cancelled event");
        return None;
    }

    let Some(id) = event.id.filter(|id| !id.is_empty()) else {
        warn!("Skipping event without id");
        return None;
    };

    let start = convert_time(&id, "start", event.start.as_ref())?;
    let end = convert_time(&id, "end", event.end.as_ref())?;
    if start.is_all_day() != end.is_all_day() {
        warn!(id = %id, "Skipping event mixing date and dateTime");
        return None;
    }

    let mut raw = RawEvent::new(id, start, end);
    raw.summary = event.summary;
    raw.status = event.status;
    Some(raw)
}

fn convert_time(id: &str, field: &str, time: Option<&ApiEventTime>) -> Option<RawEventTime> {
    let time = time?;
    match (time.date_time.as_deref(), time.date.as_deref()) {
        (Some(dt), _) => match DateTime::parse_from_rfc3339(dt) {
            Ok(parsed) => Some(RawEventTime::Utc(parsed.with_timezone(&Utc))),
            Err(e) => {
                warn!(id, field, value = dt, error = %e, "Skipping event with bad dateTime");
                None
            }
        },
        (None, Some(date)) => match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(parsed) => Some(RawEventTime::Date(parsed)),
            Err(e) => {
                warn!(id, field, value = date, error = %e, "Skipping event with bad date");
                None
            }
        },
        (None, None) => {
            warn!(id, field, "Skipping event without time");
            None
        }
    }
}

/// Response from the events list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
    next_page_token: Option<String>,
}

/// A single event from the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: Option<String>,
    summary: Option<String>,
    status: Option<String>,
    start: Option<ApiEventTime>,
    end: Option<ApiEventTime>,
}

/// Event time from the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date: Option<String>,
    date_time: Option<String>,
}
