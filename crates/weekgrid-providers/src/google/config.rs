//! Google Calendar provider configuration.

use std::time::Duration;

use crate::config::{DEFAULT_CALENDAR_ID, DEFAULT_MAX_RESULTS};
use crate::provider::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Configuration for the Google Calendar provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleConfig {
    /// API key sent as the `key` query parameter.
    pub api_key: String,

    /// Calendar to query. Defaults to `"primary"`.
    pub calendar_id: String,

    /// Value of the `maxResults` query parameter.
    pub max_results: u32,

    /// API base URL, without a trailing slash.
    pub base_url: String,

    /// Request timeout.
    pub timeout: Duration,
}

impl GoogleConfig {
    /// Creates a new configuration with default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Builder method to set the calendar id.
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    /// Builder method to set the result limit.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Builder method to set the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.api_key.trim().is_empty() {
            return Err("api_key is required");
        }
        if self.calendar_id.trim().is_empty() {
            return Err("calendar_id is required");
        }
        if self.base_url.is_empty() {
            return Err("base_url is required");
        }
        Ok(())
    }

    /// Full URL of the events endpoint.
    pub fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&self.calendar_id)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GoogleConfig::new("key");
        assert_eq!(config.calendar_id, "primary");
        assert_eq!(config.max_results, 50);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(
            config.events_url(),
            "https://www.googleapis.com/calendar/v3/calendars/primary/events"
        );
    }

    #[test]
    fn calendar_id_is_percent_encoded() {
        let config = GoogleConfig::new("key")
            .with_base_url("http://localhost:8080/")
            .with_calendar_id("team@group.calendar.google.com");
        assert_eq!(
            config.events_url(),
            "http://localhost:8080/calendars/team%40group.calendar.google.com/events"
        );
    }

    #[test]
    fn validation() {
        assert!(GoogleConfig::new("key").validate().is_ok());
        assert_eq!(GoogleConfig::new(" ").validate(), Err("api_key is required"));
        assert_eq!(
            GoogleConfig::new("key").with_calendar_id("").validate(),
            Err("calendar_id is required")
        );
    }
}
