//! Calendar source configuration and source selection.
//!
//! Configuration is read once at the process boundary
//! ([`CalendarSourceConfig::from_env`]) and can be overridden per call with
//! [`SourceOverrides`]. [`CalendarSourceConfig::select`] applies the source
//! precedence: feed URL, then API key, then nothing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Environment variable holding the calendar feed URL.
pub const ENV_ICAL_URL: &str = "WEEKGRID_ICAL_URL";
/// Environment variable holding the remote API key.
pub const ENV_API_KEY: &str = "WEEKGRID_API_KEY";
/// Environment variable holding the remote calendar id.
pub const ENV_CALENDAR_ID: &str = "WEEKGRID_CALENDAR_ID";
/// Environment variable holding the remote result limit.
pub const ENV_MAX_RESULTS: &str = "WEEKGRID_MAX_RESULTS";

/// Calendar id used when none is configured.
pub const DEFAULT_CALENDAR_ID: &str = "primary";
/// Result limit used when none is configured.
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Which calendar source to query and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSourceConfig {
    /// URL of an iCalendar feed. Takes precedence over the API key.
    pub ical_url: Option<String>,
    /// Calendar to query through the remote API.
    pub calendar_id: String,
    /// Key for the remote API.
    pub api_key: Option<String>,
    /// Upper bound on remote results, passed through as-is.
    pub max_results: u32,
}

impl Default for CalendarSourceConfig {
    fn default() -> Self {
        Self {
            ical_url: None,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            api_key: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// The adapter chosen for a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    /// Fetch and parse an iCalendar feed.
    Feed {
        /// The feed URL.
        url: String,
    },
    /// Query the remote events API.
    RemoteApi {
        /// The API key.
        api_key: String,
        /// The calendar to query.
        calendar_id: String,
        /// Upper bound on results.
        max_results: u32,
    },
    /// Nothing configured; no adapter runs.
    Unconfigured,
}

impl SourceSelection {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Feed { .. } => "ical",
            Self::RemoteApi { .. } => "google",
            Self::Unconfigured => "unconfigured",
        }
    }

    /// Returns true if no source is configured.
    pub fn is_unconfigured(&self) -> bool {
        matches!(self, Self::Unconfigured)
    }
}

impl CalendarSourceConfig {
    /// Builder method to set the feed URL.
    pub fn with_ical_url(mut self, url: impl Into<String>) -> Self {
        self.ical_url = non_empty(url.into());
        self
    }

    /// Builder method to set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = non_empty(key.into());
        self
    }

    /// Builder method to set the calendar id.
    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        if let Some(id) = non_empty(id.into()) {
            self.calendar_id = id;
        }
        self
    }

    /// Builder method to set the result limit.
    pub fn with_max_results(mut self, max: u32) -> Self {
        self.max_results = max;
        self
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// Empty values count as absent. An unparseable `WEEKGRID_MAX_RESULTS`
    /// falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).and_then(non_empty);
        let defaults = Self::default();

        let max_results = match get(ENV_MAX_RESULTS) {
            Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Ignoring invalid {}", ENV_MAX_RESULTS);
                defaults.max_results
            }),
            None => defaults.max_results,
        };

        Self {
            ical_url: get(ENV_ICAL_URL),
            calendar_id: get(ENV_CALENDAR_ID).unwrap_or(defaults.calendar_id),
            api_key: get(ENV_API_KEY),
            max_results,
        }
    }

    /// Picks the source by precedence: feed URL, then API key.
    pub fn select(&self) -> SourceSelection {
        if let Some(url) = self.ical_url.as_deref().filter(|s| !s.trim().is_empty()) {
            return SourceSelection::Feed {
                url: url.to_string(),
            };
        }
        if let Some(key) = self.api_key.as_deref().filter(|s| !s.trim().is_empty()) {
            return SourceSelection::RemoteApi {
                api_key: key.to_string(),
                calendar_id: self.calendar_id.clone(),
                max_results: self.max_results,
            };
        }
        SourceSelection::Unconfigured
    }

    /// Stable digest of every field that affects the fetched events.
    ///
    /// Two configs share a cache entry exactly when their signatures match.
    pub fn signature(&self) -> String {
        let mut hasher = Sha256::new();
        hash_optional(&mut hasher, self.ical_url.as_deref());
        hash_optional(&mut hasher, self.api_key.as_deref());
        hasher.update(self.calendar_id.len().to_le_bytes());
        hasher.update(self.calendar_id.as_bytes());
        hasher.update(self.max_results.to_le_bytes());
        format!("{:x}", hasher.finalize())
    }
}

fn hash_optional(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update([1u8]);
            hasher.update(v.len().to_le_bytes());
            hasher.update(v.as_bytes());
        }
        None => hasher.update([0u8]),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Per-call overrides merged over a base [`CalendarSourceConfig`].
///
/// `None` keeps the base value; an empty string clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceOverrides {
    /// Replaces the feed URL.
    pub ical_url: Option<String>,
    /// Replaces the API key.
    pub api_key: Option<String>,
    /// Replaces the calendar id.
    pub calendar_id: Option<String>,
    /// Replaces the result limit.
    pub max_results: Option<u32>,
}

impl SourceOverrides {
    /// Returns true if no field is overridden.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merges these overrides over `base`.
    pub fn apply(&self, base: &CalendarSourceConfig) -> CalendarSourceConfig {
        let mut config = base.clone();
        if let Some(ref url) = self.ical_url {
            config.ical_url = non_empty(url.clone());
        }
        if let Some(ref key) = self.api_key {
            config.api_key = non_empty(key.clone());
        }
        if let Some(ref id) = self.calendar_id {
            config = config.with_calendar_id(id.clone());
        }
        if let Some(max) = self.max_results {
            config.max_results = max;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = CalendarSourceConfig::default();
        assert_eq!(config.calendar_id, "primary");
        assert_eq!(config.max_results, 50);
        assert!(config.ical_url.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn from_lookup_reads_all_fields() {
        let config = CalendarSourceConfig::from_lookup(lookup(&[
            (ENV_ICAL_URL, "https://example.com/a.ics"),
            (ENV_API_KEY, "secret"),
            (ENV_CALENDAR_ID, "team@example.com"),
            (ENV_MAX_RESULTS, "10"),
        ]));

        assert_eq!(config.ical_url.as_deref(), Some("https://example.com/a.ics"));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.calendar_id, "team@example.com");
        assert_eq!(config.max_results, 10);
    }

    #[test]
    fn from_lookup_treats_empty_as_absent() {
        let config = CalendarSourceConfig::from_lookup(lookup(&[
            (ENV_ICAL_URL, ""),
            (ENV_API_KEY, "  "),
            (ENV_CALENDAR_ID, ""),
            (ENV_MAX_RESULTS, "lots"),
        ]));
        assert_eq!(config, CalendarSourceConfig::default());
    }

    #[test]
    fn feed_url_wins_over_api_key() {
        let config = CalendarSourceConfig::default()
            .with_ical_url("https://example.com/a.ics")
            .with_api_key("secret");
        assert_eq!(
            config.select(),
            SourceSelection::Feed {
                url: "https://example.com/a.ics".into()
            }
        );
    }

    #[test]
    fn api_key_selects_remote() {
        let config = CalendarSourceConfig::default()
            .with_api_key("secret")
            .with_max_results(5);
        assert_eq!(
            config.select(),
            SourceSelection::RemoteApi {
                api_key: "secret".into(),
                calendar_id: "primary".into(),
                max_results: 5,
            }
        );
    }

    #[test]
    fn nothing_is_unconfigured() {
        let selection = CalendarSourceConfig::default().select();
        assert!(selection.is_unconfigured());
        assert_eq!(selection.kind(), "unconfigured");

        // Empty strings assigned directly still don't count.
        let config = CalendarSourceConfig {
            ical_url: Some(String::new()),
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(config.select().is_unconfigured());
    }

    #[test]
    fn signature_is_stable_and_field_sensitive() {
        let base = CalendarSourceConfig::default().with_api_key("secret");
        assert_eq!(base.signature(), base.clone().signature());
        assert_eq!(base.signature().len(), 64);

        let other_calendar = base.clone().with_calendar_id("work");
        let other_limit = base.clone().with_max_results(10);
        let other_key = base.clone().with_api_key("other");
        assert_ne!(base.signature(), other_calendar.signature());
        assert_ne!(base.signature(), other_limit.signature());
        assert_ne!(base.signature(), other_key.signature());
    }

    #[test]
    fn signature_distinguishes_which_field_holds_a_value() {
        let as_url = CalendarSourceConfig::default().with_ical_url("x");
        let as_key = CalendarSourceConfig::default().with_api_key("x");
        assert_ne!(as_url.signature(), as_key.signature());
    }

    #[test]
    fn overrides_merge_over_base() {
        let base = CalendarSourceConfig::default()
            .with_ical_url("https://example.com/a.ics")
            .with_api_key("secret");

        let overrides = SourceOverrides {
            ical_url: Some(String::new()),
            calendar_id: Some("team".into()),
            max_results: Some(3),
            ..Default::default()
        };
        assert!(!overrides.is_empty());

        let merged = overrides.apply(&base);
        assert!(merged.ical_url.is_none());
        assert_eq!(merged.api_key.as_deref(), Some("secret"));
        assert_eq!(merged.calendar_id, "team");
        assert_eq!(merged.max_results, 3);
        assert!(matches!(merged.select(), SourceSelection::RemoteApi { .. }));
    }

    #[test]
    fn empty_overrides_keep_base() {
        let base = CalendarSourceConfig::default().with_api_key("secret");
        let overrides = SourceOverrides::default();
        assert!(overrides.is_empty());
        assert_eq!(overrides.apply(&base), base);
    }
}
