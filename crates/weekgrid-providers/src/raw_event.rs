//! Raw event type from calendar sources.
//!
//! [`RawEvent`] keeps the time values exactly as the source expressed them
//! (UTC, floating, or date-only) so that the adapters stay free of local-time
//! arithmetic. [`crate::normalize`] converts them into canonical events.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// The time specification for a raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum RawEventTime {
    /// An absolute instant (iCal `...Z` values, API `dateTime` values).
    Utc(DateTime<Utc>),
    /// A wall-clock time with no zone, read as local time.
    Floating(NaiveDateTime),
    /// An all-day date.
    Date(NaiveDate),
}

impl RawEventTime {
    /// Returns true if this is an all-day value.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

/// A calendar event as read from a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Unique identifier within the source (synthesized when absent).
    pub id: String,
    /// When the event starts.
    pub start: RawEventTime,
    /// When the event ends.
    pub end: RawEventTime,
    /// The event title, if the source provided one.
    pub summary: Option<String>,
    /// The event status (e.g. "confirmed", "cancelled").
    pub status: Option<String>,
}

impl RawEvent {
    /// Creates a new raw event with the required fields.
    pub fn new(id: impl Into<String>, start: RawEventTime, end: RawEventTime) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            summary: None,
            status: None,
        }
    }

    /// Returns true if the event is cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(|s| s.eq_ignore_ascii_case("cancelled"))
    }

    /// Returns true if this is an all-day event.
    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builder method to set the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn all_day_follows_start() {
        let event = RawEvent::new("a", RawEventTime::Date(date()), RawEventTime::Date(date()));
        assert!(event.is_all_day());

        let floating = RawEventTime::Floating(date().and_hms_opt(9, 0, 0).unwrap());
        let event = RawEvent::new("b", floating, floating);
        assert!(!event.is_all_day());
    }

    #[test]
    fn cancelled_status_is_case_insensitive() {
        let start = RawEventTime::Date(date());
        let event = RawEvent::new("a", start, start).with_status("CANCELLED");
        assert!(event.is_cancelled());

        let event = RawEvent::new("b", start, start).with_status("confirmed");
        assert!(!event.is_cancelled());
        assert!(!RawEvent::new("c", start, start).is_cancelled());
    }
}
