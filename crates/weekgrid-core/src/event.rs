//! The canonical event model.
//!
//! [`CanonicalEvent`] is the source-agnostic representation every adapter
//! produces and every downstream stage (filtering, caching, layout,
//! rendering) consumes.

use serde::{Deserialize, Serialize};

use crate::time::EventTime;

/// Title used when the source provides none (or only whitespace).
pub const UNTITLED_EVENT: &str = "(No title)";

/// A calendar event after normalization.
///
/// Serialized with camelCase keys (`allDay`) because this is the shape handed
/// to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEvent {
    /// Unique identifier for the event within its source.
    pub id: String,
    /// The event title.
    pub title: String,
    /// When the event starts.
    pub start: EventTime,
    /// When the event ends. Never before `start`.
    pub end: EventTime,
    /// Whether the event has no time-of-day component.
    pub all_day: bool,
}

impl CanonicalEvent {
    /// Creates a canonical event.
    ///
    /// A missing or blank title becomes [`UNTITLED_EVENT`]. An inverted range
    /// is clamped so that `end == start`. `all_day` follows the start value.
    pub fn new(
        id: impl Into<String>,
        title: Option<impl Into<String>>,
        start: EventTime,
        end: EventTime,
    ) -> Self {
        let title: Option<String> = title.map(Into::into);
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED_EVENT.to_string());
        let end = if end < start { start } else { end };

        Self {
            id: id.into(),
            title,
            all_day: start.is_all_day(),
            start,
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn title_defaults_to_placeholder() {
        let start = EventTime::from_date(date(2024, 1, 1));
        let event = CanonicalEvent::new("a", None::<String>, start, start);
        assert_eq!(event.title, UNTITLED_EVENT);

        let event = CanonicalEvent::new("b", Some("   "), start, start);
        assert_eq!(event.title, UNTITLED_EVENT);

        let event = CanonicalEvent::new("c", Some("Holiday"), start, start);
        assert_eq!(event.title, "Holiday");
    }

    #[test]
    fn all_day_follows_start() {
        let all_day = CanonicalEvent::new(
            "a",
            Some("Holiday"),
            EventTime::from_date(date(2024, 1, 1)),
            EventTime::from_date(date(2024, 1, 2)),
        );
        assert!(all_day.all_day);

        let timed = CanonicalEvent::new(
            "b",
            Some("Sync"),
            EventTime::from_local(date(2024, 1, 3).and_hms_opt(9, 0, 0).unwrap()),
            EventTime::from_local(date(2024, 1, 3).and_hms_opt(10, 0, 0).unwrap()),
        );
        assert!(!timed.all_day);
    }

    #[test]
    fn inverted_range_is_clamped() {
        let start = EventTime::from_local(date(2024, 1, 3).and_hms_opt(10, 0, 0).unwrap());
        let end = EventTime::from_local(date(2024, 1, 3).and_hms_opt(9, 0, 0).unwrap());
        let event = CanonicalEvent::new("a", Some("Backwards"), start, end);
        assert_eq!(event.start, start);
        assert_eq!(event.end, start);
    }

    #[test]
    fn serializes_render_shape() {
        let event = CanonicalEvent::new(
            "evt-1",
            Some("Holiday"),
            EventTime::from_date(date(2024, 1, 1)),
            EventTime::from_date(date(2024, 1, 2)),
        );
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["id"], "evt-1");
        assert_eq!(json["title"], "Holiday");
        assert_eq!(json["start"], "2024-01-01");
        assert_eq!(json["end"], "2024-01-02");
        assert_eq!(json["allDay"], true);
    }
}
