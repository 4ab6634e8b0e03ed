//! RawEvent to CanonicalEvent conversion.
//!
//! Normalization maps every source time into the local frame, applies the
//! title placeholder, and drops events the source marked as cancelled.

use tracing::trace;
use weekgrid_core::{CanonicalEvent, EventTime};

use crate::raw_event::{RawEvent, RawEventTime};

/// Converts a [`RawEvent`] to a [`CanonicalEvent`].
pub fn normalize_event(raw: &RawEvent) -> CanonicalEvent {
    CanonicalEvent::new(
        &raw.id,
        raw.summary.as_deref(),
        convert_time(&raw.start),
        convert_time(&raw.end),
    )
}

/// Converts a batch of raw events, skipping cancelled ones.
pub fn normalize_events(raw: &[RawEvent]) -> Vec<CanonicalEvent> {
    raw.iter()
        .filter(|event| {
            let keep = !event.is_cancelled();
            if !keep {
                trace!(id = %event.id, "Dropping cancelled event");
            }
            keep
        })
        .map(normalize_event)
        .collect()
}

fn convert_time(raw: &RawEventTime) -> EventTime {
    match raw {
        RawEventTime::Utc(dt) => EventTime::from_utc(*dt),
        RawEventTime::Floating(dt) => EventTime::from_local(*dt),
        RawEventTime::Date(date) => EventTime::from_date(*date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate, TimeZone, Utc};
    use weekgrid_core::UNTITLED_EVENT;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn all_day_event() {
        let raw = RawEvent::new(
            "holiday",
            RawEventTime::Date(date(1)),
            RawEventTime::Date(date(2)),
        )
        .with_summary("New Year");

        let event = normalize_event(&raw);
        assert!(event.all_day);
        assert_eq!(event.title, "New Year");
        assert_eq!(event.start.to_string(), "2024-01-01");
        assert_eq!(event.end.to_string(), "2024-01-02");
    }

    #[test]
    fn floating_time_is_kept_as_local() {
        let start = date(3).and_hms_opt(9, 0, 0).unwrap();
        let end = date(3).and_hms_opt(10, 0, 0).unwrap();
        let raw = RawEvent::new(
            "sync",
            RawEventTime::Floating(start),
            RawEventTime::Floating(end),
        );

        let event = normalize_event(&raw);
        assert!(!event.all_day);
        assert_eq!(event.start.to_string(), "2024-01-03T09:00:00");
        assert_eq!(event.title, UNTITLED_EVENT);
    }

    #[test]
    fn utc_time_is_converted_to_local() {
        let start = Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap();
        let raw = RawEvent::new("utc", RawEventTime::Utc(start), RawEventTime::Utc(start));

        let event = normalize_event(&raw);
        assert_eq!(
            event.start.to_naive_datetime(),
            start.with_timezone(&Local).naive_local()
        );
    }

    #[test]
    fn cancelled_events_are_dropped() {
        let start = RawEventTime::Date(date(1));
        let raw = vec![
            RawEvent::new("kept", start, start),
            RawEvent::new("gone", start, start).with_status("cancelled"),
        ];

        let events = normalize_events(&raw);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "kept");
    }
}
