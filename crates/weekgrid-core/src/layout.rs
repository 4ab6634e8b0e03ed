//! Weekly grid layout.
//!
//! [`GridLayoutEngine`] turns a list of [`CanonicalEvent`]s and a
//! [`WeekWindow`] into a pixel-free [`GridLayout`]: seven day columns, each
//! with an all-day lane and a timed lane whose slots carry a half-hour row
//! offset and height relative to the grid origin.
//!
//! Simultaneous timed events are not tiled side by side; they share the same
//! offset and the renderer draws them stacked.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::event::CanonicalEvent;
use crate::time::WeekWindow;

/// Half-hour rows per hour.
const ROWS_PER_HOUR: i32 = 2;

/// Grid geometry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Hour of day mapped to row 0.
    pub origin_hour: u32,
    /// Hour of day where the visible grid ends (exclusive).
    pub end_hour: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin_hour: Self::DEFAULT_ORIGIN_HOUR,
            end_hour: Self::DEFAULT_END_HOUR,
        }
    }
}

impl GridConfig {
    /// Default grid origin.
    pub const DEFAULT_ORIGIN_HOUR: u32 = 7;

    /// Default grid end.
    pub const DEFAULT_END_HOUR: u32 = 22;

    /// Creates a grid configuration.
    pub fn new(origin_hour: u32, end_hour: u32) -> Self {
        Self {
            origin_hour,
            end_hour,
        }
    }

    /// Builder: set the origin hour.
    pub fn with_origin_hour(mut self, hour: u32) -> Self {
        self.origin_hour = hour;
        self
    }

    /// Builder: set the end hour.
    pub fn with_end_hour(mut self, hour: u32) -> Self {
        self.end_hour = hour;
        self
    }

    /// Number of half-hour rows between origin and end.
    pub fn row_count(&self) -> u32 {
        self.end_hour.saturating_sub(self.origin_hour) * ROWS_PER_HOUR as u32
    }

    /// Row index of a time of day. Negative before the origin.
    pub fn row_of(&self, time: NaiveTime) -> i32 {
        let hours = time.hour() as i32 - self.origin_hour as i32;
        let half = if time.minute() >= 30 { 1 } else { 0 };
        hours * ROWS_PER_HOUR + half
    }
}

/// A timed event placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedSlot {
    /// The placed event.
    pub event: CanonicalEvent,
    /// First row occupied, relative to the grid origin.
    pub offset: i32,
    /// Rows occupied, at least 1.
    pub height: i32,
}

/// One day of the week grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayColumn {
    /// The calendar date of this column.
    pub date: NaiveDate,
    /// All-day events, in input order.
    pub all_day: Vec<CanonicalEvent>,
    /// Timed events ordered by offset.
    pub timed: Vec<TimedSlot>,
}

impl DayColumn {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            all_day: Vec::new(),
            timed: Vec::new(),
        }
    }

    /// Returns true if no event landed in this column.
    pub fn is_empty(&self) -> bool {
        self.all_day.is_empty() && self.timed.is_empty()
    }
}

/// The laid-out week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    /// Geometry the offsets were computed against.
    pub config: GridConfig,
    /// Monday first.
    pub days: Vec<DayColumn>,
}

impl GridLayout {
    /// Total number of events placed on the grid.
    pub fn event_count(&self) -> usize {
        self.days
            .iter()
            .map(|day| day.all_day.len() + day.timed.len())
            .sum()
    }
}

/// Assigns events to day columns and time rows.
#[derive(Debug, Clone, Default)]
pub struct GridLayoutEngine {
    config: GridConfig,
}

impl GridLayoutEngine {
    /// Creates an engine with the given geometry.
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    /// Returns the geometry in use.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Computes `(offset, height)` for a timed event.
    ///
    /// Returns `None` for all-day events. Height never drops below one row,
    /// even for zero-length or inverted ranges.
    pub fn slot_for(&self, event: &CanonicalEvent) -> Option<(i32, i32)> {
        let start = event.start.time_of_day()?;
        let end = event.end.to_naive_datetime().time();

        let offset = self.config.row_of(start);
        let end_offset = self.config.row_of(end);
        Some((offset, (end_offset - offset).max(1)))
    }

    /// Lays out `events` over the seven days of `window`.
    ///
    /// Events whose start date is outside the window are left out.
    pub fn layout(&self, events: &[CanonicalEvent], window: &WeekWindow) -> GridLayout {
        let mut days: Vec<DayColumn> = window.days().into_iter().map(DayColumn::new).collect();
        let mut dropped = 0usize;

        for event in events {
            let Some(index) = window.day_index(event.start.date()) else {
                trace!(id = %event.id, start = %event.start, "Event outside week window");
                dropped += 1;
                continue;
            };

            let column = &mut days[index];
            match self.slot_for(event) {
                None => column.all_day.push(event.clone()),
                Some((offset, height)) => column.timed.push(TimedSlot {
                    event: event.clone(),
                    offset,
                    height,
                }),
            }
        }

        for column in &mut days {
            column.timed.sort_by_key(|slot| slot.offset);
        }

        let layout = GridLayout {
            config: self.config,
            days,
        };
        debug!(
            placed = layout.event_count(),
            dropped = dropped,
            origin_hour = self.config.origin_hour,
            "Laid out week grid"
        );
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::EventTime;
    use chrono::{Local, NaiveDateTime, TimeZone};

    fn window() -> WeekWindow {
        // Wednesday of the week starting Monday 2024-01-01.
        WeekWindow::containing(Local.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap())
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn timed(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> CanonicalEvent {
        CanonicalEvent::new(
            id,
            Some(id),
            EventTime::from_local(start),
            EventTime::from_local(end),
        )
    }

    fn all_day(id: &str, d: u32) -> CanonicalEvent {
        let date = NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        CanonicalEvent::new(
            id,
            Some(id),
            EventTime::from_date(date),
            EventTime::from_date(date.succ_opt().unwrap()),
        )
    }

    #[test]
    fn nine_to_ten_from_seven_origin() {
        let engine = GridLayoutEngine::new(GridConfig::new(7, 22));
        let event = timed("sync", at(3, 9, 0), at(3, 10, 0));
        assert_eq!(engine.slot_for(&event), Some((4, 2)));
    }

    #[test]
    fn half_hour_rounding() {
        let engine = GridLayoutEngine::new(GridConfig::new(7, 22));

        // 09:30 -> row 5, 10:45 -> row 7.
        let event = timed("a", at(3, 9, 30), at(3, 10, 45));
        assert_eq!(engine.slot_for(&event), Some((5, 2)));

        // 09:29 rounds down to row 4.
        let event = timed("b", at(3, 9, 29), at(3, 9, 59));
        assert_eq!(engine.slot_for(&event), Some((4, 1)));
    }

    #[test]
    fn height_is_never_zero() {
        let engine = GridLayoutEngine::default();

        let zero = timed("zero", at(3, 9, 0), at(3, 9, 0));
        assert_eq!(engine.slot_for(&zero), Some((4, 1)));

        // Ends after midnight: end row is before the start row.
        let late = timed("late", at(3, 23, 0), at(4, 1, 0));
        assert_eq!(engine.slot_for(&late).map(|(_, h)| h), Some(1));
    }

    #[test]
    fn before_origin_is_negative() {
        let engine = GridLayoutEngine::new(GridConfig::new(7, 22));
        let early = timed("early", at(3, 6, 0), at(3, 7, 30));
        assert_eq!(engine.slot_for(&early), Some((-2, 3)));
    }

    #[test]
    fn all_day_has_no_slot() {
        let engine = GridLayoutEngine::default();
        assert_eq!(engine.slot_for(&all_day("holiday", 1)), None);
    }

    #[test]
    fn buckets_by_start_date() {
        let engine = GridLayoutEngine::default();
        let events = vec![
            all_day("new-year", 1),
            timed("standup", at(2, 9, 0), at(2, 9, 15)),
            timed("review", at(5, 14, 0), at(5, 15, 30)),
            all_day("offsite", 5),
        ];

        let layout = engine.layout(&events, &window());

        assert_eq!(layout.days.len(), 7);
        assert_eq!(layout.event_count(), 4);
        assert_eq!(layout.days[0].all_day[0].id, "new-year");
        assert_eq!(layout.days[1].timed[0].event.id, "standup");
        assert_eq!(layout.days[4].timed[0].event.id, "review");
        assert_eq!(layout.days[4].timed[0].offset, 14);
        assert_eq!(layout.days[4].timed[0].height, 3);
        assert_eq!(layout.days[4].all_day[0].id, "offsite");
        assert!(layout.days[6].is_empty());
    }

    #[test]
    fn drops_events_outside_window() {
        let engine = GridLayoutEngine::default();
        let new_years_eve = NaiveDate::from_ymd_opt(2023, 12, 31)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let events = vec![
            timed("last-week", new_years_eve, at(1, 10, 0)),
            timed("monday", at(1, 9, 0), at(1, 10, 0)),
            timed("next-week", at(8, 9, 0), at(8, 10, 0)),
        ];

        let layout = engine.layout(&events, &window());
        assert_eq!(layout.event_count(), 1);
        assert_eq!(layout.days[0].timed[0].event.id, "monday");
    }

    #[test]
    fn overlapping_events_share_offset() {
        let engine = GridLayoutEngine::default();
        let events = vec![
            timed("b", at(3, 10, 0), at(3, 11, 0)),
            timed("a", at(3, 9, 0), at(3, 10, 0)),
            timed("c", at(3, 9, 0), at(3, 9, 30)),
        ];

        let layout = engine.layout(&events, &window());
        let slots = &layout.days[2].timed;

        let ids: Vec<_> = slots.iter().map(|s| s.event.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
        assert_eq!(slots[0].offset, slots[1].offset);
    }

    #[test]
    fn stacks_all_day_lane() {
        let engine = GridLayoutEngine::default();
        let events = vec![all_day("one", 3), all_day("two", 3), all_day("three", 4)];

        let layout = engine.layout(&events, &window());
        assert_eq!(layout.days[2].all_day.len(), 2);
        assert_eq!(layout.days[3].all_day.len(), 1);
        assert_eq!(layout.days[2].all_day[1].id, "two");
    }

    #[test]
    fn row_count() {
        assert_eq!(GridConfig::new(7, 22).row_count(), 30);
        assert_eq!(GridConfig::new(22, 7).row_count(), 0);
        assert_eq!(GridConfig::default().with_origin_hour(8).row_count(), 28);
    }
}
