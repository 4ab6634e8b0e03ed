//! Time types for calendar events.
//!
//! This module provides [`EventTime`] for representing event start/end times
//! (which may be either a local datetime or an all-day date), and
//! [`WeekWindow`] for the Monday-to-Monday interval every fetch, filter and
//! layout is scoped to.
//!
//! Everything here lives in the process-local calendar. Values coming from
//! sources that carry an offset are converted to local time at the adapter
//! boundary; no other timezone arithmetic happens.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::event::CanonicalEvent;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Represents the time of a calendar event.
///
/// Calendar events can have two types of times:
/// - **DateTime**: A wall-clock time in the local frame
/// - **AllDay**: A date without a specific time (all-day events)
///
/// Serialized as `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTime {
    /// A local wall-clock datetime.
    DateTime(NaiveDateTime),
    /// An all-day event date (no specific time).
    AllDay(NaiveDate),
}

impl EventTime {
    /// Creates a new `EventTime::DateTime` from a local wall-clock value.
    pub fn from_local(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }

    /// Creates a new `EventTime::DateTime` from a datetime in any timezone,
    /// converted to the local frame.
    pub fn from_zoned<Tz: TimeZone>(dt: DateTime<Tz>) -> Self {
        Self::DateTime(dt.with_timezone(&Local).naive_local())
    }

    /// Creates a new `EventTime::DateTime` from a UTC datetime.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::from_zoned(dt)
    }

    /// Creates a new `EventTime::AllDay` from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Returns `true` if this is an all-day event time.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns the date portion of this event time.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::DateTime(dt) => dt.date(),
            Self::AllDay(date) => *date,
        }
    }

    /// Returns the time of day, or `None` for all-day values.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        match self {
            Self::DateTime(dt) => Some(dt.time()),
            Self::AllDay(_) => None,
        }
    }

    /// Converts to a local wall-clock datetime for comparison purposes.
    ///
    /// All-day values map to midnight of their date.
    pub fn to_naive_datetime(&self) -> NaiveDateTime {
        match self {
            Self::DateTime(dt) => *dt,
            Self::AllDay(date) => date.and_time(NaiveTime::MIN),
        }
    }
}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_naive_datetime().cmp(&other.to_naive_datetime())
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Self::AllDay(date) => write!(f, "{}", date.format(DATE_FORMAT)),
        }
    }
}

impl FromStr for EventTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 10 {
            NaiveDate::parse_from_str(s, DATE_FORMAT).map(Self::AllDay)
        } else {
            NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).map(Self::DateTime)
        }
    }
}

impl Serialize for EventTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EventTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The local week an event set is scoped to.
///
/// Spans Monday 00:00:00 through the last millisecond before the following
/// Monday; both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    /// Monday at local midnight.
    pub start: DateTime<Local>,
    /// One millisecond before the following Monday's local midnight.
    pub end: DateTime<Local>,
}

impl WeekWindow {
    /// Computes the week containing the current wall-clock time.
    pub fn current() -> Self {
        Self::containing(Local::now())
    }

    /// Computes the week containing `now`.
    pub fn containing(now: DateTime<Local>) -> Self {
        let (start, end) = week_bounds(&Local, now.date_naive());
        Self { start, end }
    }

    /// Checks if an instant falls within this window (both bounds inclusive).
    pub fn contains(&self, instant: DateTime<Local>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Checks if a local wall-clock time falls within this window.
    pub fn contains_naive(&self, dt: NaiveDateTime) -> bool {
        self.start.naive_local() <= dt && dt <= self.end.naive_local()
    }

    /// Checks if an event time falls within this window.
    ///
    /// All-day values are checked at local midnight of their date.
    pub fn contains_event_time(&self, et: &EventTime) -> bool {
        self.contains_naive(et.to_naive_datetime())
    }

    /// Returns the Monday this window starts on.
    pub fn first_day(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Returns the seven dates of the window, Monday first.
    pub fn days(&self) -> [NaiveDate; 7] {
        let monday = self.first_day();
        std::array::from_fn(|i| monday + Duration::days(i as i64))
    }

    /// Returns the column index (0 = Monday) of `date`, if inside the window.
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.first_day()).num_days();
        (0..7).contains(&offset).then_some(offset as usize)
    }

    /// Keeps the events whose start falls within this window.
    ///
    /// Order is preserved, so filtering an already-filtered list is a no-op.
    pub fn filter_events<I>(&self, events: I) -> Vec<CanonicalEvent>
    where
        I: IntoIterator<Item = CanonicalEvent>,
    {
        events
            .into_iter()
            .filter(|event| self.contains_event_time(&event.start))
            .collect()
    }

    /// Window start as a UTC instant (for upstream query parameters).
    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    /// Window end as a UTC instant (for upstream query parameters).
    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }
}

/// Bounds of the week containing `today`, in `tz`.
///
/// `end` is the last millisecond before the following Monday's midnight, so a
/// week with a DST switch is an hour shorter or longer than 168 hours.
fn week_bounds<Tz: TimeZone>(tz: &Tz, today: NaiveDate) -> (DateTime<Tz>, DateTime<Tz>) {
    // Sunday belongs to the week that started six days earlier.
    let weekday = i64::from(today.weekday().num_days_from_sunday());
    let shift = if weekday == 0 { -6 } else { 1 - weekday };
    let monday = today + Duration::days(shift);

    let start = midnight_in(tz, monday);
    let end = midnight_in(tz, monday + Duration::days(7)) - Duration::milliseconds(1);
    (start, end)
}

/// Resolves midnight of `date` in `tz`.
///
/// Ambiguous midnights pick the earlier instant. A midnight swallowed by a DST
/// gap resolves to the first valid quarter hour after it.
fn midnight_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    if let Some(dt) = tz.from_local_datetime(&midnight).earliest() {
        return dt;
    }
    (1..=8)
        .find_map(|quarter| {
            tz.from_local_datetime(&(midnight + Duration::minutes(15 * quarter)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}
