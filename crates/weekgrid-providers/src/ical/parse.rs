//! iCalendar feed parsing.
//!
//! A deliberately small reader: the payload is split into `VEVENT` blocks and
//! each block is scanned line by line for `UID`, `SUMMARY`, `STATUS`,
//! `DTSTART` and `DTEND`. Folded lines are not joined and escaped text is not
//! unescaped. Values are read at fixed offsets:
//!
//! - `20240101` - all-day date
//! - `20240103T090000` - floating (local) date-time
//! - `20240103T090000Z` - UTC date-time
//!
//! A block without a usable start or end is skipped with a warning; it never
//! fails the whole feed. So is a block whose start and end disagree on being
//! a date or a date-time.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use tracing::{debug, warn};

use crate::raw_event::{RawEvent, RawEventTime};

const BLOCK_START: &str = "BEGIN:VEVENT";
const BLOCK_END: &str = "END:VEVENT";

/// `NAME[;PARAM=...]:VALUE`
static PROPERTY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z-]+)((?:;[^:]*)?):(.*)$").expect("property regex is valid")
});

/// Parses every `VEVENT` block of a feed.
///
/// Blocks are numbered from zero in document order; a block without a `UID`
/// gets the id `event-<n>`.
pub fn parse_feed(text: &str) -> Vec<RawEvent> {
    let events: Vec<RawEvent> = text
        .split(BLOCK_START)
        .skip(1)
        .enumerate()
        .filter_map(|(index, chunk)| {
            let block = chunk.split(BLOCK_END).next().unwrap_or(chunk);
            parse_block(index, block)
        })
        .collect();

    debug!(count = events.len(), "Parsed iCalendar feed");
    events
}

#[derive(Default)]
struct BlockFields<'a> {
    uid: Option<&'a str>,
    summary: Option<&'a str>,
    status: Option<&'a str>,
    start: Option<&'a str>,
    end: Option<&'a str>,
}

fn parse_block(index: usize, block: &str) -> Option<RawEvent> {
    let mut fields = BlockFields::default();

    for line in block.lines() {
        let line = line.trim_end_matches('\r');
        let Some(caps) = PROPERTY_LINE.captures(line) else {
            continue;
        };
        let (Some(name), Some(value)) = (caps.get(1), caps.get(3)) else {
            continue;
        };
        // First occurrence wins.
        let slot = match name.as_str() {
            "UID" => &mut fields.uid,
            "SUMMARY" => &mut fields.summary,
            "STATUS" => &mut fields.status,
            "DTSTART" => &mut fields.start,
            "DTEND" => &mut fields.end,
            _ => continue,
        };
        slot.get_or_insert(value.as_str());
    }

    let Some((start, end)) = fields.start.zip(fields.end) else {
        warn!(index, "Skipping VEVENT without DTSTART/DTEND");
        return None;
    };

    let (Some(start), Some(end)) = (parse_value(start), parse_value(end)) else {
        warn!(index, start, end, "Skipping VEVENT with unreadable date value");
        return None;
    };

    if start.is_all_day() != end.is_all_day() {
        warn!(index, start = ?start, end = ?end, "Skipping VEVENT mixing date and date-time");
        return None;
    }

    let id = match fields.uid.map(str::trim).filter(|uid| !uid.is_empty()) {
        Some(uid) => uid.to_string(),
        None => format!("event-{}", index),
    };

    let mut raw = RawEvent::new(id, start, end);
    if let Some(summary) = fields.summary {
        raw = raw.with_summary(summary.trim());
    }
    if let Some(status) = fields.status {
        raw = raw.with_status(status.trim());
    }

    debug!(id = %raw.id, start = ?raw.start, "Parsed VEVENT");
    Some(raw)
}

/// Reads a `DTSTART`/`DTEND` value.
///
/// Eight characters make a date; anything longer must be
/// `YYYYMMDDTHHMMSS` with an optional trailing `Z`.
pub fn parse_value(value: &str) -> Option<RawEventTime> {
    let value = value.trim();
    let date = parse_date(value)?;

    if value.len() == 8 {
        return Some(RawEventTime::Date(date));
    }

    if value.get(8..9)? != "T" {
        return None;
    }
    let hour = value.get(9..11)?.parse().ok()?;
    let minute = value.get(11..13)?.parse().ok()?;
    let second = value.get(13..15)?.parse().ok()?;
    let naive: NaiveDateTime = date.and_hms_opt(hour, minute, second)?;

    match value.get(15..)? {
        "" => Some(RawEventTime::Floating(naive)),
        "Z" => Some(RawEventTime::Utc(Utc.from_utc_datetime(&naive))),
        _ => None,
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let year = value.get(0..4)?.parse().ok()?;
    let month = value.get(4..6)?.parse().ok()?;
    let day = value.get(6..8)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
