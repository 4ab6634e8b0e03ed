//! The payload handed to the renderer.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use weekgrid_core::CanonicalEvent;

/// Events of one week plus the instant the week starts at.
///
/// Serializes as `{"events": [...], "startDate": "<RFC 3339>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekData {
    /// Events whose start falls within the week.
    pub events: Vec<CanonicalEvent>,
    /// Start of the week, or the load time when nothing could be fetched.
    pub start_date: DateTime<Local>,
}

impl WeekData {
    /// Creates a payload.
    pub fn new(events: Vec<CanonicalEvent>, start_date: DateTime<Local>) -> Self {
        Self { events, start_date }
    }

    /// A payload with no events.
    pub fn empty(start_date: DateTime<Local>) -> Self {
        Self::new(Vec::new(), start_date)
    }

    /// Returns true if there are no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
