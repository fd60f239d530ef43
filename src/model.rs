use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A bookable conference slot: a venue, a calendar date, and a time window.
///
/// The window end is always derived as `start_time + duration` and is never
/// stored separately. Everything besides the venue/date/time fields is
/// opaque pass-through payload that no query logic interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Stable identifier assigned by the persistence layer on creation.
    /// Absent (or ignored) on create requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Venue this slot belongs to.
    pub venue_id: String,
    /// Calendar date of the slot. No time zone handling.
    pub date: NaiveDate,
    /// Time of day the slot begins.
    pub start_time: NaiveTime,
    /// Slot length in whole minutes.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    /// Session title, if any. Opaque to all logic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Speaker references, if any. Opaque to all logic.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub speakers: Vec<String>,
    /// Track label, if any. Opaque to all logic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
}

impl Schedule {
    /// End of the slot's time window.
    ///
    /// Wraps past midnight the same way the addition on a plain time of day
    /// always does; a slot is never longer than a day.
    pub fn end_time(&self) -> NaiveTime {
        self.start_time + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Whether the slot's window strictly contains `instant`.
    ///
    /// Both bounds are exclusive: a slot starting or ending exactly at
    /// `instant` is not active. A zero-length slot is never active.
    pub fn is_active_at(&self, instant: NaiveTime) -> bool {
        self.start_time < instant && self.end_time() > instant
    }
}
