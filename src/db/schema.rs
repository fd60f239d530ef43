use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Datetime;

use crate::model::Schedule;

/// Persisted representation of a schedule slot in SurrealDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRecord {
    /// Public identifier for this slot, assigned by the DAO on insert.
    /// This is the id clients use on the wire; the underlying record key
    /// stays internal.
    pub schedule_id: String,
    /// Venue this slot belongs to.
    pub venue_id: String,
    /// Calendar date of the slot.
    pub date: NaiveDate,
    /// Time of day the slot begins.
    pub start_time: NaiveTime,
    /// Slot length in whole minutes.
    pub duration_minutes: u32,
    /// Opaque session title, if provided by the caller.
    pub title: Option<String>,
    /// Opaque speaker references.
    #[serde(default)]
    pub speakers: Vec<String>,
    /// Opaque track label, if provided by the caller.
    pub track: Option<String>,
    /// When this record was created.
    pub created_at: Option<Datetime>,
}

impl ScheduleRecord {
    /// Convert the persisted record back into the wire-level model.
    pub fn into_model(self) -> Schedule {
        Schedule {
            id: Some(self.schedule_id),
            venue_id: self.venue_id,
            date: self.date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            title: self.title,
            speakers: self.speakers,
            track: self.track,
        }
    }
}

/// Payload used when inserting a new schedule into the database.
///
/// Deliberately has no id field: identifiers are assigned by the DAO and
/// never supplied by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleCreate {
    /// Venue this slot belongs to.
    pub venue_id: String,
    /// Calendar date of the slot.
    pub date: NaiveDate,
    /// Time of day the slot begins.
    pub start_time: NaiveTime,
    /// Slot length in whole minutes.
    pub duration_minutes: u32,
    /// Opaque session title.
    pub title: Option<String>,
    /// Opaque speaker references.
    pub speakers: Vec<String>,
    /// Opaque track label.
    pub track: Option<String>,
}

impl ScheduleCreate {
    /// Build an insert payload from an inbound model, dropping any
    /// client-supplied id.
    pub fn from_model(schedule: &Schedule) -> Self {
        Self {
            venue_id: schedule.venue_id.clone(),
            date: schedule.date,
            start_time: schedule.start_time,
            duration_minutes: schedule.duration_minutes,
            title: schedule.title.clone(),
            speakers: schedule.speakers.clone(),
            track: schedule.track.clone(),
        }
    }
}
