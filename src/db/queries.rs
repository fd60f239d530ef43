// Database query helpers for SurrealDB.
//
// This is the persistence collaborator behind the schedule resource. All
// lookups key on `schedule_id`, the public identifier assigned on insert;
// list queries return rows in insertion order.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use uuid::Uuid;

use crate::db::schema::*;

pub struct ScheduleDao;

impl ScheduleDao {
    /// Insert a new schedule slot and return the stored record.
    ///
    /// The public identifier is assigned here, never by the caller.
    pub async fn add_schedule(
        db: &Surreal<Any>,
        data: &ScheduleCreate,
    ) -> Result<ScheduleRecord> {
        let mut res = db
            .query(
                r#"
                CREATE schedule SET
                    schedule_id = $schedule_id,
                    venue_id = $venue_id,
                    date = $date,
                    start_time = $start_time,
                    duration_minutes = $duration_minutes,
                    title = $title,
                    speakers = $speakers,
                    track = $track,
                    created_at = time::now()
                "#,
            )
            .bind(("schedule_id", Uuid::new_v4().to_string()))
            .bind(("venue_id", data.venue_id.clone()))
            .bind(("date", data.date))
            .bind(("start_time", data.start_time))
            .bind(("duration_minutes", data.duration_minutes))
            .bind(("title", data.title.clone()))
            .bind(("speakers", data.speakers.clone()))
            .bind(("track", data.track.clone()))
            .await?;

        let created: Option<ScheduleRecord> = res.take(0)?;
        created.ok_or_else(|| anyhow!("failed to create schedule record"))
    }

    pub async fn find_by_id(
        db: &Surreal<Any>,
        schedule_id: &str,
    ) -> Result<Option<ScheduleRecord>> {
        let mut res = db
            .query(
                r#"
                SELECT * FROM schedule
                WHERE schedule_id = $schedule_id
                LIMIT 1
                "#,
            )
            .bind(("schedule_id", schedule_id.to_string()))
            .await?;

        let schedule: Option<ScheduleRecord> = res.take(0)?;
        Ok(schedule)
    }

    pub async fn get_all_schedules(db: &Surreal<Any>) -> Result<Vec<ScheduleRecord>> {
        let mut res = db
            .query("SELECT * FROM schedule ORDER BY created_at ASC")
            .await?;

        let schedules: Vec<ScheduleRecord> = res.take(0)?;
        Ok(schedules)
    }

    pub async fn find_by_venue(
        db: &Surreal<Any>,
        venue_id: &str,
    ) -> Result<Vec<ScheduleRecord>> {
        let mut res = db
            .query(
                r#"
                SELECT * FROM schedule
                WHERE venue_id = $venue_id
                ORDER BY created_at ASC
                "#,
            )
            .bind(("venue_id", venue_id.to_string()))
            .await?;

        let schedules: Vec<ScheduleRecord> = res.take(0)?;
        Ok(schedules)
    }

    pub async fn find_by_date(
        db: &Surreal<Any>,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleRecord>> {
        let mut res = db
            .query(
                r#"
                SELECT * FROM schedule
                WHERE date = $date
                ORDER BY created_at ASC
                "#,
            )
            .bind(("date", date))
            .await?;

        let schedules: Vec<ScheduleRecord> = res.take(0)?;
        Ok(schedules)
    }

    /// Delete a slot by its public identifier.
    ///
    /// Deleting an id that does not exist is a no-op, so the operation is
    /// idempotent.
    pub async fn delete_schedule(db: &Surreal<Any>, schedule_id: &str) -> Result<()> {
        db.query("DELETE FROM schedule WHERE schedule_id = $schedule_id")
            .bind(("schedule_id", schedule_id.to_string()))
            .await?;
        Ok(())
    }
}
