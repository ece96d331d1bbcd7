//! Meeting record persistence.
//!
//! CRUD operations for the `meetings` table. Raw SQL with rusqlite, no ORM.
//! Extracted items (decisions, action items, follow-ups) are stored as JSON
//! text columns; audio bytes never enter the database, only the file path.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::meeting::model::{ActionItem, Decision, FollowUp, Meeting};
use crate::meeting::status::MeetingPhase;

/// Repository for meeting records.
pub struct MeetingRepository;

impl MeetingRepository {
    /// Insert a new meeting record.
    pub fn insert(conn: &Connection, meeting: &Meeting, audio_path: Option<&str>) -> Result<()> {
        conn.execute(
            "INSERT INTO meetings (id, title, meeting_date, duration_seconds, status, \
             audio_path, transcript, summary, decisions, action_items, follow_ups, error) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                meeting.id,
                meeting.title,
                meeting.date.to_rfc3339(),
                meeting.duration_seconds as i64,
                meeting.status.as_str(),
                audio_path,
                meeting.transcript,
                meeting.summary,
                serde_json::to_string(&meeting.decisions)?,
                serde_json::to_string(&meeting.action_items)?,
                serde_json::to_string(&meeting.follow_ups)?,
                meeting.error,
            ],
        )
        .context("Failed to insert meeting")?;

        Ok(())
    }

    /// Persist the mutable fields of a meeting snapshot.
    pub fn update(conn: &Connection, meeting: &Meeting) -> Result<()> {
        let updated = conn
            .execute(
                "UPDATE meetings SET title = ?1, duration_seconds = ?2, status = ?3, \
                 transcript = ?4, summary = ?5, decisions = ?6, action_items = ?7, \
                 follow_ups = ?8, error = ?9 WHERE id = ?10",
                params![
                    meeting.title,
                    meeting.duration_seconds as i64,
                    meeting.status.as_str(),
                    meeting.transcript,
                    meeting.summary,
                    serde_json::to_string(&meeting.decisions)?,
                    serde_json::to_string(&meeting.action_items)?,
                    serde_json::to_string(&meeting.follow_ups)?,
                    meeting.error,
                    meeting.id,
                ],
            )
            .context("Failed to update meeting")?;

        if updated == 0 {
            anyhow::bail!("No meeting with id {}", meeting.id);
        }

        Ok(())
    }

    /// Get a meeting by ID.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<Meeting>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, title, meeting_date, duration_seconds, status, transcript, \
                 summary, decisions, action_items, follow_ups, error \
                 FROM meetings WHERE id = ?1",
            )
            .context("Failed to prepare meeting query")?;

        let mut rows = stmt
            .query_map(params![id], Self::row_to_meeting)
            .context("Failed to query meeting")?;

        match rows.next() {
            Some(Ok(meeting)) => Ok(Some(meeting)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// List meetings, newest first.
    pub fn list(conn: &Connection, limit: usize) -> Result<Vec<Meeting>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, title, meeting_date, duration_seconds, status, transcript, \
                 summary, decisions, action_items, follow_ups, error \
                 FROM meetings ORDER BY created_at DESC, rowid DESC LIMIT ?1",
            )
            .context("Failed to prepare meetings list query")?;

        let rows = stmt
            .query_map(params![limit as i64], Self::row_to_meeting)
            .context("Failed to list meetings")?;

        let mut meetings = Vec::new();
        for row in rows {
            meetings.push(row?);
        }

        Ok(meetings)
    }

    /// Delete a meeting. Returns true if a row was removed.
    pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let deleted = conn
            .execute("DELETE FROM meetings WHERE id = ?1", params![id])
            .context("Failed to delete meeting")?;
        Ok(deleted > 0)
    }

    /// Toggle the done flag of an action item.
    ///
    /// Returns the new state, or None if the meeting or item does not exist.
    pub fn toggle_action_item(
        conn: &Connection,
        meeting_id: &str,
        item_id: &str,
    ) -> Result<Option<bool>> {
        let Some(mut meeting) = Self::get(conn, meeting_id)? else {
            return Ok(None);
        };

        let Some(done) = meeting.toggle_action_item(item_id) else {
            return Ok(None);
        };

        Self::update(conn, &meeting)?;
        Ok(Some(done))
    }

    /// Toggle the done flag of a follow-up.
    ///
    /// Returns the new state, or None if the meeting or item does not exist.
    pub fn toggle_follow_up(
        conn: &Connection,
        meeting_id: &str,
        item_id: &str,
    ) -> Result<Option<bool>> {
        let Some(mut meeting) = Self::get(conn, meeting_id)? else {
            return Ok(None);
        };

        let Some(done) = meeting.toggle_follow_up(item_id) else {
            return Ok(None);
        };

        Self::update(conn, &meeting)?;
        Ok(Some(done))
    }

    fn row_to_meeting(row: &Row<'_>) -> rusqlite::Result<Meeting> {
        let date_raw: String = row.get(2)?;
        let status_raw: String = row.get(4)?;
        let decisions_raw: String = row.get(7)?;
        let action_items_raw: String = row.get(8)?;
        let follow_ups_raw: String = row.get(9)?;

        let date = DateTime::parse_from_rfc3339(&date_raw)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let status = MeetingPhase::from_str(&status_raw).unwrap_or(MeetingPhase::Error);

        let decisions: Vec<Decision> = serde_json::from_str(&decisions_raw).unwrap_or_default();
        let action_items: Vec<ActionItem> =
            serde_json::from_str(&action_items_raw).unwrap_or_default();
        let follow_ups: Vec<FollowUp> = serde_json::from_str(&follow_ups_raw).unwrap_or_default();

        Ok(Meeting {
            id: row.get(0)?,
            title: row.get(1)?,
            date,
            duration_seconds: row.get::<_, i64>(3)?.max(0) as u64,
            transcript: row.get(5)?,
            summary: row.get(6)?,
            decisions,
            action_items,
            follow_ups,
            status,
            error: row.get(10)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    fn insert_meeting(conn: &Connection, title: &str) -> Meeting {
        let meeting = Meeting::new(title.to_string());
        MeetingRepository::insert(conn, &meeting, Some("/tmp/meeting.wav")).unwrap();
        meeting
    }

    fn completed_meeting(conn: &Connection) -> Meeting {
        let mut meeting = insert_meeting(conn, "Sprint review");
        meeting.status = MeetingPhase::Done;
        meeting.transcript = Some("We besluiten X.".to_string());
        meeting.summary = Some("Samenvatting".to_string());
        meeting.action_items.push(ActionItem {
            id: "act-1".to_string(),
            text: "Y".to_string(),
            assignee: "Jan".to_string(),
            done: false,
        });
        meeting.follow_ups.push(FollowUp {
            id: "fup-1".to_string(),
            text: "Z".to_string(),
            deadline: "vrijdag".to_string(),
            responsible: "Piet".to_string(),
            done: false,
        });
        MeetingRepository::update(conn, &meeting).unwrap();
        meeting
    }

    #[test]
    fn test_insert_and_get_meeting() {
        let conn = setup_db();
        let meeting = insert_meeting(&conn, "Standup");

        let loaded = MeetingRepository::get(&conn, &meeting.id).unwrap().unwrap();
        assert_eq!(loaded.id, meeting.id);
        assert_eq!(loaded.title, "Standup");
        assert_eq!(loaded.status, MeetingPhase::Recording);
        assert!(loaded.decisions.is_empty());
    }

    #[test]
    fn test_get_nonexistent_meeting() {
        let conn = setup_db();
        let result = MeetingRepository::get(&conn, "mtg-nope").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_update_round_trips_items() {
        let conn = setup_db();
        let meeting = completed_meeting(&conn);

        let loaded = MeetingRepository::get(&conn, &meeting.id).unwrap().unwrap();
        assert_eq!(loaded.status, MeetingPhase::Done);
        assert_eq!(loaded.transcript.as_deref(), Some("We besluiten X."));
        assert_eq!(loaded.action_items, meeting.action_items);
        assert_eq!(loaded.follow_ups, meeting.follow_ups);
    }

    #[test]
    fn test_failed_meeting_has_no_items() {
        let conn = setup_db();
        let mut meeting = completed_meeting(&conn);

        meeting.fail("Transcriptie mislukt");
        MeetingRepository::update(&conn, &meeting).unwrap();

        let loaded = MeetingRepository::get(&conn, &meeting.id).unwrap().unwrap();
        assert_eq!(loaded.status, MeetingPhase::Error);
        assert_eq!(loaded.error.as_deref(), Some("Transcriptie mislukt"));
        assert!(loaded.summary.is_none());
        assert!(loaded.action_items.is_empty());
        assert!(loaded.follow_ups.is_empty());
    }

    #[test]
    fn test_update_unknown_meeting_fails() {
        let conn = setup_db();
        let meeting = Meeting::new("Nooit opgeslagen".to_string());
        assert!(MeetingRepository::update(&conn, &meeting).is_err());
    }

    #[test]
    fn test_list_meetings_newest_first() {
        let conn = setup_db();
        insert_meeting(&conn, "Meeting 1");
        insert_meeting(&conn, "Meeting 2");
        insert_meeting(&conn, "Meeting 3");

        let meetings = MeetingRepository::list(&conn, 2).unwrap();
        assert_eq!(meetings.len(), 2);
        assert_eq!(meetings[0].title, "Meeting 3");
    }

    #[test]
    fn test_list_empty() {
        let conn = setup_db();
        let meetings = MeetingRepository::list(&conn, 10).unwrap();
        assert!(meetings.is_empty());
    }

    #[test]
    fn test_delete_meeting() {
        let conn = setup_db();
        let meeting = insert_meeting(&conn, "Weg ermee");

        assert!(MeetingRepository::delete(&conn, &meeting.id).unwrap());
        assert!(MeetingRepository::get(&conn, &meeting.id).unwrap().is_none());
        assert!(!MeetingRepository::delete(&conn, &meeting.id).unwrap());
    }

    #[test]
    fn test_toggle_action_item_persists() {
        let conn = setup_db();
        let meeting = completed_meeting(&conn);

        let done = MeetingRepository::toggle_action_item(&conn, &meeting.id, "act-1").unwrap();
        assert_eq!(done, Some(true));

        let loaded = MeetingRepository::get(&conn, &meeting.id).unwrap().unwrap();
        assert!(loaded.action_items[0].done);

        // Double-toggle returns to the original state
        let done = MeetingRepository::toggle_action_item(&conn, &meeting.id, "act-1").unwrap();
        assert_eq!(done, Some(false));
        let loaded = MeetingRepository::get(&conn, &meeting.id).unwrap().unwrap();
        assert!(!loaded.action_items[0].done);
    }

    #[test]
    fn test_toggle_follow_up_persists() {
        let conn = setup_db();
        let meeting = completed_meeting(&conn);

        let done = MeetingRepository::toggle_follow_up(&conn, &meeting.id, "fup-1").unwrap();
        assert_eq!(done, Some(true));
    }

    #[test]
    fn test_toggle_unknown_item() {
        let conn = setup_db();
        let meeting = completed_meeting(&conn);

        let result =
            MeetingRepository::toggle_action_item(&conn, &meeting.id, "act-onbekend").unwrap();
        assert_eq!(result, None);

        let result = MeetingRepository::toggle_action_item(&conn, "mtg-nope", "act-1").unwrap();
        assert_eq!(result, None);
    }
}
