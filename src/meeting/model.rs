//! Meeting data model shared by the pipeline, persistence and API layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::MeetingPhase;

/// An extracted statement representing a meeting decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub context: String,
}

/// An extracted task with an owner, trackable as done/not-done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: String,
    pub text: String,
    pub assignee: String,
    #[serde(default)]
    pub done: bool,
}

/// An extracted deferred item with an owner and deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: String,
    pub text: String,
    pub deadline: String,
    pub responsible: String,
    #[serde(default)]
    pub done: bool,
}

/// A single meeting, mutated in place as the pipeline advances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub duration_seconds: u64,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub decisions: Vec<Decision>,
    pub action_items: Vec<ActionItem>,
    pub follow_ups: Vec<FollowUp>,
    pub status: MeetingPhase,
    pub error: Option<String>,
}

impl Meeting {
    /// Create a fresh meeting in the recording state.
    pub fn new(title: String) -> Self {
        Self {
            id: format!("mtg-{}", Uuid::new_v4()),
            title,
            date: Utc::now(),
            duration_seconds: 0,
            transcript: None,
            summary: None,
            decisions: Vec::new(),
            action_items: Vec::new(),
            follow_ups: Vec::new(),
            status: MeetingPhase::Recording,
            error: None,
        }
    }

    /// Transition to the error state, clearing any extracted items.
    ///
    /// Extracted items are only valid on a completed meeting; a failed
    /// pipeline must not leave partial results behind.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = MeetingPhase::Error;
        self.error = Some(message.into());
        self.summary = None;
        self.decisions.clear();
        self.action_items.clear();
        self.follow_ups.clear();
    }

    /// Toggle the done flag of an action item. Returns the new state,
    /// or None if no item with the given id exists.
    pub fn toggle_action_item(&mut self, item_id: &str) -> Option<bool> {
        let item = self.action_items.iter_mut().find(|a| a.id == item_id)?;
        item.done = !item.done;
        Some(item.done)
    }

    /// Toggle the done flag of a follow-up. Returns the new state,
    /// or None if no item with the given id exists.
    pub fn toggle_follow_up(&mut self, item_id: &str) -> Option<bool> {
        let item = self.follow_ups.iter_mut().find(|f| f.id == item_id)?;
        item.done = !item.done;
        Some(item.done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting_with_items() -> Meeting {
        let mut meeting = Meeting::new("Standup".to_string());
        meeting.action_items.push(ActionItem {
            id: "act-1".to_string(),
            text: "Offerte versturen".to_string(),
            assignee: "Jan".to_string(),
            done: false,
        });
        meeting.follow_ups.push(FollowUp {
            id: "fup-1".to_string(),
            text: "Planning afstemmen".to_string(),
            deadline: "vrijdag".to_string(),
            responsible: "Piet".to_string(),
            done: false,
        });
        meeting
    }

    #[test]
    fn test_new_meeting_starts_recording() {
        let meeting = Meeting::new("Test".to_string());
        assert_eq!(meeting.status, MeetingPhase::Recording);
        assert!(meeting.id.starts_with("mtg-"));
        assert!(meeting.decisions.is_empty());
        assert!(meeting.action_items.is_empty());
        assert!(meeting.follow_ups.is_empty());
    }

    #[test]
    fn test_unique_ids() {
        let a = Meeting::new("A".to_string());
        let b = Meeting::new("B".to_string());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_toggle_action_item() {
        let mut meeting = meeting_with_items();
        assert_eq!(meeting.toggle_action_item("act-1"), Some(true));
        assert!(meeting.action_items[0].done);
    }

    #[test]
    fn test_double_toggle_is_idempotent() {
        let mut meeting = meeting_with_items();
        meeting.toggle_action_item("act-1");
        meeting.toggle_action_item("act-1");
        assert!(!meeting.action_items[0].done);

        meeting.toggle_follow_up("fup-1");
        meeting.toggle_follow_up("fup-1");
        assert!(!meeting.follow_ups[0].done);
    }

    #[test]
    fn test_toggle_unknown_item() {
        let mut meeting = meeting_with_items();
        assert_eq!(meeting.toggle_action_item("act-999"), None);
        assert_eq!(meeting.toggle_follow_up("nope"), None);
    }

    #[test]
    fn test_fail_clears_items() {
        let mut meeting = meeting_with_items();
        meeting.summary = Some("Samenvatting".to_string());
        meeting.fail("Transcriptie mislukt");

        assert_eq!(meeting.status, MeetingPhase::Error);
        assert_eq!(meeting.error.as_deref(), Some("Transcriptie mislukt"));
        assert!(meeting.summary.is_none());
        assert!(meeting.action_items.is_empty());
        assert!(meeting.follow_ups.is_empty());
    }
}
