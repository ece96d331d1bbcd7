//! Meeting status types and shared state handle.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Phase of a meeting lifecycle.
///
/// `Idle` only exists as live machine state; persisted meetings always
/// carry one of the five pipeline phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingPhase {
    Idle,
    Recording,
    Transcribing,
    Analyzing,
    Done,
    Error,
}

impl MeetingPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Transcribing => "transcribing",
            Self::Analyzing => "analyzing",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "idle" => Some(Self::Idle),
            "recording" => Some(Self::Recording),
            "transcribing" => Some(Self::Transcribing),
            "analyzing" => Some(Self::Analyzing),
            "done" => Some(Self::Done),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Options for starting a meeting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeetingStartOptions {
    pub title: Option<String>,
}

/// Current meeting state, readable by API handlers.
#[derive(Debug, Clone)]
pub struct MeetingState {
    pub phase: MeetingPhase,
    pub meeting_id: Option<String>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub title: Option<String>,
    pub last_error: Option<String>,
}

impl Default for MeetingState {
    fn default() -> Self {
        Self {
            phase: MeetingPhase::Idle,
            meeting_id: None,
            started_at: None,
            title: None,
            last_error: None,
        }
    }
}

impl MeetingState {
    /// Duration since recording started, in seconds.
    pub fn duration_seconds(&self) -> Option<u64> {
        self.started_at.map(|started| {
            let elapsed = chrono::Utc::now() - started;
            elapsed.num_seconds().max(0) as u64
        })
    }
}

/// Thread-safe handle for sharing meeting state between the machine and API handlers.
#[derive(Clone, Default)]
pub struct MeetingStatusHandle {
    inner: Arc<Mutex<MeetingState>>,
}

impl MeetingStatusHandle {
    pub async fn get(&self) -> MeetingState {
        self.inner.lock().await.clone()
    }

    pub async fn start_recording(&self, meeting_id: String, title: Option<String>) {
        let mut state = self.inner.lock().await;
        state.phase = MeetingPhase::Recording;
        state.meeting_id = Some(meeting_id);
        state.started_at = Some(chrono::Utc::now());
        state.title = title;
        state.last_error = None;
    }

    pub async fn set_phase(&self, phase: MeetingPhase) {
        let mut state = self.inner.lock().await;
        state.phase = phase;
    }

    pub async fn set_error(&self, error: String) {
        let mut state = self.inner.lock().await;
        state.phase = MeetingPhase::Error;
        state.last_error = Some(error);
    }

    pub async fn reset(&self) {
        let mut state = self.inner.lock().await;
        *state = MeetingState::default();
    }

    pub async fn complete(&self) {
        let mut state = self.inner.lock().await;
        state.phase = MeetingPhase::Done;
    }
}
