//! Meeting API endpoints.
//!
//! Provides HTTP endpoints for:
//! - Starting meeting recording (POST /meetings/start)
//! - Stopping meeting recording (POST /meetings/stop)
//! - Toggling meeting recording (POST /meetings/toggle)
//! - Getting pipeline status (GET /meetings/status)
//! - Listing meetings (GET /meetings)
//! - Getting a specific meeting (GET /meetings/:id)
//! - Deleting a meeting (DELETE /meetings/:id)
//! - Toggling extracted item done flags
//!   (POST /meetings/:id/action-items/:item_id/toggle,
//!    POST /meetings/:id/follow-ups/:item_id/toggle)

use crate::api::error::{ApiError, ApiResult};
use crate::db::meetings::MeetingRepository;
use crate::meeting::{Meeting, MeetingPhase, MeetingStartOptions, MeetingStatusHandle};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Commands sent from API handlers to the service loop.
#[derive(Debug)]
pub enum ApiCommand {
    MeetingStart(Option<MeetingStartOptions>),
    MeetingStop,
    MeetingToggle(Option<MeetingStartOptions>),
}

/// Shared state for meeting routes.
#[derive(Clone)]
pub struct MeetingApiState {
    pub tx: mpsc::Sender<ApiCommand>,
    pub status: MeetingStatusHandle,
}

/// Request body for start/toggle endpoints.
#[derive(Debug, Default, serde::Deserialize)]
pub struct MeetingStartRequest {
    pub title: Option<String>,
}

pub fn router(state: MeetingApiState) -> Router {
    Router::new()
        .route("/meetings/start", post(start_meeting))
        .route("/meetings/stop", post(stop_meeting))
        .route("/meetings/toggle", post(toggle_meeting))
        .route("/meetings/status", get(meeting_status))
        .route("/meetings", get(list_meetings))
        .route("/meetings/:id", get(get_meeting).delete(delete_meeting))
        .route(
            "/meetings/:id/action-items/:item_id/toggle",
            post(toggle_action_item),
        )
        .route(
            "/meetings/:id/follow-ups/:item_id/toggle",
            post(toggle_follow_up),
        )
        .with_state(state)
}

async fn start_meeting(
    State(state): State<MeetingApiState>,
    body: Option<Json<MeetingStartRequest>>,
) -> Result<Json<Value>, StatusCode> {
    let options = body.map(|Json(req)| MeetingStartOptions { title: req.title });

    info!("Meeting start command received via API");

    match state.tx.send(ApiCommand::MeetingStart(options)).await {
        Ok(_) => {
            // Wait a bit for the machine to process
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            let status = state.status.get().await;
            Ok(Json(json!({
                "success": true,
                "meeting_id": status.meeting_id,
                "phase": status.phase.as_str(),
                "message": "Meeting recording started",
            })))
        }
        Err(e) => {
            error!("Failed to send meeting start command: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn stop_meeting(State(state): State<MeetingApiState>) -> Result<Json<Value>, StatusCode> {
    info!("Meeting stop command received via API");

    match state.tx.send(ApiCommand::MeetingStop).await {
        Ok(_) => {
            // Wait a bit for the machine to process
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            let status = state.status.get().await;
            Ok(Json(json!({
                "success": true,
                "meeting_id": status.meeting_id,
                "phase": status.phase.as_str(),
                "message": "Meeting recording stopped, processing started",
                "duration_seconds": status.duration_seconds(),
            })))
        }
        Err(e) => {
            error!("Failed to send meeting stop command: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn toggle_meeting(
    State(state): State<MeetingApiState>,
    body: Option<Json<MeetingStartRequest>>,
) -> Result<Json<Value>, StatusCode> {
    let options = body.map(|Json(req)| MeetingStartOptions { title: req.title });

    info!("Meeting toggle command received via API");

    match state.tx.send(ApiCommand::MeetingToggle(options)).await {
        Ok(_) => {
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            let status = state.status.get().await;
            let is_recording = status.phase == MeetingPhase::Recording;

            Ok(Json(json!({
                "success": true,
                "meeting_id": status.meeting_id,
                "phase": status.phase.as_str(),
                "message": if is_recording {
                    "Meeting recording started"
                } else {
                    "Meeting recording stopped, processing started"
                },
                "duration_seconds": status.duration_seconds(),
            })))
        }
        Err(e) => {
            error!("Failed to send meeting toggle command: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn meeting_status(State(state): State<MeetingApiState>) -> Json<Value> {
    let status = state.status.get().await;

    Json(json!({
        "active": status.phase == MeetingPhase::Recording,
        "meeting_id": status.meeting_id,
        "phase": status.phase.as_str(),
        "duration_seconds": status.duration_seconds(),
        "title": status.title,
        "last_error": status.last_error,
    }))
}

fn meeting_to_json(m: &Meeting) -> Value {
    json!({
        "id": m.id,
        "title": m.title,
        "date": m.date.to_rfc3339(),
        "duration_seconds": m.duration_seconds,
        "status": m.status.as_str(),
        "transcript": m.transcript,
        "summary": m.summary,
        "decisions": m.decisions,
        "action_items": m.action_items,
        "follow_ups": m.follow_ups,
        "error": m.error,
    })
}

async fn list_meetings(
    Query(params): Query<HashMap<String, String>>,
    State(_state): State<MeetingApiState>,
) -> ApiResult<Json<Value>> {
    let limit: usize = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(20);

    let meetings = tokio::task::spawn_blocking(move || {
        let conn = crate::db::init_db()?;
        MeetingRepository::list(&conn, limit)
    })
    .await
    .map_err(|e| ApiError::internal(e.to_string()))??;

    let entries: Vec<Value> = meetings
        .iter()
        .map(|m| {
            json!({
                "id": m.id,
                "title": m.title,
                "date": m.date.to_rfc3339(),
                "status": m.status.as_str(),
                "duration_seconds": m.duration_seconds,
                "summary": m.summary,
            })
        })
        .collect();

    Ok(Json(json!({ "meetings": entries })))
}

async fn get_meeting(
    Path(id): Path<String>,
    State(_state): State<MeetingApiState>,
) -> ApiResult<Json<Value>> {
    let meeting = tokio::task::spawn_blocking(move || {
        let conn = crate::db::init_db()?;
        MeetingRepository::get(&conn, &id)
    })
    .await
    .map_err(|e| ApiError::internal(e.to_string()))??;

    match meeting {
        Some(m) => Ok(Json(meeting_to_json(&m))),
        None => Err(ApiError::not_found("Meeting not found")),
    }
}

async fn delete_meeting(
    Path(id): Path<String>,
    State(_state): State<MeetingApiState>,
) -> ApiResult<Json<Value>> {
    let deleted = tokio::task::spawn_blocking(move || {
        let conn = crate::db::init_db()?;
        MeetingRepository::delete(&conn, &id)
    })
    .await
    .map_err(|e| ApiError::internal(e.to_string()))??;

    if !deleted {
        return Err(ApiError::not_found("Meeting not found"));
    }

    Ok(Json(json!({ "success": true })))
}

async fn toggle_action_item(
    Path((id, item_id)): Path<(String, String)>,
    State(_state): State<MeetingApiState>,
) -> ApiResult<Json<Value>> {
    let done = tokio::task::spawn_blocking(move || {
        let conn = crate::db::init_db()?;
        MeetingRepository::toggle_action_item(&conn, &id, &item_id)
    })
    .await
    .map_err(|e| ApiError::internal(e.to_string()))??;

    match done {
        Some(done) => Ok(Json(json!({ "success": true, "done": done }))),
        None => Err(ApiError::not_found("Meeting or action item not found")),
    }
}

async fn toggle_follow_up(
    Path((id, item_id)): Path<(String, String)>,
    State(_state): State<MeetingApiState>,
) -> ApiResult<Json<Value>> {
    let done = tokio::task::spawn_blocking(move || {
        let conn = crate::db::init_db()?;
        MeetingRepository::toggle_follow_up(&conn, &id, &item_id)
    })
    .await
    .map_err(|e| ApiError::internal(e.to_string()))??;

    match done {
        Some(done) => Ok(Json(json!({ "success": true, "done": done }))),
        None => Err(ApiError::not_found("Meeting or follow-up not found")),
    }
}
