//! REST API server for Notulen.
//!
//! Provides HTTP endpoints for meeting recording control, pipeline status
//! and the persisted meeting archive. Front ends (and the bundled CLI) are
//! thin clients over this surface.

pub mod error;
pub mod routes;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tracing::info;

pub use routes::meetings::{ApiCommand, MeetingApiState, MeetingStartRequest};

pub const DEFAULT_PORT: u16 = 3841;

pub struct ApiServer {
    port: u16,
    meeting_state: MeetingApiState,
}

impl ApiServer {
    pub fn new(
        tx: tokio::sync::mpsc::Sender<ApiCommand>,
        status: crate::meeting::MeetingStatusHandle,
    ) -> Self {
        Self {
            port: DEFAULT_PORT,
            meeting_state: MeetingApiState { tx, status },
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            .route("/", get(status))
            .route("/version", get(version))
            .merge(routes::meetings::router(self.meeting_state))
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("API server listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET    /                    - Service info");
        info!("  GET    /version             - Version info");
        info!("  POST   /meetings/start      - Start meeting recording");
        info!("  POST   /meetings/stop       - Stop recording and process");
        info!("  POST   /meetings/toggle     - Toggle meeting recording");
        info!("  GET    /meetings/status     - Live pipeline status");
        info!("  GET    /meetings            - List meetings");
        info!("  GET    /meetings/:id        - Get a meeting");
        info!("  DELETE /meetings/:id        - Delete a meeting");
        info!("  POST   /meetings/:id/action-items/:item_id/toggle - Toggle done flag");
        info!("  POST   /meetings/:id/follow-ups/:item_id/toggle   - Toggle done flag");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "notulen",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "notulen"
    }))
}
