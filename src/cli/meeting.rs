//! CLI handler for meeting commands.
//!
//! All commands talk to the running service over its HTTP API.

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::api::DEFAULT_PORT;
use crate::cli::args::{MeetingCliArgs, MeetingCommand};

fn base_url() -> String {
    format!("http://127.0.0.1:{}", DEFAULT_PORT)
}

pub async fn handle_meeting_command(args: MeetingCliArgs) -> Result<()> {
    match args.command {
        MeetingCommand::Start { title } => start_meeting(title).await,
        MeetingCommand::Stop => stop_meeting().await,
        MeetingCommand::Status => show_status().await,
        MeetingCommand::List { limit } => list_meetings(limit).await,
        MeetingCommand::Show { id } => show_meeting(&id).await,
        MeetingCommand::Delete { id } => delete_meeting(&id).await,
    }
}

async fn start_meeting(title: Option<String>) -> Result<()> {
    let client = reqwest::Client::new();
    let mut body = serde_json::Map::new();
    if let Some(t) = &title {
        body.insert("title".to_string(), Value::String(t.clone()));
    }

    let response = client
        .post(format!("{}/meetings/start", base_url()))
        .json(&body)
        .send()
        .await
        .context("Failed to connect to Notulen service. Is it running?")?;

    let status = response.status();
    let json: Value = response.json().await?;

    if !status.is_success() {
        bail!(
            "Failed to start meeting: {}",
            json.get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error")
        );
    }

    println!(
        "Meeting recording started (id: {})",
        json.get("meeting_id").and_then(|v| v.as_str()).unwrap_or("?")
    );

    Ok(())
}

async fn stop_meeting() -> Result<()> {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/meetings/stop", base_url()))
        .send()
        .await
        .context("Failed to connect to Notulen service. Is it running?")?;

    let status = response.status();
    let json: Value = response.json().await?;

    if !status.is_success() {
        bail!(
            "Failed to stop meeting: {}",
            json.get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error")
        );
    }

    println!(
        "Meeting stopped (id: {}, duration: {}s)",
        json.get("meeting_id").and_then(|v| v.as_str()).unwrap_or("?"),
        json.get("duration_seconds")
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
    );
    println!("Transcription and analysis running; check 'notulen meeting status'.");

    Ok(())
}

async fn show_status() -> Result<()> {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/meetings/status", base_url()))
        .send()
        .await
        .context("Failed to connect to Notulen service. Is it running?")?;

    let json: Value = response.json().await?;

    let phase = json.get("phase").and_then(|v| v.as_str()).unwrap_or("?");
    println!("Phase: {}", phase);

    if let Some(id) = json.get("meeting_id").and_then(|v| v.as_str()) {
        println!("Meeting: {}", id);
    }
    if let Some(duration) = json.get("duration_seconds").and_then(|v| v.as_u64()) {
        println!("Duration: {}m {}s", duration / 60, duration % 60);
    }
    if let Some(error) = json.get("last_error").and_then(|v| v.as_str()) {
        println!("Error: {}", error);
    }

    Ok(())
}

async fn list_meetings(limit: usize) -> Result<()> {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/meetings?limit={}", base_url(), limit))
        .send()
        .await
        .context("Failed to connect to Notulen service. Is it running?")?;

    let json: Value = response.json().await?;
    let meetings = json
        .get("meetings")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    if meetings.is_empty() {
        println!("No meetings recorded yet.");
        return Ok(());
    }

    for m in meetings {
        println!(
            "{}  [{}]  {}  ({}s)",
            m.get("id").and_then(|v| v.as_str()).unwrap_or("?"),
            m.get("status").and_then(|v| v.as_str()).unwrap_or("?"),
            m.get("title").and_then(|v| v.as_str()).unwrap_or(""),
            m.get("duration_seconds").and_then(|v| v.as_u64()).unwrap_or(0),
        );
    }

    Ok(())
}

async fn show_meeting(id: &str) -> Result<()> {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/meetings/{}", base_url(), id))
        .send()
        .await
        .context("Failed to connect to Notulen service. Is it running?")?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        bail!("No meeting with id {}", id);
    }

    let json: Value = response.json().await?;

    println!(
        "{}  [{}]",
        json.get("title").and_then(|v| v.as_str()).unwrap_or(""),
        json.get("status").and_then(|v| v.as_str()).unwrap_or("?")
    );

    if let Some(summary) = json.get("summary").and_then(|v| v.as_str()) {
        println!("\nSamenvatting:\n{}", summary);
    }

    print_items(&json, "decisions", "Beslissingen");
    print_items(&json, "action_items", "Actiepunten");
    print_items(&json, "follow_ups", "Vervolgacties");

    if let Some(error) = json.get("error").and_then(|v| v.as_str()) {
        println!("\nFout: {}", error);
    }

    Ok(())
}

fn print_items(json: &Value, field: &str, heading: &str) {
    let Some(items) = json.get(field).and_then(|v| v.as_array()) else {
        return;
    };
    if items.is_empty() {
        return;
    }

    println!("\n{}:", heading);
    for item in items {
        let text = item.get("text").and_then(|v| v.as_str()).unwrap_or("");
        let done = item.get("done").and_then(|v| v.as_bool());
        let who = item
            .get("assignee")
            .or_else(|| item.get("responsible"))
            .and_then(|v| v.as_str());

        let mark = match done {
            Some(true) => "[x] ",
            Some(false) => "[ ] ",
            None => "",
        };

        match who {
            Some(who) => println!("  {}{} ({})", mark, text, who),
            None => println!("  {}{}", mark, text),
        }
    }
}

async fn delete_meeting(id: &str) -> Result<()> {
    let client = reqwest::Client::new();

    let response = client
        .delete(format!("{}/meetings/{}", base_url(), id))
        .send()
        .await
        .context("Failed to connect to Notulen service. Is it running?")?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        bail!("No meeting with id {}", id);
    }

    println!("Meeting {} deleted.", id);
    Ok(())
}
