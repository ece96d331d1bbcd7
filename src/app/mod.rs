use crate::analysis::{AnalysisProvider, OpenRouterProvider};
use crate::api::{ApiCommand, ApiServer};
use crate::audio::MicAudioSource;
use crate::config::Config;
use crate::global;
use crate::meeting::{MeetingMachine, MeetingStatusHandle, ToggleOutcome};
use crate::transcription;
use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Target capture rate; Whisper models are trained on 16 kHz audio.
const SAMPLE_RATE: u32 = 16000;

pub async fn run_service() -> Result<()> {
    info!("Starting Notulen service");

    let config = Config::load()?;

    let (tx, mut rx) = mpsc::channel::<ApiCommand>(10);

    let provider_name = config
        .transcription
        .provider
        .as_deref()
        .context("No transcription provider configured. Run 'notulen keys set' first.")?;

    let transcriber = transcription::with_provider(provider_name, &config.transcription)?;
    let analyzer = build_analyzer(&config)?;
    let language = config
        .transcription
        .language
        .clone()
        .unwrap_or_else(|| "nl".to_string());

    let status_handle = MeetingStatusHandle::default();
    let mut machine = MeetingMachine::new(
        Box::new(MicAudioSource::new(SAMPLE_RATE)?),
        transcriber,
        analyzer,
        status_handle.clone(),
        global::meetings_dir()?,
        global::db_file()?,
        language,
    );

    let api_server = ApiServer::new(tx, status_handle.clone());
    tokio::spawn(async move {
        if let Err(e) = api_server.start().await {
            error!("API server failed: {}", e);
        }
    });

    info!("Notulen is ready!");
    info!("Start a meeting: curl -X POST http://127.0.0.1:3841/meetings/start");
    info!("Or use the CLI:  notulen meeting start");

    while let Some(command) = rx.recv().await {
        match command {
            ApiCommand::MeetingStart(options) => match machine.start(options).await {
                Ok(result) => info!("Meeting {} recording", result.meeting_id),
                Err(e) => error!("Failed to start meeting: {}", e),
            },
            ApiCommand::MeetingStop => match machine.stop().await {
                Ok(result) => info!(
                    "Meeting {} finished with status '{}' ({}s)",
                    result.meeting_id,
                    result.status.as_str(),
                    result.duration_seconds
                ),
                Err(e) => error!("Failed to stop meeting: {}", e),
            },
            ApiCommand::MeetingToggle(options) => match machine.toggle(options).await {
                Ok(ToggleOutcome::Started(result)) => {
                    info!("Meeting {} recording", result.meeting_id)
                }
                Ok(ToggleOutcome::Stopped(result)) => info!(
                    "Meeting {} finished with status '{}'",
                    result.meeting_id,
                    result.status.as_str()
                ),
                Err(e) => error!("Failed to toggle meeting: {}", e),
            },
        }
    }

    Ok(())
}

fn build_analyzer(config: &Config) -> Result<Box<dyn AnalysisProvider>> {
    let api_key = config
        .analysis
        .api_key
        .clone()
        .context("No analysis API key configured. Run 'notulen keys set' first.")?;

    Ok(Box::new(OpenRouterProvider::new(
        api_key,
        config.analysis.api_endpoint.clone(),
        config.analysis.model.clone(),
    )))
}
