//! Meeting lifecycle orchestrator.
//!
//! Runs the full pipeline for one meeting at a time:
//! record → transcribe → analyze → done
//!
//! All dependencies are injected via constructor — no concrete types hardcoded.
//! Persistence is best-effort: a storage failure is logged but never fails
//! the pipeline; a transcription or analysis failure is terminal for the
//! meeting (no retries).

use anyhow::{bail, Result};
use hound::{WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::analysis::AnalysisProvider;
use crate::audio::AudioSource;
use crate::db::{self, meetings::MeetingRepository};
use crate::transcription::TranscriptionProvider;

use super::model::Meeting;
use super::status::{MeetingPhase, MeetingStartOptions, MeetingStatusHandle};

/// Result returned from starting a meeting.
pub struct MeetingStartResult {
    pub meeting_id: String,
    pub audio_path: PathBuf,
}

/// Result returned from stopping a meeting.
pub struct MeetingStopResult {
    pub meeting_id: String,
    pub duration_seconds: u64,
    pub status: MeetingPhase,
}

/// Outcome of a toggle operation.
pub enum ToggleOutcome {
    Started(MeetingStartResult),
    Stopped(MeetingStopResult),
}

pub struct MeetingMachine {
    source: Box<dyn AudioSource>,
    transcriber: Box<dyn TranscriptionProvider>,
    analyzer: Box<dyn AnalysisProvider>,
    status: MeetingStatusHandle,
    meetings_dir: PathBuf,
    db_path: PathBuf,
    language: String,
    current: Option<(Meeting, PathBuf)>,
}

impl MeetingMachine {
    pub fn new(
        source: Box<dyn AudioSource>,
        transcriber: Box<dyn TranscriptionProvider>,
        analyzer: Box<dyn AnalysisProvider>,
        status: MeetingStatusHandle,
        meetings_dir: PathBuf,
        db_path: PathBuf,
        language: String,
    ) -> Self {
        Self {
            source,
            transcriber,
            analyzer,
            status,
            meetings_dir,
            db_path,
            language,
            current: None,
        }
    }

    /// Start a meeting recording.
    pub async fn start(&mut self, options: Option<MeetingStartOptions>) -> Result<MeetingStartResult> {
        let state = self.status.get().await;
        if state.phase == MeetingPhase::Recording {
            bail!(
                "Meeting already in progress (id: {}). Stop it first or use toggle.",
                state.meeting_id.unwrap_or_default()
            );
        }

        let opts = options.unwrap_or_default();
        let title = opts.title.clone().unwrap_or_else(|| {
            format!("Vergadering {}", chrono::Local::now().format("%d-%m-%Y %H:%M"))
        });

        let mut meeting = Meeting::new(title);
        let audio_path = self.generate_audio_path();

        if let Some(parent) = audio_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        self.persist_insert(&meeting, &audio_path);

        if let Err(e) = self.source.start() {
            let message = "Kan microfoon niet openen. Geef toestemming.";
            error!("Failed to start mic capture: {}", e);
            meeting.fail(message);
            self.persist(&meeting);
            self.status.set_error(message.to_string()).await;
            bail!("{}", message);
        }

        self.status
            .start_recording(meeting.id.clone(), opts.title)
            .await;

        info!("Meeting {} recording started: {:?}", meeting.id, audio_path);

        let meeting_id = meeting.id.clone();
        self.current = Some((meeting, audio_path.clone()));

        Ok(MeetingStartResult {
            meeting_id,
            audio_path,
        })
    }

    /// Stop the meeting recording and run the pipeline to completion.
    pub async fn stop(&mut self) -> Result<MeetingStopResult> {
        let state = self.status.get().await;
        if state.phase != MeetingPhase::Recording {
            bail!(
                "No meeting recording in progress (current phase: {})",
                state.phase.as_str()
            );
        }

        let Some((mut meeting, audio_path)) = self.current.take() else {
            bail!("Recording state without an active meeting");
        };

        meeting.duration_seconds = state.duration_seconds().unwrap_or(0);

        let samples = match self.source.stop() {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to stop mic: {}", e);
                Vec::new()
            }
        };

        if samples.is_empty() {
            let message = "Geen audio opgenomen";
            meeting.fail(message);
            self.persist(&meeting);
            self.status.set_error(message.to_string()).await;
            bail!("No audio samples captured during meeting");
        }

        info!(
            "Meeting {} stopped: {} samples ({}Hz), duration={}s",
            meeting.id,
            samples.len(),
            self.source.sample_rate(),
            meeting.duration_seconds,
        );

        let sample_rate = self.source.sample_rate();
        if let Err(e) = self.write_wav(&audio_path, &samples, sample_rate) {
            let message = "Opname kon niet worden opgeslagen";
            error!("Failed to write meeting audio {:?}: {}", audio_path, e);
            meeting.fail(message);
            self.persist(&meeting);
            self.status.set_error(message.to_string()).await;
            bail!("{}", message);
        }

        // Process inline: transcribe → analyze → done
        let meeting = self.process_meeting(meeting, &audio_path).await;

        Ok(MeetingStopResult {
            meeting_id: meeting.id,
            duration_seconds: meeting.duration_seconds,
            status: meeting.status,
        })
    }

    /// Toggle meeting recording.
    pub async fn toggle(&mut self, options: Option<MeetingStartOptions>) -> Result<ToggleOutcome> {
        let state = self.status.get().await;
        match state.phase {
            MeetingPhase::Recording => {
                let result = self.stop().await?;
                Ok(ToggleOutcome::Stopped(result))
            }
            MeetingPhase::Idle | MeetingPhase::Done | MeetingPhase::Error => {
                let result = self.start(options).await?;
                Ok(ToggleOutcome::Started(result))
            }
            phase => {
                bail!("Cannot toggle meeting while {} — please wait", phase.as_str());
            }
        }
    }

    /// Run post-recording processing: transcribe → analyze → done.
    ///
    /// Extracted items stay empty until the analysis step succeeds; any step
    /// failure is terminal and clears partial results.
    async fn process_meeting(&self, mut meeting: Meeting, audio_path: &Path) -> Meeting {
        meeting.status = MeetingPhase::Transcribing;
        self.status.set_phase(MeetingPhase::Transcribing).await;
        self.persist(&meeting);

        let transcript = match self.transcriber.transcribe(audio_path, &self.language).await {
            Ok(text) => text,
            Err(e) => {
                error!("Meeting {} transcription failed: {}", meeting.id, e);
                return self.fail_meeting(meeting, format!("Transcriptie mislukt: {}", e)).await;
            }
        };

        info!(
            "Meeting {} transcription complete: {} chars",
            meeting.id,
            transcript.len()
        );

        meeting.transcript = Some(transcript.clone());
        meeting.status = MeetingPhase::Analyzing;
        self.status.set_phase(MeetingPhase::Analyzing).await;
        self.persist(&meeting);

        let analysis = match self.analyzer.analyze(&transcript).await {
            Ok(analysis) => analysis,
            Err(e) => {
                error!("Meeting {} analysis failed: {}", meeting.id, e);
                return self.fail_meeting(meeting, e.to_string()).await;
            }
        };

        meeting.summary = Some(analysis.summary);
        meeting.decisions = analysis.decisions;
        meeting.action_items = analysis.action_items;
        meeting.follow_ups = analysis.follow_ups;
        meeting.status = MeetingPhase::Done;
        self.persist(&meeting);
        self.status.complete().await;

        info!(
            "Meeting {} done: {} decisions, {} action items, {} follow-ups",
            meeting.id,
            meeting.decisions.len(),
            meeting.action_items.len(),
            meeting.follow_ups.len()
        );

        meeting
    }

    async fn fail_meeting(&self, mut meeting: Meeting, message: String) -> Meeting {
        meeting.fail(message.clone());
        self.persist(&meeting);
        self.status.set_error(message).await;
        meeting
    }

    /// Insert the meeting record. Storage is best-effort by design: a failure
    /// here must not block the recording itself.
    fn persist_insert(&self, meeting: &Meeting, audio_path: &Path) {
        let result = db::open(&self.db_path).and_then(|conn| {
            MeetingRepository::insert(&conn, meeting, Some(&audio_path.to_string_lossy()))
        });

        if let Err(e) = result {
            warn!("Failed to insert meeting {}: {}", meeting.id, e);
        }
    }

    /// Persist a meeting snapshot, logging (not surfacing) storage errors.
    fn persist(&self, meeting: &Meeting) {
        let result =
            db::open(&self.db_path).and_then(|conn| MeetingRepository::update(&conn, meeting));

        if let Err(e) = result {
            warn!("Failed to persist meeting {}: {}", meeting.id, e);
        }
    }

    fn write_wav(&self, path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };

        let mut writer = WavWriter::create(path, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        info!("Meeting audio saved: {:?} ({} samples)", path, samples.len());
        Ok(())
    }

    fn generate_audio_path(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let filename = format!("meeting-{}.wav", timestamp);
        let path = self.meetings_dir.join(&filename);

        // Handle collision by appending counter
        if path.exists() {
            for i in 1..100 {
                let filename = format!("meeting-{}-{}.wav", timestamp, i);
                let alt_path = self.meetings_dir.join(&filename);
                if !alt_path.exists() {
                    return alt_path;
                }
            }
        }

        path
    }
}
