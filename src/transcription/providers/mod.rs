use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

pub mod groq;
pub mod openai;

pub use groq::GroqProvider;
pub use openai::OpenAIProvider;

/// A speech-to-text backend that turns an audio file into plain text.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<String>;
}
