//! Transcript analysis: turns a raw transcript into structured minutes
//! (summary, decisions, action items, follow-ups) via a chat-completion API.

use async_trait::async_trait;
use thiserror::Error;

use crate::meeting::model::{ActionItem, Decision, FollowUp};

mod openrouter;
pub mod parser;

pub use openrouter::OpenRouterProvider;

/// Fixed instruction prompt for the minutes extraction call.
///
/// The response contract (four top-level JSON fields) is what
/// `parser::parse_analysis` expects.
pub const SYSTEM_PROMPT: &str = "\
Je bent een assistent die vergadertranscripties analyseert en notulen opstelt. \
Antwoord uitsluitend met geldige JSON, zonder markdown of toelichting, met exact deze velden: \
\"summary\" (string, beknopte samenvatting in het Nederlands), \
\"decisions\" (array van objecten met \"text\" en optioneel \"context\"), \
\"actionItems\" (array van objecten met \"text\" en optioneel \"assignee\"), \
\"followUps\" (array van objecten met \"text\", optioneel \"responsible\" en optioneel \"deadline\").";

/// Errors from the analysis step, split by contract:
/// the HTTP call failing vs. the model returning unusable output.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Analyse mislukt: {0}")]
    Request(String),

    #[error("Netwerkfout tijdens analyse: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Ongeldig analyse-antwoord: {0}")]
    Parse(String),
}

/// Structured result of analyzing one transcript.
#[derive(Debug, Clone, Default)]
pub struct MeetingAnalysis {
    pub summary: String,
    pub decisions: Vec<Decision>,
    pub action_items: Vec<ActionItem>,
    pub follow_ups: Vec<FollowUp>,
}

/// A language-model backend that extracts structured minutes from a transcript.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn analyze(&self, transcript: &str) -> Result<MeetingAnalysis, AnalysisError>;
}
