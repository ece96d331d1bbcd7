//! OpenRouter chat-completion backend for transcript analysis.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::parser::parse_analysis;
use super::{AnalysisError, AnalysisProvider, MeetingAnalysis, SYSTEM_PROMPT};

const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

pub struct OpenRouterProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenRouterProvider {
    pub fn new(api_key: String, endpoint: Option<String>, model: Option<String>) -> Self {
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        info!("Initialized OpenRouter analysis provider (model: {})", model);

        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            model,
        }
    }

    fn user_prompt(transcript: &str) -> String {
        format!("Transcript van de vergadering:\n\n{}", transcript)
    }
}

#[async_trait]
impl AnalysisProvider for OpenRouterProvider {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    async fn analyze(&self, transcript: &str) -> Result<MeetingAnalysis, AnalysisError> {
        if self.api_key.is_empty() {
            return Err(AnalysisError::Request(
                "Geen OpenRouter API key geconfigureerd".to_string(),
            ));
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::user_prompt(transcript),
                },
            ],
        };

        debug!("Sending analysis request ({} transcript chars)", transcript.len());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&body) {
                return Err(AnalysisError::Request(format!(
                    "{} ({})",
                    error_response.error.message, status
                )));
            }
            return Err(AnalysisError::Request(format!("{}: {}", status, body)));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Parse(format!("Onleesbaar API-antwoord: {}", e)))?;

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| AnalysisError::Parse("Antwoord bevat geen choices".to_string()))?;

        let analysis = parse_analysis(content)?;

        info!(
            "Analysis complete: {} decisions, {} action items, {} follow-ups",
            analysis.decisions.len(),
            analysis.action_items.len(),
            analysis.follow_ups.len()
        );

        Ok(analysis)
    }
}
