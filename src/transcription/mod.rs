use anyhow::{bail, Context, Result};

use crate::config::TranscriptionConfig;

pub mod providers;

pub use providers::{GroqProvider, OpenAIProvider, TranscriptionProvider};

/// Build a transcription provider by name from config.
pub fn with_provider(
    provider_name: &str,
    config: &TranscriptionConfig,
) -> Result<Box<dyn TranscriptionProvider>> {
    let provider: Box<dyn TranscriptionProvider> = match provider_name {
        "groq" => {
            let api_key = config
                .api_key
                .clone()
                .context("api_key is required for the Groq provider")?;

            Box::new(GroqProvider::new(
                api_key,
                config.api_endpoint.clone(),
                config.model.clone(),
            )?)
        }
        "openai" => {
            let api_key = config
                .api_key
                .clone()
                .context("api_key is required for the OpenAI provider")?;

            Box::new(OpenAIProvider::new(
                api_key,
                config.api_endpoint.clone(),
                config.model.clone(),
            )?)
        }
        _ => bail!(
            "Unknown transcription provider '{}'. Supported providers: groq, openai",
            provider_name
        ),
    };

    Ok(provider)
}

/// Validate provider configuration and return an error message if invalid.
pub fn validate_provider_config(config: &TranscriptionConfig) -> Option<String> {
    match config.provider.as_deref() {
        Some("groq") | Some("openai") => {
            if config.api_key.is_none() {
                Some("API key required for transcription provider".to_string())
            } else {
                None
            }
        }
        Some(other) => Some(format!("Unknown provider: {}", other)),
        None => Some("No transcription provider configured".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(provider: &str) -> TranscriptionConfig {
        TranscriptionConfig {
            provider: Some(provider.to_string()),
            model: None,
            language: Some("nl".to_string()),
            api_endpoint: None,
            api_key: Some("test-key".to_string()),
        }
    }

    #[test]
    fn test_with_provider_groq() {
        let provider = with_provider("groq", &config_with_key("groq")).unwrap();
        assert_eq!(provider.name(), "Groq Whisper API");
    }

    #[test]
    fn test_with_provider_openai() {
        let provider = with_provider("openai", &config_with_key("openai")).unwrap();
        assert_eq!(provider.name(), "OpenAI Whisper API");
    }

    #[test]
    fn test_unknown_provider_fails() {
        assert!(with_provider("assembly-ai", &config_with_key("assembly-ai")).is_err());
    }

    #[test]
    fn test_missing_api_key_fails() {
        let mut config = config_with_key("groq");
        config.api_key = None;
        assert!(with_provider("groq", &config).is_err());
    }

    #[test]
    fn test_validate_provider_config() {
        assert!(validate_provider_config(&config_with_key("groq")).is_none());

        let mut config = config_with_key("groq");
        config.api_key = None;
        assert!(validate_provider_config(&config).is_some());

        config = config_with_key("deepgram");
        assert!(validate_provider_config(&config).is_some());
    }
}
