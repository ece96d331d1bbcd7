use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transcription: TranscriptionConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Provider name: "groq" or "openai".
    pub provider: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub api_endpoint: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub model: Option<String>,
    pub api_endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            provider: Some("groq".to_string()),
            model: None,
            language: Some("nl".to_string()),
            api_endpoint: None,
            api_key: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: Some("openai/gpt-4o-mini".to_string()),
            api_endpoint: None,
            api_key: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.transcription.provider.as_deref(), Some("groq"));
        assert_eq!(config.transcription.language.as_deref(), Some("nl"));
        assert!(config.transcription.api_key.is_none());
        assert_eq!(config.analysis.model.as_deref(), Some("openai/gpt-4o-mini"));
    }

    #[test]
    fn test_partial_config_parses_with_defaults() {
        let raw = r#"
            [transcription]
            api_key = "gsk-test"

            [analysis]
            api_key = "sk-or-test"
        "#;

        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.transcription.api_key.as_deref(), Some("gsk-test"));
        assert_eq!(config.transcription.provider.as_deref(), Some("groq"));
        assert_eq!(config.analysis.api_key.as_deref(), Some("sk-or-test"));
        assert_eq!(config.analysis.model.as_deref(), Some("openai/gpt-4o-mini"));
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = Config::default();
        config.transcription.api_key = Some("gsk-abc".to_string());
        config.analysis.model = Some("anthropic/claude-3-haiku".to_string());

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.transcription.api_key.as_deref(), Some("gsk-abc"));
        assert_eq!(
            parsed.analysis.model.as_deref(),
            Some("anthropic/claude-3-haiku")
        );
    }
}
