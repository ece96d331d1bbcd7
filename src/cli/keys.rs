//! CLI handler for API key configuration.
//!
//! Keys live in the local config file and are only ever sent as auth
//! headers to their respective services.

use anyhow::{Context, Result};
use dialoguer::Password;

use crate::cli::args::{KeysCliArgs, KeysCommand};
use crate::config::Config;

pub fn handle_keys_command(args: KeysCliArgs) -> Result<()> {
    match args.command {
        KeysCommand::Set => set_keys(),
        KeysCommand::Show => show_keys(),
    }
}

fn set_keys() -> Result<()> {
    let mut config = Config::load()?;

    let transcription_key = Password::new()
        .with_prompt("Transcriptie API key (Groq)")
        .allow_empty_password(true)
        .interact()
        .context("Failed to read transcription key")?;

    if !transcription_key.is_empty() {
        config.transcription.api_key = Some(transcription_key);
    }

    let analysis_key = Password::new()
        .with_prompt("Analyse API key (OpenRouter)")
        .allow_empty_password(true)
        .interact()
        .context("Failed to read analysis key")?;

    if !analysis_key.is_empty() {
        config.analysis.api_key = Some(analysis_key);
    }

    config.save()?;
    println!("Keys saved. Restart the service to apply.");

    Ok(())
}

fn show_keys() -> Result<()> {
    let config = Config::load()?;

    println!(
        "Transcriptie ({}): {}",
        config.transcription.provider.as_deref().unwrap_or("-"),
        mask(config.transcription.api_key.as_deref())
    );
    println!(
        "Analyse ({}): {}",
        config.analysis.model.as_deref().unwrap_or("-"),
        mask(config.analysis.api_key.as_deref())
    );

    Ok(())
}

fn mask(key: Option<&str>) -> String {
    match key {
        Some(key) => {
            let chars: Vec<char> = key.chars().collect();
            if chars.len() <= 8 {
                return "****".to_string();
            }
            let start: String = chars[..4].iter().collect();
            let end: String = chars[chars.len() - 4..].iter().collect();
            format!("{}…{}", start, end)
        }
        None => "not configured".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_long_key() {
        let masked = mask(Some("gsk-abcdefghijklmnop"));
        assert!(masked.starts_with("gsk-"));
        assert!(masked.ends_with("mnop"));
        assert!(!masked.contains("efghij"));
    }

    #[test]
    fn test_mask_short_key() {
        assert_eq!(mask(Some("abc")), "****");
    }

    #[test]
    fn test_mask_missing_key() {
        assert_eq!(mask(None), "not configured");
    }

    #[test]
    fn test_mask_multibyte_key() {
        // Multibyte characters straddling the fourth byte must not panic
        let masked = mask(Some("abcédefghijklmné"));
        assert!(masked.starts_with("abcé"));
        assert!(masked.ends_with("lmné"));

        assert_eq!(mask(Some("éëçñâü")), "****");
    }
}
