//! Process configuration, read once at startup

use crate::llm::GenerationOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable GEMINI_API_KEY is not set")]
    MissingApiKey,
}

/// Settings for the chat server
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub port: u16,
    pub model: String,
    /// Override for the Gemini API root (gateways, tests)
    pub base_url: Option<String>,
    pub knowledge_base_path: PathBuf,
    pub site_html_path: PathBuf,
    pub generation: GenerationOptions,
    pub llm_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let defaults = GenerationOptions::default();

        Ok(Self {
            api_key,
            port: parse_or(&lookup, "PORT", 3001),
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-flash".to_string()),
            base_url: lookup("GEMINI_BASE_URL"),
            knowledge_base_path: lookup("KNOWLEDGE_BASE_PATH")
                .map_or_else(|| PathBuf::from("knowledge-base.json"), PathBuf::from),
            site_html_path: lookup("SITE_HTML_PATH")
                .map_or_else(|| PathBuf::from("../index.html"), PathBuf::from),
            generation: GenerationOptions {
                max_output_tokens: Some(parse_or(
                    &lookup,
                    "MAX_OUTPUT_TOKENS",
                    defaults.max_output_tokens.unwrap_or(500),
                )),
                temperature: Some(parse_or(
                    &lookup,
                    "TEMPERATURE",
                    defaults.temperature.unwrap_or(0.7),
                )),
            },
            llm_timeout: Duration::from_secs(parse_or(&lookup, "LLM_TIMEOUT_SECS", 60)),
        })
    }
}

fn parse_or<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Unparseable setting, using default");
            default
        }),
        None => default,
    }
}
