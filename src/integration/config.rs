//! Application configuration
//!
//! Aggregates the component configurations and reads the credential from the
//! process environment once at startup.

use crate::llm::config::ChatConfig;
use crate::speech::stt::TranscriptionConfig;
use crate::{ParleyError, Result};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Optional override for the API base URL (tests, self-hosted gateways)
pub const BASE_URL_ENV: &str = "PARLEY_BASE_URL";

/// Configuration for the complete application
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// API key for both hosted endpoints
    pub api_key: String,

    /// Chat completion configuration
    pub chat: ChatConfig,

    /// Transcription configuration
    pub stt: TranscriptionConfig,

    /// Whether to enable microphone input
    pub enable_audio_input: bool,
}

impl AppConfig {
    /// Create a configuration with an explicit API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            chat: ChatConfig::default(),
            stt: TranscriptionConfig::default(),
            enable_audio_input: true,
        }
    }

    /// Read the configuration from the process environment
    ///
    /// A missing API key is fatal; there is no runtime recovery from a
    /// credential that was never provided.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            ParleyError::ConfigError(format!(
                "{} not set. Export your API key before starting.",
                API_KEY_ENV
            ))
        })?;

        let mut config = Self::new(api_key);

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            let trimmed = base_url.trim();
            if !trimmed.is_empty() {
                config.chat = config.chat.with_base_url(trimmed);
                config.stt = config.stt.with_base_url(trimmed);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the chat configuration
    pub fn with_chat(mut self, chat: ChatConfig) -> Self {
        self.chat = chat;
        self
    }

    /// Set the transcription configuration
    pub fn with_stt(mut self, stt: TranscriptionConfig) -> Self {
        self.stt = stt;
        self
    }

    /// Disable microphone input (text-only mode)
    pub fn without_audio_input(mut self) -> Self {
        self.enable_audio_input = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ParleyError::ConfigError("API key is empty".into()));
        }
        if self.chat.model.is_empty() {
            return Err(ParleyError::ConfigError("Chat model is required".into()));
        }
        if self.stt.model.is_empty() {
            return Err(ParleyError::ConfigError(
                "Transcription model is required".into(),
            ));
        }
        for url in [&self.chat.base_url, &self.stt.base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ParleyError::ConfigError(format!(
                    "Invalid base URL: {}",
                    url
                )));
            }
        }
        Ok(())
    }
}
