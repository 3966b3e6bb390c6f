pub mod audio;
pub mod integration;
pub mod llm;
pub mod messages;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParleyError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Audio conversion error: {0}")]
    AudioConversionError(String),

    #[error("Transcription error: {0}")]
    TranscriptionError(String),

    #[error("Completion error: {0}")]
    CompletionError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl ParleyError {
    /// Check if this error is recoverable within the session
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Missing credentials or bad settings require a restart
            ParleyError::ConfigError(_) => false,
            // Hardware errors may require user intervention
            ParleyError::AudioDeviceError(_) => false,
            // These are typically transient errors
            ParleyError::AudioConversionError(_) => true,
            ParleyError::TranscriptionError(_) => true,
            ParleyError::CompletionError(_) => true,
            ParleyError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ParleyError::ConfigError(_) => {
                "Configuration error. Please check your API key and settings.".to_string()
            }
            ParleyError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone.".to_string()
            }
            ParleyError::AudioConversionError(_) => {
                "Could not prepare the recorded audio. Please try again.".to_string()
            }
            ParleyError::TranscriptionError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            ParleyError::CompletionError(_) => {
                "Failed to get response from the model. Please try again.".to_string()
            }
            ParleyError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ParleyError>;
