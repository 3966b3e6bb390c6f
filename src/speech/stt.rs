//! Transcription client for the hosted speech-recognition endpoint
//!
//! Captured samples are always repackaged into an uncompressed WAV container
//! before upload; the remote call is never attempted if that preparation
//! fails.

use crate::audio::preprocessor::AudioPreprocessor;
use crate::audio::wav::encode_wav;
use crate::audio::UPLOAD_SAMPLE_RATE;
use crate::{ParleyError, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

/// Configuration for the transcription client
#[derive(Clone, Debug)]
pub struct TranscriptionConfig {
    /// Model identifier sent with every transcription request
    pub model: String,

    /// Base URL of the OpenAI-compatible API surface
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: "whisper-large-v3".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            timeout_secs: 120,
        }
    }
}

impl TranscriptionConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Endpoint URL for transcription uploads
    pub fn transcriptions_url(&self) -> String {
        format!(
            "{}/audio/transcriptions",
            self.base_url.trim_end_matches('/')
        )
    }
}

fn build_headers(api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| ParleyError::ConfigError(format!("Invalid API key value: {}", e)))?,
    );
    Ok(headers)
}

/// Client for the hosted transcription endpoint
pub struct TranscriptionClient {
    config: TranscriptionConfig,
    http: reqwest::Client,
}

impl TranscriptionClient {
    pub fn new(config: TranscriptionConfig, api_key: &str) -> Result<Self> {
        let headers = build_headers(api_key)?;
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ParleyError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { config, http })
    }

    /// Resample, normalize and encode the recording as an uploadable WAV
    ///
    /// This always runs before any network traffic. Empty recordings and
    /// conversion failures surface as `AudioConversionError`.
    pub fn prepare_upload(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
        if samples.is_empty() {
            return Err(ParleyError::AudioConversionError(
                "recording is empty".into(),
            ));
        }

        let mut preprocessor = AudioPreprocessor::for_upload(sample_rate)?;
        let prepared = preprocessor.process(samples)?;
        encode_wav(&prepared, UPLOAD_SAMPLE_RATE)
    }

    /// Transcribe a captured recording
    pub async fn transcribe(&self, samples: &[f32], sample_rate: u32) -> Result<String> {
        let wav_data = self.prepare_upload(samples, sample_rate)?;
        debug!(
            "Prepared WAV upload: {} bytes from {} samples at {} Hz",
            wav_data.len(),
            samples.len(),
            sample_rate
        );

        let audio_part = Part::bytes(wav_data)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| {
                ParleyError::TranscriptionError(format!("Failed to create audio part: {}", e))
            })?;

        let form = Form::new()
            .part("file", audio_part)
            .text("model", self.config.model.clone())
            .text("response_format", "text")
            .text("temperature", "0");

        let url = self.config.transcriptions_url();
        debug!("Sending transcription request to: {}", url);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ParleyError::TranscriptionError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(ParleyError::TranscriptionError(format!(
                "Transcription failed with status {}: {}",
                status, error_text
            )));
        }

        let transcript = response.text().await.map_err(|e| {
            ParleyError::TranscriptionError(format!("Failed to read transcription: {}", e))
        })?;

        debug!("Transcription completed: {} chars", transcript.len());

        Ok(transcript.trim().to_string())
    }
}
