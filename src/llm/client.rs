//! Chat completion client for an OpenAI-compatible endpoint
//!
//! Sends the full conversation history and pulls the reply back as a
//! single-pass stream of text fragments.

use crate::llm::config::ChatConfig;
use crate::llm::sse::SseParser;
use crate::messages::ChatTurn;
use crate::{ParleyError, Result};
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

/// Request body for a streaming completion
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub stream: bool,
}

fn build_headers(api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| ParleyError::ConfigError(format!("Invalid API key value: {}", e)))?,
    );
    Ok(headers)
}

/// Client for the hosted chat completion endpoint
pub struct ChatClient {
    config: ChatConfig,
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatConfig, api_key: &str) -> Result<Self> {
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

    /// Build the request body for the given history
    ///
    /// The history goes out verbatim and in order; each turn carries only
    /// `role` and `content`.
    pub fn build_request(&self, turns: &[ChatTurn]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: turns.to_vec(),
            stream: true,
        }
    }

    /// Submit the history and return a pull-based stream of reply fragments
    ///
    /// Any request-level failure (network, auth, quota) comes back as
    /// `CompletionError`; nothing is retried.
    pub async fn complete(&self, turns: &[ChatTurn]) -> Result<FragmentStream> {
        let url = self.config.completions_url();
        debug!("Sending completion request to: {} ({} turns)", url, turns.len());

        let response = self
            .http
            .post(&url)
            .json(&self.build_request(turns))
            .send()
            .await
            .map_err(|e| ParleyError::CompletionError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(ParleyError::CompletionError(format!(
                "Completion request failed with status {}: {}",
                status, error_text
            )));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| ParleyError::CompletionError(format!("Stream read failed: {}", e)))
            })
            .boxed();

        Ok(FragmentStream::new(body))
    }
}

/// Pull-based, single-pass stream of completion fragments
///
/// Finite and not restartable: once `next_fragment` returns `None` the
/// stream is exhausted. Each pull blocks until the remote delivers the next
/// delta or signals the end of the stream.
pub struct FragmentStream {
    body: BoxStream<'static, Result<Vec<u8>>>,
    parser: SseParser,
    pending: VecDeque<String>,
    finished: bool,
}

impl FragmentStream {
    pub(crate) fn new(body: BoxStream<'static, Result<Vec<u8>>>) -> Self {
        Self {
            body,
            parser: SseParser::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Pull the next non-empty fragment
    ///
    /// Returns `None` on exhaustion, `Some(Err(..))` if the transport fails
    /// mid-stream. After an error the stream is finished.
    pub async fn next_fragment(&mut self) -> Option<Result<String>> {
        loop {
            if let Some(fragment) = self.pending.pop_front() {
                return Some(Ok(fragment));
            }

            if self.finished || self.parser.is_done() {
                return None;
            }

            match self.body.next().await {
                Some(Ok(chunk)) => {
                    self.pending.extend(self.parser.feed(&chunk));
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                }
            }
        }
    }
}
