//! Incremental parser for the completion endpoint's SSE stream
//!
//! The endpoint delivers `data: {json}` lines terminated by a
//! `data: [DONE]` marker. Network chunks can split an event anywhere, so the
//! parser buffers bytes and only interprets complete lines.

use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ChunkResponse {
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Streaming SSE parser yielding non-empty content deltas
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    done: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the end-of-stream marker has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed a chunk of the response body, returning completed fragments
    ///
    /// Empty deltas and role-only events are dropped here, so callers only
    /// ever see fragments that change the visible response.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut fragments = Vec::new();

        if self.done {
            return fragments;
        }

        self.buffer.extend_from_slice(chunk);

        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            let Some(payload) = line.strip_prefix("data:") else {
                continue;
            };
            let payload = payload.trim_start();

            if payload == "[DONE]" {
                self.done = true;
                break;
            }

            match serde_json::from_str::<ChunkResponse>(payload) {
                Ok(event) => {
                    let delta = event
                        .choices
                        .first()
                        .and_then(|choice| choice.delta.content.clone());
                    if let Some(text) = delta {
                        if !text.is_empty() {
                            fragments.push(text);
                        }
                    }
                }
                Err(e) => {
                    debug!("Skipping unparseable SSE event: {}", e);
                }
            }
        }

        fragments
    }
}
