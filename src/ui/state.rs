//! Application state management
//!
//! Central state for the Parley UI. Orchestrator events are drained once
//! per frame in `poll_events`.

use crate::integration::{OrchestratorCommand, OrchestratorEvent, OrchestratorHandle};
use crate::messages::{Message, MessageStorage, Role};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// How long the UI waits for a transcription before giving up
const PROCESSING_TIMEOUT: Duration = Duration::from_secs(30);

/// Recording state for voice input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// Not recording
    Idle,
    /// Currently recording audio
    Recording,
    /// Waiting for the transcription result
    Processing,
}

/// Working buffer for the in-progress assistant reply
#[derive(Debug, Clone, Default)]
pub struct StreamingResponse {
    /// The accumulated reply text
    pub text: String,
    /// Whether a reply is being streamed
    pub is_generating: bool,
    /// Request ID this reply belongs to
    pub request_id: Option<Uuid>,
    /// Time to first fragment in milliseconds
    pub first_fragment_ms: Option<u64>,
    /// Total generation time in milliseconds
    pub total_ms: Option<u64>,
}

/// Debug information displayed in the debug panel
#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    /// Last transcription result
    pub transcription_status: String,
    /// Completion timing stats
    pub completion_stats: String,
    /// Current frame rate
    pub fps: f32,
    /// Recent log messages
    pub log_messages: VecDeque<String>,
}

impl DebugInfo {
    pub fn new() -> Self {
        Self {
            log_messages: VecDeque::with_capacity(100),
            ..Default::default()
        }
    }

    pub fn add_log(&mut self, message: String) {
        if self.log_messages.len() >= 100 {
            self.log_messages.pop_front();
        }
        self.log_messages.push_back(message);
    }
}

/// Central application state
pub struct AppState {
    /// Display transcript
    pub messages: MessageStorage,

    /// Current text input
    pub input_text: String,

    /// Recording state
    pub recording_state: RecordingState,

    /// In-progress assistant reply
    pub streaming_response: StreamingResponse,

    /// Debug information
    pub debug_info: DebugInfo,

    /// Whether to show the debug panel
    pub show_debug_panel: bool,

    /// Waveform data for visualization (recent audio samples)
    pub waveform_data: Vec<f32>,

    /// Handle to the orchestrator worker
    pub orchestrator: Option<OrchestratorHandle>,

    /// Last error message, shown as a banner until dismissed
    pub last_error: Option<String>,

    /// When transcription processing started, for the timeout guard
    pub processing_started: Option<Instant>,

    /// Frame time tracking for FPS
    frame_times: VecDeque<f64>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            messages: MessageStorage::new(),
            input_text: String::new(),
            recording_state: RecordingState::Idle,
            streaming_response: StreamingResponse::default(),
            debug_info: DebugInfo::new(),
            show_debug_panel: false,
            waveform_data: Vec::with_capacity(1024),
            orchestrator: None,
            last_error: None,
            processing_started: None,
            frame_times: VecDeque::with_capacity(60),
        }
    }

    pub fn with_orchestrator(mut self, handle: OrchestratorHandle) -> Self {
        self.orchestrator = Some(handle);
        self
    }

    /// Update FPS calculation
    pub fn update_fps(&mut self, delta_time: f64) {
        self.frame_times.push_back(delta_time);
        if self.frame_times.len() > 60 {
            self.frame_times.pop_front();
        }

        if !self.frame_times.is_empty() {
            let avg: f64 = self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64;
            self.debug_info.fps = if avg > 0.0 { 1.0 / avg as f32 } else { 0.0 };
        }
    }

    /// Send the typed message as the next user turn
    pub fn send_message(&mut self) {
        let text = self.input_text.trim().to_string();
        if text.is_empty() {
            return;
        }

        self.messages.add(Message::new(Role::User, text.clone()));

        if let Some(handle) = &self.orchestrator {
            let _ = handle.send_command(OrchestratorCommand::SendText(text));
        }

        self.streaming_response = StreamingResponse {
            is_generating: true,
            ..Default::default()
        };

        self.input_text.clear();
    }

    /// Start recording audio
    pub fn start_recording(&mut self) {
        self.recording_state = RecordingState::Recording;
        self.waveform_data.clear();
        self.debug_info.add_log("Recording started".to_string());

        if let Some(handle) = &self.orchestrator {
            let _ = handle.send_command(OrchestratorCommand::StartRecording);
        }
    }

    /// Stop recording and wait for the transcription
    pub fn stop_recording(&mut self) {
        if self.recording_state != RecordingState::Recording {
            return;
        }

        self.recording_state = RecordingState::Processing;
        self.processing_started = Some(Instant::now());
        self.debug_info
            .add_log("Recording stopped, processing...".to_string());

        if let Some(handle) = &self.orchestrator {
            let _ = handle.send_command(OrchestratorCommand::StopRecording);
        }
    }

    /// Cancel recording without processing
    pub fn cancel_recording(&mut self) {
        self.recording_state = RecordingState::Idle;
        self.waveform_data.clear();
        self.debug_info.add_log("Recording cancelled".to_string());

        if let Some(handle) = &self.orchestrator {
            let _ = handle.send_command(OrchestratorCommand::CancelRecording);
        }
    }

    /// Drain orchestrator events
    pub fn poll_events(&mut self) {
        let events: Vec<OrchestratorEvent> = if let Some(handle) = &self.orchestrator {
            let mut drained = Vec::new();
            while let Some(event) = handle.try_recv_event() {
                drained.push(event);
            }
            drained
        } else {
            Vec::new()
        };

        for event in events {
            self.apply_event(event);
        }

        self.check_processing_timeout();
        self.mirror_recording_buffer();
    }

    /// Apply one orchestrator event to the UI state
    pub fn apply_event(&mut self, event: OrchestratorEvent) {
        match event {
            OrchestratorEvent::RecordingStarted => {
                self.debug_info.add_log("Capture stream running".to_string());
            }
            OrchestratorEvent::RecordingStopped => {
                // Stay in Processing until the transcription arrives
            }
            OrchestratorEvent::RecordingCancelled => {
                self.recording_state = RecordingState::Idle;
            }
            OrchestratorEvent::NoSpeechDetected => {
                self.recording_state = RecordingState::Idle;
                self.processing_started = None;
                self.debug_info.add_log("No speech detected".to_string());
            }
            OrchestratorEvent::Transcription(text) => {
                self.recording_state = RecordingState::Idle;
                self.processing_started = None;
                self.debug_info.transcription_status = format!("Last: \"{}\"", truncate(&text, 50));
                self.messages.add(Message::new(Role::User, text));
            }
            OrchestratorEvent::GenerationStarted { request_id } => {
                self.streaming_response = StreamingResponse {
                    is_generating: true,
                    request_id: Some(request_id),
                    ..Default::default()
                };
            }
            OrchestratorEvent::Fragment { text, request_id } => {
                if self.streaming_response.request_id == Some(request_id)
                    || self.streaming_response.request_id.is_none()
                {
                    self.streaming_response.request_id = Some(request_id);
                    self.streaming_response.text.push_str(&text);
                }
            }
            OrchestratorEvent::Complete {
                response,
                request_id,
                first_fragment_ms,
                total_ms,
            } => {
                if self.streaming_response.request_id == Some(request_id)
                    || self.streaming_response.request_id.is_none()
                {
                    self.streaming_response.text = response.clone();
                    self.streaming_response.is_generating = false;
                    self.streaming_response.first_fragment_ms = Some(first_fragment_ms);
                    self.streaming_response.total_ms = Some(total_ms);

                    self.messages.add(Message::new(Role::Assistant, response));

                    self.debug_info.completion_stats = format!(
                        "First fragment: {}ms, Total: {}ms",
                        first_fragment_ms, total_ms
                    );
                }
            }
            OrchestratorEvent::Error(message) => {
                self.last_error = Some(message.clone());
                self.streaming_response.is_generating = false;
                self.recording_state = RecordingState::Idle;
                self.processing_started = None;
                self.debug_info.add_log(format!("Error: {}", message));
            }
            OrchestratorEvent::Shutdown => {
                self.debug_info.add_log("Orchestrator shutdown".to_string());
            }
        }
    }

    /// Give up on a transcription that never came back
    fn check_processing_timeout(&mut self) {
        if self.recording_state != RecordingState::Processing {
            return;
        }
        if let Some(started) = self.processing_started {
            if started.elapsed() > PROCESSING_TIMEOUT {
                self.recording_state = RecordingState::Idle;
                self.processing_started = None;
                self.debug_info
                    .add_log("Transcription timed out".to_string());
            }
        }
    }

    /// Copy recent capture samples into the waveform display
    fn mirror_recording_buffer(&mut self) {
        if self.recording_state != RecordingState::Recording {
            return;
        }
        let Some(buffer) = self.orchestrator.as_ref().map(|h| h.recording_buffer()) else {
            return;
        };
        let tail: Vec<f32> = {
            let samples = buffer.lock();
            samples.iter().rev().take(1024).rev().copied().collect()
        };
        // Replace the display snapshot; the tail overlaps the previous
        // frame's and appending would duplicate samples
        if !tail.is_empty() {
            self.waveform_data = tail;
        }
    }

    /// Add audio samples to the waveform visualization
    pub fn update_waveform(&mut self, samples: &[f32]) {
        self.update_waveform_from(samples);
    }

    fn update_waveform_from(&mut self, samples: &[f32]) {
        const MAX_SAMPLES: usize = 1024;

        if samples.len() > MAX_SAMPLES {
            let step = samples.len() / MAX_SAMPLES;
            self.waveform_data = samples
                .iter()
                .step_by(step)
                .take(MAX_SAMPLES)
                .copied()
                .collect();
        } else {
            self.waveform_data.extend_from_slice(samples);
            if self.waveform_data.len() > MAX_SAMPLES {
                self.waveform_data
                    .drain(0..self.waveform_data.len() - MAX_SAMPLES);
            }
        }
    }

    /// Clear the transcript and the session history
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.streaming_response = StreamingResponse::default();
        if let Some(handle) = &self.orchestrator {
            let _ = handle.send_command(OrchestratorCommand::ClearHistory);
        }
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
