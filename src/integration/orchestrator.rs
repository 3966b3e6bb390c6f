//! Session orchestrator
//!
//! Runs one interaction cycle at a time on a worker thread: take a user
//! turn (voice or typed), append it to the session history, stream the
//! completion back, and append the finished assistant turn. The UI never
//! blocks; it sends commands and polls events each frame.

use crate::integration::config::AppConfig;
use crate::llm::client::{ChatClient, FragmentStream};
use crate::messages::ChatTurn;
use crate::speech::stt::TranscriptionClient;
use crate::{ParleyError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Commands that can be sent to the orchestrator
#[derive(Debug, Clone)]
pub enum OrchestratorCommand {
    /// Start recording voice input
    StartRecording,

    /// Stop recording and run the voice cycle
    StopRecording,

    /// Cancel recording without processing
    CancelRecording,

    /// Run a cycle with typed text
    SendText(String),

    /// Clear the session history
    ClearHistory,

    /// Shut down the orchestrator
    Shutdown,
}

/// Events emitted by the orchestrator
#[derive(Debug, Clone)]
pub enum OrchestratorEvent {
    /// Recording has started
    RecordingStarted,

    /// Recording has stopped, transcription in progress
    RecordingStopped,

    /// Recording was cancelled
    RecordingCancelled,

    /// The stopped recording produced no usable text; the cycle ended
    /// without a user turn
    NoSpeechDetected,

    /// Transcription result; this text became the user turn
    Transcription(String),

    /// A completion request went out for the current history
    GenerationStarted { request_id: Uuid },

    /// One non-empty fragment of the streamed reply
    Fragment { text: String, request_id: Uuid },

    /// The reply is complete and appended to history
    Complete {
        response: String,
        request_id: Uuid,
        first_fragment_ms: u64,
        total_ms: u64,
    },

    /// A recoverable error; the cycle stopped without touching history
    /// beyond the turns already committed
    Error(String),

    /// The orchestrator has shut down
    Shutdown,
}

/// Handle for controlling the orchestrator from the UI
pub struct OrchestratorHandle {
    command_tx: Sender<OrchestratorCommand>,
    event_rx: Receiver<OrchestratorEvent>,

    /// Shared recording buffer, also read by the waveform display
    recording_buffer: Arc<Mutex<Vec<f32>>>,

    is_recording: Arc<AtomicBool>,
}

impl OrchestratorHandle {
    pub fn send_command(&self, cmd: OrchestratorCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| ParleyError::ChannelError(format!("Failed to send command: {}", e)))
    }

    pub fn try_recv_event(&self) -> Option<OrchestratorEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recording_buffer(&self) -> Arc<Mutex<Vec<f32>>> {
        Arc::clone(&self.recording_buffer)
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }
}

/// Session state owned exclusively by the worker thread
///
/// The history is the only mutable conversation state; nothing outside the
/// worker ever reads or writes it.
pub(crate) struct Session {
    history: Vec<ChatTurn>,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self {
            history: Vec::new(),
        }
    }

    /// Append the user turn and return the snapshot sent to the model
    pub(crate) fn begin_user_turn(&mut self, text: &str) -> &[ChatTurn] {
        self.history.push(ChatTurn::user(text));
        &self.history
    }

    /// Freeze the streamed reply as the assistant turn
    pub(crate) fn commit_assistant_turn(&mut self, response: String) {
        self.history.push(ChatTurn::assistant(response));
    }

    pub(crate) fn clear(&mut self) {
        self.history.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.history.len()
    }
}

/// Spawn the orchestrator worker and return the UI handle
pub struct Orchestrator;

impl Orchestrator {
    pub fn spawn(config: AppConfig) -> Result<OrchestratorHandle> {
        config.validate()?;

        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);
        let recording_buffer = Arc::new(Mutex::new(Vec::new()));
        let is_recording = Arc::new(AtomicBool::new(false));

        let worker_buffer = Arc::clone(&recording_buffer);
        let worker_flag = Arc::clone(&is_recording);

        std::thread::spawn(move || {
            worker(config, command_rx, event_tx, worker_buffer, worker_flag);
        });

        Ok(OrchestratorHandle {
            command_tx,
            event_rx,
            recording_buffer,
            is_recording,
        })
    }
}

fn worker(
    config: AppConfig,
    command_rx: Receiver<OrchestratorCommand>,
    event_tx: Sender<OrchestratorEvent>,
    recording_buffer: Arc<Mutex<Vec<f32>>>,
    is_recording: Arc<AtomicBool>,
) {
    info!("Orchestrator worker starting");

    let runtime = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            let _ = event_tx.send(OrchestratorEvent::Error(format!(
                "Runtime creation failed: {}",
                e
            )));
            let _ = event_tx.send(OrchestratorEvent::Shutdown);
            return;
        }
    };

    let transcriber = match TranscriptionClient::new(config.stt.clone(), &config.api_key) {
        Ok(client) => client,
        Err(e) => {
            let _ = event_tx.send(OrchestratorEvent::Error(e.user_message()));
            let _ = event_tx.send(OrchestratorEvent::Shutdown);
            return;
        }
    };

    let chat = match ChatClient::new(config.chat.clone(), &config.api_key) {
        Ok(client) => client,
        Err(e) => {
            let _ = event_tx.send(OrchestratorEvent::Error(e.user_message()));
            let _ = event_tx.send(OrchestratorEvent::Shutdown);
            return;
        }
    };

    // The cpal stream is not Send, so capture lives entirely on this thread
    #[cfg(feature = "audio-io")]
    let mut audio_input = if config.enable_audio_input {
        match crate::audio::AudioInput::new() {
            Ok(input) => Some(input),
            Err(e) => {
                warn!("Audio input unavailable, voice disabled: {}", e);
                let _ = event_tx.send(OrchestratorEvent::Error(e.user_message()));
                None
            }
        }
    } else {
        None
    };

    let mut session = Session::new();

    info!("Orchestrator worker ready");

    loop {
        let command = match command_rx.recv() {
            Ok(cmd) => cmd,
            Err(_) => break,
        };

        match command {
            OrchestratorCommand::StartRecording => {
                recording_buffer.lock().clear();

                #[cfg(feature = "audio-io")]
                match audio_input.as_mut() {
                    Some(input) => match input.start_recording(Arc::clone(&recording_buffer)) {
                        Ok(()) => {
                            is_recording.store(true, Ordering::SeqCst);
                            let _ = event_tx.send(OrchestratorEvent::RecordingStarted);
                        }
                        Err(e) => {
                            let _ = event_tx.send(OrchestratorEvent::Error(e.user_message()));
                        }
                    },
                    None => {
                        let _ = event_tx.send(OrchestratorEvent::Error(
                            ParleyError::AudioDeviceError("no input device".into())
                                .user_message(),
                        ));
                    }
                }

                #[cfg(not(feature = "audio-io"))]
                {
                    let _ = event_tx.send(OrchestratorEvent::Error(
                        ParleyError::AudioDeviceError("audio input disabled".into())
                            .user_message(),
                    ));
                }
            }

            OrchestratorCommand::CancelRecording => {
                #[cfg(feature = "audio-io")]
                if let Some(input) = audio_input.as_mut() {
                    let _ = input.stop_recording();
                }
                is_recording.store(false, Ordering::SeqCst);
                recording_buffer.lock().clear();
                let _ = event_tx.send(OrchestratorEvent::RecordingCancelled);
            }

            OrchestratorCommand::StopRecording => {
                #[cfg(feature = "audio-io")]
                let sample_rate = audio_input
                    .as_mut()
                    .map(|input| {
                        let _ = input.stop_recording();
                        input.sample_rate()
                    })
                    .unwrap_or(crate::audio::UPLOAD_SAMPLE_RATE);
                #[cfg(not(feature = "audio-io"))]
                let sample_rate = crate::audio::UPLOAD_SAMPLE_RATE;

                is_recording.store(false, Ordering::SeqCst);
                let _ = event_tx.send(OrchestratorEvent::RecordingStopped);

                let samples: Vec<f32> = std::mem::take(&mut *recording_buffer.lock());
                if samples.is_empty() {
                    // No voice input this cycle; not an error
                    debug!("Stop with empty recording buffer, skipping cycle");
                    let _ = event_tx.send(OrchestratorEvent::NoSpeechDetected);
                    continue;
                }

                match runtime.block_on(transcriber.transcribe(&samples, sample_rate)) {
                    Ok(text) if text.is_empty() => {
                        debug!("Transcription produced no text, skipping cycle");
                        let _ = event_tx.send(OrchestratorEvent::NoSpeechDetected);
                    }
                    Ok(text) => {
                        let _ = event_tx.send(OrchestratorEvent::Transcription(text.clone()));
                        run_completion_cycle(&runtime, &chat, &mut session, &event_tx, &text);
                    }
                    Err(e) => {
                        // The cycle yields no user turn; no typed fallback
                        warn!("Transcription failed: {}", e);
                        let _ = event_tx.send(OrchestratorEvent::Error(e.user_message()));
                    }
                }
            }

            OrchestratorCommand::SendText(text) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    continue;
                }
                run_completion_cycle(&runtime, &chat, &mut session, &event_tx, &text);
            }

            OrchestratorCommand::ClearHistory => {
                session.clear();
                debug!("Session history cleared");
            }

            OrchestratorCommand::Shutdown => {
                info!("Orchestrator shutting down");
                let _ = event_tx.send(OrchestratorEvent::Shutdown);
                break;
            }
        }
    }
}

/// One StreamingResponse phase: send the history, pull fragments, commit
///
/// A failed request or a mid-stream transport error discards the partial
/// reply; the assistant turn is only appended after the stream is exhausted.
fn run_completion_cycle(
    runtime: &Runtime,
    chat: &ChatClient,
    session: &mut Session,
    event_tx: &Sender<OrchestratorEvent>,
    user_text: &str,
) {
    let request_id = Uuid::new_v4();
    let _ = event_tx.send(OrchestratorEvent::GenerationStarted { request_id });

    let started = Instant::now();
    let mut first_fragment_ms = None;

    let history = session.begin_user_turn(user_text);
    let result: Result<String> = runtime.block_on(async {
        let stream = chat.complete(history).await?;
        pull_reply(stream, event_tx, request_id, started, &mut first_fragment_ms).await
    });

    finish_cycle(session, event_tx, request_id, started, first_fragment_ms, result);
}

/// Accumulate the streamed reply, emitting one event per non-empty fragment
async fn pull_reply(
    mut stream: FragmentStream,
    event_tx: &Sender<OrchestratorEvent>,
    request_id: Uuid,
    started: Instant,
    first_fragment_ms: &mut Option<u64>,
) -> Result<String> {
    let mut buffer = String::new();

    while let Some(fragment) = stream.next_fragment().await {
        let text = fragment?;
        if first_fragment_ms.is_none() {
            *first_fragment_ms = Some(started.elapsed().as_millis() as u64);
        }
        buffer.push_str(&text);
        let _ = event_tx.send(OrchestratorEvent::Fragment { text, request_id });
    }

    Ok(buffer)
}

/// Commit the finished reply, or report the failure and leave history alone
fn finish_cycle(
    session: &mut Session,
    event_tx: &Sender<OrchestratorEvent>,
    request_id: Uuid,
    started: Instant,
    first_fragment_ms: Option<u64>,
    result: Result<String>,
) {
    match result {
        Ok(response) => {
            let total_ms = started.elapsed().as_millis() as u64;
            session.commit_assistant_turn(response.clone());
            debug!(
                "Completion finished: {} chars, {} turns in history",
                response.len(),
                session.len()
            );
            let _ = event_tx.send(OrchestratorEvent::Complete {
                response,
                request_id,
                first_fragment_ms: first_fragment_ms.unwrap_or(total_ms),
                total_ms,
            });
        }
        Err(e) => {
            warn!("Completion failed: {}", e);
            let _ = event_tx.send(OrchestratorEvent::Error(e.user_message()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Role;

    #[test]
    fn test_user_turn_snapshot_includes_full_history() {
        let mut session = Session::new();
        session.begin_user_turn("one");
        session.commit_assistant_turn("two".into());

        let snapshot = session.begin_user_turn("three");
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].content, "one");
        assert_eq!(snapshot[1].role, Role::Assistant);
        assert_eq!(snapshot[2].content, "three");
    }

    #[test]
    fn test_failed_completion_leaves_no_assistant_turn() {
        let mut session = Session::new();
        session.begin_user_turn("hi");
        // A failed cycle never calls commit_assistant_turn
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_mid_stream_failure_discards_partial_reply() {
        use futures::StreamExt;

        let runtime = Runtime::new().unwrap();
        let (event_tx, event_rx) = bounded(100);
        let mut session = Session::new();

        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let mut first_fragment_ms = None;

        session.begin_user_turn("hi");

        // One delta arrives, then the transport dies
        let body = futures::stream::iter(vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"par\"}}]}\n\n".to_vec()),
            Err(ParleyError::CompletionError("connection reset".into())),
        ])
        .boxed();
        let stream = FragmentStream::new(body);

        let result = runtime.block_on(pull_reply(
            stream,
            &event_tx,
            request_id,
            started,
            &mut first_fragment_ms,
        ));
        assert!(result.is_err());

        finish_cycle(
            &mut session,
            &event_tx,
            request_id,
            started,
            first_fragment_ms,
            result,
        );

        // The user turn stays; the partial reply never becomes a turn
        assert_eq!(session.len(), 1);

        let events: Vec<_> = event_rx.try_iter().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, OrchestratorEvent::Fragment { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, OrchestratorEvent::Error(_))));
        assert!(!events
            .iter()
            .any(|e| matches!(e, OrchestratorEvent::Complete { .. })));
    }

    #[test]
    fn test_clear_history() {
        let mut session = Session::new();
        session.begin_user_turn("hi");
        session.commit_assistant_turn("hello".into());
        session.clear();
        assert_eq!(session.len(), 0);
    }

    #[test]
    fn test_spawn_and_shutdown() {
        let config = AppConfig::new("test-key").without_audio_input();
        let handle = Orchestrator::spawn(config).unwrap();

        handle.send_command(OrchestratorCommand::Shutdown).unwrap();

        // The worker acknowledges shutdown
        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        loop {
            if let Some(OrchestratorEvent::Shutdown) = handle.try_recv_event() {
                break;
            }
            assert!(Instant::now() < deadline, "no shutdown event received");
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
    }

    #[test]
    fn test_stop_with_empty_buffer_reports_no_speech() {
        let config = AppConfig::new("test-key").without_audio_input();
        let handle = Orchestrator::spawn(config).unwrap();

        handle
            .send_command(OrchestratorCommand::StopRecording)
            .unwrap();
        handle.send_command(OrchestratorCommand::Shutdown).unwrap();

        let mut events = Vec::new();
        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        loop {
            match handle.try_recv_event() {
                Some(OrchestratorEvent::Shutdown) => break,
                Some(event) => events.push(event),
                None => {
                    assert!(Instant::now() < deadline, "no shutdown event received");
                    std::thread::sleep(std::time::Duration::from_millis(10));
                }
            }
        }

        assert!(events
            .iter()
            .any(|e| matches!(e, OrchestratorEvent::RecordingStopped)));
        assert!(events
            .iter()
            .any(|e| matches!(e, OrchestratorEvent::NoSpeechDetected)));
        assert!(!events
            .iter()
            .any(|e| matches!(e, OrchestratorEvent::GenerationStarted { .. })));
    }

    #[test]
    fn test_empty_text_is_a_noop() {
        let config = AppConfig::new("test-key").without_audio_input();
        let handle = Orchestrator::spawn(config).unwrap();

        handle
            .send_command(OrchestratorCommand::SendText("   ".into()))
            .unwrap();
        handle.send_command(OrchestratorCommand::Shutdown).unwrap();

        // Only the shutdown event arrives; no generation was started
        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        loop {
            match handle.try_recv_event() {
                Some(OrchestratorEvent::Shutdown) => break,
                Some(event) => panic!("unexpected event: {:?}", event),
                None => {
                    assert!(Instant::now() < deadline, "no shutdown event received");
                    std::thread::sleep(std::time::Duration::from_millis(10));
                }
            }
        }
    }
}
