//! UI recording state tests
//!
//! These tests verify the recording state machine and transitions.

use parley::integration::OrchestratorEvent;
use parley::ui::{AppState, RecordingState};

#[test]
fn test_initial_state_is_idle() {
    let state = AppState::new();
    assert_eq!(
        state.recording_state,
        RecordingState::Idle,
        "Initial state should be Idle"
    );
}

#[test]
fn test_start_recording_transitions_to_recording() {
    let mut state = AppState::new();

    state.start_recording();

    assert_eq!(
        state.recording_state,
        RecordingState::Recording,
        "State should be Recording after start_recording()"
    );
}

#[test]
fn test_stop_recording_transitions_to_processing() {
    let mut state = AppState::new();

    state.start_recording();
    state.stop_recording();

    assert_eq!(
        state.recording_state,
        RecordingState::Processing,
        "State should be Processing after stop_recording()"
    );
}

#[test]
fn test_cancel_recording_transitions_to_idle() {
    let mut state = AppState::new();

    state.start_recording();
    state.cancel_recording();

    assert_eq!(
        state.recording_state,
        RecordingState::Idle,
        "State should be Idle after cancel_recording()"
    );
}

#[test]
fn test_stop_recording_only_works_when_recording() {
    let mut state = AppState::new();

    state.stop_recording();
    assert_eq!(
        state.recording_state,
        RecordingState::Idle,
        "stop_recording when Idle should keep Idle state"
    );

    state.start_recording();
    state.stop_recording(); // Now Processing
    state.stop_recording(); // Should do nothing
    assert_eq!(
        state.recording_state,
        RecordingState::Processing,
        "stop_recording when Processing should keep Processing state"
    );
}

#[test]
fn test_waveform_data_cleared_on_start() {
    let mut state = AppState::new();

    state.waveform_data = vec![0.1, 0.2, 0.3, 0.4, 0.5];

    state.start_recording();

    assert!(
        state.waveform_data.is_empty(),
        "Waveform data should be cleared when recording starts"
    );
}

#[test]
fn test_waveform_data_cleared_on_cancel() {
    let mut state = AppState::new();

    state.start_recording();
    state.waveform_data = vec![0.1, 0.2, 0.3];

    state.cancel_recording();

    assert!(
        state.waveform_data.is_empty(),
        "Waveform data should be cleared when recording is cancelled"
    );
}

#[test]
fn test_processing_start_time_set_on_stop() {
    let mut state = AppState::new();

    assert!(state.processing_started.is_none());

    state.start_recording();
    state.stop_recording();

    assert!(
        state.processing_started.is_some(),
        "Processing start time should be recorded for the timeout guard"
    );
}

#[test]
fn test_empty_recording_returns_to_idle() {
    let mut state = AppState::new();

    state.start_recording();
    state.stop_recording();
    state.apply_event(OrchestratorEvent::RecordingStopped);
    state.apply_event(OrchestratorEvent::NoSpeechDetected);

    assert_eq!(
        state.recording_state,
        RecordingState::Idle,
        "A recording with no usable speech must re-enable input"
    );
    assert!(state.processing_started.is_none());
    assert!(
        state.messages.is_empty(),
        "No speech means no user turn this cycle"
    );
}

#[test]
fn test_transcription_ends_processing() {
    let mut state = AppState::new();

    state.start_recording();
    state.stop_recording();
    state.apply_event(OrchestratorEvent::Transcription("hello".into()));

    assert_eq!(state.recording_state, RecordingState::Idle);
    assert!(state.processing_started.is_none());
}

#[test]
fn test_error_during_processing_returns_to_idle() {
    let mut state = AppState::new();

    state.start_recording();
    state.stop_recording();
    state.apply_event(OrchestratorEvent::Error("Speech recognition failed".into()));

    assert_eq!(state.recording_state, RecordingState::Idle);
    assert!(state.last_error.is_some());
    assert!(
        state.messages.is_empty(),
        "A failed transcription must not create a user turn"
    );
}

#[test]
fn test_state_machine_full_cycle() {
    let mut state = AppState::new();

    assert_eq!(state.recording_state, RecordingState::Idle);

    state.start_recording();
    assert_eq!(state.recording_state, RecordingState::Recording);

    state.stop_recording();
    assert_eq!(state.recording_state, RecordingState::Processing);

    state.apply_event(OrchestratorEvent::Transcription("round trip".into()));
    assert_eq!(state.recording_state, RecordingState::Idle);

    let messages = state.messages.get_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "round trip");
}

#[test]
fn test_debug_info_logs_on_state_changes() {
    let mut state = AppState::new();

    state.start_recording();
    state.stop_recording();
    state.cancel_recording();

    assert!(
        state.debug_info.log_messages.len() >= 3,
        "State transitions should leave log entries"
    );
}

#[test]
fn test_update_waveform() {
    let mut state = AppState::new();

    state.update_waveform(&[0.1, 0.2, 0.3]);
    assert_eq!(state.waveform_data.len(), 3);
}

#[test]
fn test_update_waveform_downsamples_large_input() {
    let mut state = AppState::new();

    let samples: Vec<f32> = (0..10_000).map(|i| i as f32 / 10_000.0).collect();
    state.update_waveform(&samples);

    assert!(
        state.waveform_data.len() <= 1024,
        "Large inputs should be downsampled for display"
    );
}
