//! Speech-to-text via the hosted transcription endpoint

pub mod stt;

pub use stt::{TranscriptionClient, TranscriptionConfig};
