#[cfg(feature = "audio-io")]
pub mod input;
pub mod preprocessor;
pub mod resampler;
pub mod wav;

#[cfg(feature = "audio-io")]
pub use input::AudioInput;
pub use preprocessor::AudioPreprocessor;
pub use resampler::AudioResampler;
pub use wav::encode_wav;

/// Sample rate the transcription endpoint receives
pub const UPLOAD_SAMPLE_RATE: u32 = 16000;
