//! In-memory WAV container encoding
//!
//! Recorded audio is repackaged into an uncompressed 16-bit PCM WAV buffer
//! before upload, so the transcription endpoint never sees a device- or
//! capture-specific format.

use crate::{ParleyError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Encode mono f32 samples as a 16-bit PCM WAV file in memory
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    if samples.is_empty() {
        return Err(ParleyError::AudioConversionError(
            "no audio samples to encode".into(),
        ));
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut buffer, spec).map_err(|e| {
            ParleyError::AudioConversionError(format!("failed to create WAV writer: {}", e))
        })?;

        for &sample in samples {
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer.write_sample(sample_i16).map_err(|e| {
                ParleyError::AudioConversionError(format!("failed to write sample: {}", e))
            })?;
        }

        writer.finalize().map_err(|e| {
            ParleyError::AudioConversionError(format!("failed to finalize WAV: {}", e))
        })?;
    }

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_an_error() {
        let result = encode_wav(&[], 16000);
        assert!(matches!(result, Err(ParleyError::AudioConversionError(_))));
    }

    #[test]
    fn test_encodes_riff_header() {
        let samples = vec![0.0f32; 1600];
        let wav = encode_wav(&samples, 16000).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
    }

    #[test]
    fn test_output_size_matches_sample_count() {
        let samples = vec![0.5f32; 1000];
        let wav = encode_wav(&samples, 16000).unwrap();
        // 44-byte canonical header + 2 bytes per 16-bit sample
        assert_eq!(wav.len(), 44 + samples.len() * 2);
    }

    #[test]
    fn test_clipping_is_clamped() {
        let samples = vec![2.0f32, -2.0f32];
        assert!(encode_wav(&samples, 16000).is_ok());
    }
}
