use crate::audio::resampler::AudioResampler;
use crate::audio::UPLOAD_SAMPLE_RATE;
use crate::Result;

/// Audio preprocessor preparing captured audio for the transcription endpoint
pub struct AudioPreprocessor {
    resampler: Option<AudioResampler>,
    target_sample_rate: u32,
    normalization_enabled: bool,
}

impl AudioPreprocessor {
    pub fn new(
        input_sample_rate: u32,
        target_sample_rate: u32,
        normalization_enabled: bool,
    ) -> Result<Self> {
        let resampler = if input_sample_rate != target_sample_rate {
            Some(AudioResampler::new(input_sample_rate, target_sample_rate)?)
        } else {
            None
        };

        Ok(Self {
            resampler,
            target_sample_rate,
            normalization_enabled,
        })
    }

    /// Preprocessor for the standard 16 kHz upload format
    pub fn for_upload(input_sample_rate: u32) -> Result<Self> {
        Self::new(input_sample_rate, UPLOAD_SAMPLE_RATE, true)
    }

    /// Process mono audio samples
    pub fn process(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let resampled = if let Some(ref mut resampler) = self.resampler {
            resampler.resample(input)?
        } else {
            input.to_vec()
        };

        let normalized = if self.normalization_enabled {
            normalize_audio(&resampled)
        } else {
            resampled
        };

        Ok(normalized)
    }

    pub fn target_sample_rate(&self) -> u32 {
        self.target_sample_rate
    }
}

/// Normalize audio to a peak amplitude of 1.0
pub fn normalize_audio(samples: &[f32]) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let peak = samples
        .iter()
        .map(|&s| s.abs())
        .fold(0.0f32, |max, val| max.max(val));

    if peak == 0.0 || peak.is_nan() {
        return samples.to_vec();
    }

    samples.iter().map(|&s| s / peak).collect()
}

/// Downmix interleaved stereo to mono by averaging channels
pub fn stereo_to_mono(input: &[f32]) -> Vec<f32> {
    if input.len() % 2 != 0 {
        return input.to_vec();
    }

    input
        .chunks(2)
        .map(|frame| (frame[0] + frame[1]) / 2.0)
        .collect()
}
