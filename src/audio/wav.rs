//! WAV file power source.

use std::path::Path;

use super::fft::ChannelAnalyzer;
use crate::error::Result;
use crate::params::AnalysisConfig;

/// Per-frame channel powers of a WAV file, mixed down to mono
pub struct WavPowerSource {
    samples: Vec<f32>,
    position: usize,
    samples_per_frame: usize,
    analyzer: ChannelAnalyzer,
}

impl WavPowerSource {
    /// Open a WAV file; its own sample rate replaces the configured one
    pub fn open(
        path: impl AsRef<Path>,
        mut config: AnalysisConfig,
        channels: usize,
    ) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        config.sample_rate_hz = spec.sample_rate as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        let mono = interleaved
            .chunks(spec.channels.max(1) as usize)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        Self::from_samples(mono, config, channels)
    }

    /// Analyze already-decoded mono samples
    pub fn from_samples(
        samples: Vec<f32>,
        config: AnalysisConfig,
        channels: usize,
    ) -> Result<Self> {
        let samples_per_frame = config.samples_per_frame();
        Ok(Self {
            samples,
            position: 0,
            samples_per_frame,
            analyzer: ChannelAnalyzer::new(config, channels)?,
        })
    }

    /// Total frames this source yields
    pub fn frame_count(&self) -> usize {
        self.samples.len().div_ceil(self.samples_per_frame)
    }
}

impl Iterator for WavPowerSource {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        if self.position >= self.samples.len() {
            return None;
        }
        let end = (self.position + self.samples_per_frame).min(self.samples.len());
        let powers = self.analyzer.analyze(&self.samples[self.position..end]);
        self.position = end;
        Some(powers)
    }
}
