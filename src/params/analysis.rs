//! Audio analysis configuration for the host-side power providers.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// FFT analysis configuration with per-channel frequency bands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Audio sample rate (Hz); WAV input overrides this with the file's rate
    pub sample_rate_hz: usize,

    /// FFT window size (must be power of 2)
    pub fft_size: usize,

    /// Time between frames (milliseconds)
    /// 50 = 20 Hz, the fastest rate the panels are driven at
    pub frame_interval_ms: u64,

    /// Lower edge of the lowest channel band (Hz)
    pub min_frequency_hz: f32,

    /// Upper edge of the highest channel band (Hz)
    pub max_frequency_hz: f32,

    /// Mean bin magnitude → power units (powers are clamped to 0-255)
    pub power_scale: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 1024,
            frame_interval_ms: 50,
            min_frequency_hz: 40.0,
            max_frequency_hz: 8000.0,
            power_scale: 16.0,
        }
    }
}

impl AnalysisConfig {
    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        ((hz * self.fft_size as f32) / self.sample_rate_hz as f32) as usize
    }

    /// Audio samples consumed per frame
    pub fn samples_per_frame(&self) -> usize {
        (self.sample_rate_hz as u64 * self.frame_interval_ms / 1000).max(1) as usize
    }

    /// FFT bin range for `channel` out of `channels`, log-spaced between the band edges.
    ///
    /// Every band holds at least one bin and never reaches past Nyquist.
    pub fn channel_bins(&self, channel: usize, channels: usize) -> Range<usize> {
        let ratio = self.max_frequency_hz / self.min_frequency_hz;
        let edge = |k: usize| self.min_frequency_hz * ratio.powf(k as f32 / channels as f32);

        let nyquist_bin = self.fft_size / 2;
        let start = self.hz_to_bin(edge(channel)).min(nyquist_bin - 1);
        let end = self.hz_to_bin(edge(channel + 1)).clamp(start + 1, nyquist_bin);
        start..end
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 2 {
            return Err(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            ));
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if self.frame_interval_ms == 0 {
            return Err("Frame interval must be > 0".to_string());
        }
        if !(self.min_frequency_hz > 0.0 && self.min_frequency_hz < self.max_frequency_hz) {
            return Err(format!(
                "Frequency range must satisfy 0 < min < max, got {}..{}",
                self.min_frequency_hz, self.max_frequency_hz
            ));
        }
        Ok(())
    }
}
