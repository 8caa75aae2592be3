//! Windowed FFT analysis into per-channel powers.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::params::AnalysisConfig;

/// Turns successive blocks of mono samples into per-channel powers
pub struct ChannelAnalyzer {
    config: AnalysisConfig,
    channels: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
    /// Most recent `fft_size` samples, oldest first
    history: Vec<f32>,
}

impl ChannelAnalyzer {
    pub fn new(config: AnalysisConfig, channels: usize) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::Config(format!("Invalid analysis config: {}", e)))?;
        if channels == 0 {
            return Err(Error::Audio("at least one channel is required".to_string()));
        }

        let size = config.fft_size;
        let mut planner = FftPlanner::new();
        Ok(Self {
            fft: planner.plan_fft_forward(size),
            window: (0..size).map(|i| hann_window(i, size)).collect(),
            spectrum: vec![Complex::new(0.0, 0.0); size],
            history: vec![0.0; size],
            config,
            channels,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Append a frame's samples and return the channel powers of the latest window
    pub fn analyze(&mut self, samples: &[f32]) -> Vec<u32> {
        self.history.extend_from_slice(samples);
        let excess = self.history.len() - self.config.fft_size;
        self.history.drain(..excess);

        for ((bin, &sample), &weight) in self
            .spectrum
            .iter_mut()
            .zip(&self.history)
            .zip(&self.window)
        {
            *bin = Complex::new(sample * weight, 0.0);
        }
        self.fft.process(&mut self.spectrum);

        // A full-scale sine peaks near fft_size / 4 after the Hann window
        let full_scale = self.config.fft_size as f32 / 4.0;
        (0..self.channels)
            .map(|channel| {
                let bins = self.config.channel_bins(channel, self.channels);
                let mean = self.spectrum[bins.clone()]
                    .iter()
                    .map(|c| c.norm())
                    .sum::<f32>()
                    / bins.len() as f32;
                (mean / full_scale * self.config.power_scale * 255.0).clamp(0.0, 255.0) as u32
            })
            .collect()
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(hz: f32, amplitude: f32, count: usize, sample_rate: usize) -> Vec<f32> {
        (0..count)
            .map(|i| amplitude * (2.0 * PI * hz * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_hann_window() {
        let size = 1024;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_silence_has_no_power() {
        let mut analyzer = ChannelAnalyzer::new(AnalysisConfig::default(), 7).unwrap();

        let powers = analyzer.analyze(&vec![0.0; 2205]);

        assert_eq!(powers, vec![0; 7]);
    }

    #[test]
    fn test_tone_lands_in_its_channel() {
        let config = AnalysisConfig::default();
        let mut analyzer = ChannelAnalyzer::new(config.clone(), 7).unwrap();

        let powers = analyzer.analyze(&sine(1000.0, 0.5, 2205, config.sample_rate_hz));

        let loudest = (0..7).max_by_key(|&c| powers[c]).unwrap();
        let bins = config.channel_bins(loudest, 7);
        assert!(bins.contains(&config.hz_to_bin(1000.0)));
        assert!(powers[loudest] > 0);
    }

    #[test]
    fn test_short_blocks_accumulate() {
        let config = AnalysisConfig::default();
        let mut analyzer = ChannelAnalyzer::new(config.clone(), 3).unwrap();
        let tone = sine(440.0, 0.8, 4096, config.sample_rate_hz);

        let mut last = Vec::new();
        for block in tone.chunks(128) {
            last = analyzer.analyze(block);
        }

        assert_eq!(last.len(), 3);
        assert!(last.iter().any(|&p| p > 0));
    }

    #[test]
    fn test_rejects_zero_channels() {
        assert!(ChannelAnalyzer::new(AnalysisConfig::default(), 0).is_err());
    }
}
