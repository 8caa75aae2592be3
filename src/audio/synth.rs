//! Procedural music power source (Glicol).

use glicol::Engine;

use super::fft::ChannelAnalyzer;
use crate::error::{Error, Result};
use crate::params::AnalysisConfig;

/// Audio block size (samples per Glicol buffer)
const BLOCK_SIZE: usize = 128;

/// Glicol composition (procedural music code): a kick on every beat under a gated saw lead
pub const COMPOSITION: &str = r#"
~gate: speed 2.0 >> seq 60 _60 _~a 48
~a: choose 48 48 48 72 0 0 0
~amp: ~gate >> envperc 0.001 0.1
~pit: ~gate >> mul 261.63
~lead: saw ~pit >> mul ~amp >> lpf ~mod 5.0 >> mul 0.1
~mod: sin 0.2 >> mul 1300 >> add 1500
~kgate: speed 4.0 >> seq 60 _ 60 _
~kamp: ~kgate >> envperc 0.001 0.2
~kick: sin 60 >> mul ~kamp >> mul 0.6
o: ~lead >> add ~kick >> plate 0.1
"#;

/// Per-frame channel powers of a Glicol composition rendered offline
pub struct SynthPowerSource {
    engine: Engine<BLOCK_SIZE>,
    analyzer: ChannelAnalyzer,
    pending: Vec<f32>,
    samples_per_frame: usize,
    frames_left: usize,
}

impl SynthPowerSource {
    /// Render `duration_secs` of `code` (usually [`COMPOSITION`])
    pub fn new(
        code: &str,
        config: AnalysisConfig,
        channels: usize,
        duration_secs: f32,
    ) -> Result<Self> {
        let samples_per_frame = config.samples_per_frame();
        let frames_left =
            (duration_secs.max(0.0) * 1000.0 / config.frame_interval_ms as f32).ceil() as usize;

        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(config.sample_rate_hz);
        engine.update_with_code(code);
        engine
            .update()
            .map_err(|e| Error::Audio(format!("Glicol engine init failed: {:?}", e)))?;

        Ok(Self {
            engine,
            analyzer: ChannelAnalyzer::new(config, channels)?,
            pending: Vec::with_capacity(samples_per_frame + BLOCK_SIZE),
            samples_per_frame,
            frames_left,
        })
    }

    pub fn frames_left(&self) -> usize {
        self.frames_left
    }
}

impl Iterator for SynthPowerSource {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        if self.frames_left == 0 {
            return None;
        }
        self.frames_left -= 1;

        // Generate whole blocks until one frame of audio is buffered
        while self.pending.len() < self.samples_per_frame {
            let (buffers, _) = self.engine.next_block(vec![]);
            for i in 0..BLOCK_SIZE {
                self.pending.push(buffers[0][i].clamp(-1.0, 1.0));
            }
        }

        let frame: Vec<f32> = self.pending.drain(..self.samples_per_frame).collect();
        Some(self.analyzer.analyze(&frame))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.frames_left, Some(self.frames_left))
    }
}
