//! Per-frame driver tying detector, pool, compositor and stepper together.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::cell::Rgb;
use crate::compositor::PanelCompositor;
use crate::detector::{Beat, BeatDetector};
use crate::error::{Error, Result};
use crate::generation::GenerationStepper;
use crate::layout::Panel;
use crate::params::{DetectorParams, SimulationParams};
use crate::pool::{choose_anchor, SourcePool};

/// Colour command for one panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelFrame {
    pub panel_id: u16,
    pub color: Rgb,
    /// Fade time on the panel (units of 100 ms)
    pub transition_time: u16,
}

/// One running light show.
///
/// Owns all mutable simulation state. Each call to [`Session::process_frame`]
/// runs detect → spawn → render → step to completion, so a session shared
/// between threads only needs one lock around that call.
pub struct Session<R = StdRng> {
    params: SimulationParams,
    detector: BeatDetector,
    pool: SourcePool,
    stepper: GenerationStepper,
    compositor: PanelCompositor,
    palette: Vec<Rgb>,
    panels: Vec<Panel>,
    rng: R,
    warmup_remaining: u32,
    frames_processed: u64,
}

impl Session<StdRng> {
    /// Create a session seeded from `params.rng_seed`, or from entropy if unset
    pub fn new(
        detector_params: DetectorParams,
        params: SimulationParams,
        palette: Vec<Rgb>,
        panels: Vec<Panel>,
    ) -> Result<Self> {
        let rng = match params.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(detector_params, params, palette, panels, rng)
    }
}

impl<R: Rng> Session<R> {
    /// Create a session drawing anchor panels from `rng`
    pub fn with_rng(
        detector_params: DetectorParams,
        params: SimulationParams,
        mut palette: Vec<Rgb>,
        panels: Vec<Panel>,
        rng: R,
    ) -> Result<Self> {
        detector_params.validate().map_err(Error::Config)?;
        params.validate().map_err(Error::Config)?;
        if palette.is_empty() {
            return Err(Error::Palette("palette is empty".to_string()));
        }

        if palette.len() > params.max_channels {
            warn!(
                colours = palette.len(),
                used = params.max_channels,
                "palette has too many colours, using only the first ones"
            );
            palette.truncate(params.max_channels);
        }

        info!(
            channels = palette.len(),
            panels = panels.len(),
            max_cells = params.max_cells,
            "session started"
        );
        for panel in &panels {
            debug!(id = panel.id, x = panel.x, y = panel.y, "panel");
        }

        Ok(Self {
            detector: BeatDetector::new(palette.len(), detector_params),
            pool: SourcePool::new(params.max_cells),
            stepper: GenerationStepper::new(params.max_cells),
            compositor: PanelCompositor::new(params.adjacent_panel_distance, params.background),
            warmup_remaining: params.warmup_frames,
            frames_processed: 0,
            params,
            palette,
            panels,
            rng,
        })
    }

    /// Advance the show by one frame given this frame's per-channel powers.
    ///
    /// Returns one colour per panel in layout order, or nothing while warming up.
    pub fn process_frame(&mut self, powers: &[u32]) -> Vec<PanelFrame> {
        self.frames_processed += 1;
        if self.warmup_remaining > 0 {
            self.warmup_remaining -= 1;
            return Vec::new();
        }

        for beat in self.detector.detect(powers) {
            self.spawn_for(beat);
        }

        let colors = self.compositor.render(&self.panels, self.pool.make_contiguous());
        let frames = self
            .panels
            .iter()
            .zip(colors)
            .map(|(panel, color)| PanelFrame {
                panel_id: panel.id,
                color,
                transition_time: self.params.transition_time,
            })
            .collect();

        self.stepper.advance(&mut self.pool);
        trace!(cells = self.pool.len(), "frame done");
        frames
    }

    /// Spawn a glider in the beat's palette colour at a random panel
    fn spawn_for(&mut self, beat: Beat) {
        let Some(anchor) = choose_anchor(&self.panels, &mut self.rng) else {
            return;
        };
        let color = self.palette[beat.channel].scaled(beat.intensity);
        debug!(
            channel = beat.channel,
            power = beat.sound_power,
            intensity = beat.intensity,
            x = anchor.x,
            y = anchor.y,
            "spawning glider"
        );
        self.pool.spawn_glider(anchor, color);
    }

    pub fn pool(&self) -> &SourcePool {
        &self.pool
    }

    pub fn detector(&self) -> &BeatDetector {
        &self.detector
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    /// Frames seen so far, warm-up included
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn is_warming_up(&self) -> bool {
        self.warmup_remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{default_palette, strip_layout};

    fn params(warmup_frames: u32) -> SimulationParams {
        SimulationParams {
            warmup_frames,
            rng_seed: Some(42),
            ..SimulationParams::default()
        }
    }

    fn session(warmup_frames: u32, palette: Vec<Rgb>, panels: Vec<Panel>) -> Session {
        Session::new(DetectorParams::default(), params(warmup_frames), palette, panels).unwrap()
    }

    #[test]
    fn test_warmup_skips_frames_without_touching_state() {
        let mut session = session(3, default_palette(), strip_layout(4, 86.6));

        for _ in 0..3 {
            assert!(session.process_frame(&[255; 7]).is_empty());
        }
        assert!(session.detector().bins().iter().all(|b| b.previous_power == 0));
        assert!(session.pool().is_empty());

        let frames = session.process_frame(&[255; 7]);
        assert_eq!(frames.len(), 4);
        assert_eq!(session.frames_processed(), 4);
        assert!(!session.is_warming_up());
    }

    #[test]
    fn test_beat_spawns_glider_on_a_panel() {
        let panels = strip_layout(4, 86.6);
        let mut session = session(0, vec![Rgb::new(200, 100, 50)], panels.clone());

        let frames = session.process_frame(&[200]);

        // Rendered before the step, so the glider lights the panels this frame
        assert!(frames.iter().any(|f| f.color != Rgb::BLACK));
        assert!(frames.iter().all(|f| f.transition_time == 2));
        let ids: Vec<u16> = frames.iter().map(|f| f.panel_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_single_panel_never_spawns() {
        let mut session = session(0, default_palette(), strip_layout(1, 86.6));

        for power in [0, 255, 0, 255, 0, 255] {
            let frames = session.process_frame(&[power; 7]);
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0].color, Rgb::BLACK);
        }
        assert!(session.pool().is_empty());
    }

    #[test]
    fn test_palette_truncated_to_channel_limit() {
        let palette = vec![Rgb::new(1, 1, 1); 9];
        let session = session(0, palette, strip_layout(2, 86.6));

        assert_eq!(session.palette().len(), 7);
        assert_eq!(session.detector().channel_count(), 7);
    }

    #[test]
    fn test_pool_stays_bounded_under_constant_beats() {
        let mut session = session(0, default_palette(), strip_layout(9, 86.6));

        for frame in 0..300u32 {
            let power = if frame % 2 == 0 { 255 } else { 0 };
            session.process_frame(&[power; 7]);
            assert!(session.pool().len() <= 50);
        }
    }

    #[test]
    fn test_same_seed_same_show() {
        let run = || {
            let mut session = session(0, default_palette(), strip_layout(6, 86.6));
            (0..60u32)
                .map(|f| session.process_frame(&[(f * 37 % 256); 7]))
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_rejects_empty_palette() {
        let result = Session::new(
            DetectorParams::default(),
            params(0),
            Vec::new(),
            strip_layout(2, 86.6),
        );
        assert!(matches!(result, Err(Error::Palette(_))));
    }
}
