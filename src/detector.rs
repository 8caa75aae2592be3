//! Adaptive per-channel beat detection.
//!
//! Each channel keeps a slowly adapting estimate of its loudest recent peaks
//! (the running max) and a floor that drops instantly and recovers by one unit
//! per frame. A sample is a beat when it rises above the floor by a fraction of
//! the running max. This catches strong instrumental entries as well as drum
//! hits, which is what the light show wants.

use tracing::debug;

use crate::params::DetectorParams;

/// Divisor of the running max a sample must fall by, below the previous peak,
/// before that peak is folded into the running max.
const PEAK_DROP_DIVISOR: u32 = 4;

/// A detected beat on one channel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Beat {
    pub channel: usize,
    pub sound_power: u32,
    /// Log-scaled loudness in [minimum_intensity, 1]
    pub intensity: f32,
}

/// Historical state for one frequency channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyChannelBin {
    pub latest_minimum: u32,
    pub sound_power: u32,
    pub running_max: u32,
    pub maximum_trigger: u32,
    pub previous_power: u32,
    pub second_previous_power: u32,
}

impl FrequencyChannelBin {
    pub fn new(params: &DetectorParams) -> Self {
        Self {
            latest_minimum: 0,
            sound_power: 0,
            running_max: params.initial_running_max,
            maximum_trigger: params.initial_maximum_trigger,
            previous_power: 0,
            second_previous_power: 0,
        }
    }

    /// Feed one power sample. Returns the beat intensity if the sample triggered.
    pub fn observe(&mut self, sound_power: u32, params: &DetectorParams) -> Option<f32> {
        self.sound_power = sound_power;

        // The previous sample was a local peak and the signal has since dropped well below it
        let dropped = sound_power as u64 + (self.running_max / PEAK_DROP_DIVISOR) as u64;
        if dropped < self.previous_power as u64 && self.previous_power > self.second_previous_power
        {
            self.running_max =
                add_to_running_max(self.running_max, self.previous_power, params.effective_trail);
        }

        if sound_power < self.latest_minimum {
            self.latest_minimum = sound_power;
        } else if self.latest_minimum > 0 {
            self.latest_minimum -= 1;
        }

        let threshold =
            self.latest_minimum as f64 + self.running_max as f64 * params.trigger_threshold;
        let triggered = sound_power as f64 > threshold;
        if triggered {
            // Sustained loud passages must fall before they can trigger again
            self.latest_minimum = sound_power;
            self.maximum_trigger = self.maximum_trigger.max(sound_power);
        }

        self.second_previous_power = self.previous_power;
        self.previous_power = sound_power;

        triggered.then(|| intensity(sound_power, self.running_max, params.minimum_intensity))
    }
}

/// Fold a new peak into a running max.
///
/// `effective_trail` approximates how many peaks are tracked. A peak above the
/// current max is weighted double so the envelope rises quickly.
pub fn add_to_running_max(running_max: u32, value: u32, effective_trail: u32) -> u32 {
    let mut trail = effective_trail;
    if value > running_max && effective_trail > 1 {
        trail /= 2;
    }
    let next = running_max as f32 - running_max as f32 / effective_trail as f32
        + value as f32 / trail as f32;
    next as u32
}

/// Log-scale intensity of a beat relative to the channel's running max.
///
/// Falls back to full intensity when either value is too small for the
/// logarithm to be meaningful.
pub fn intensity(sound_power: u32, running_max: u32, minimum_intensity: f64) -> f32 {
    if sound_power <= 1 || running_max <= 1 {
        return 1.0;
    }
    let ratio = (sound_power as f64).ln() / (running_max as f64).ln();
    (ratio * (1.0 - minimum_intensity) + minimum_intensity).clamp(minimum_intensity, 1.0) as f32
}

/// Beat detector over all audio channels of a session
#[derive(Clone, Debug)]
pub struct BeatDetector {
    bins: Vec<FrequencyChannelBin>,
    params: DetectorParams,
}

impl BeatDetector {
    pub fn new(channels: usize, params: DetectorParams) -> Self {
        Self {
            bins: (0..channels)
                .map(|_| FrequencyChannelBin::new(&params))
                .collect(),
            params,
        }
    }

    /// Feed one frame of per-channel powers; returns the beats in channel order.
    ///
    /// Extra entries beyond the channel count are ignored.
    pub fn detect(&mut self, powers: &[u32]) -> Vec<Beat> {
        let mut beats = Vec::new();
        for (channel, (bin, &power)) in self.bins.iter_mut().zip(powers).enumerate() {
            if let Some(intensity) = bin.observe(power, &self.params) {
                debug!(
                    channel,
                    power,
                    running_max = bin.running_max,
                    intensity,
                    "beat"
                );
                beats.push(Beat {
                    channel,
                    sound_power: power,
                    intensity,
                });
            }
        }
        beats
    }

    pub fn bins(&self) -> &[FrequencyChannelBin] {
        &self.bins
    }

    pub fn channel_count(&self) -> usize {
        self.bins.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_with_threshold(trigger_threshold: f64) -> DetectorParams {
        DetectorParams {
            trigger_threshold,
            ..DetectorParams::default()
        }
    }

    fn bin_with_running_max(running_max: u32) -> FrequencyChannelBin {
        FrequencyChannelBin {
            running_max,
            ..FrequencyChannelBin::new(&DetectorParams::default())
        }
    }

    #[test]
    fn test_trigger_threshold_example() {
        let params = params_with_threshold(0.5);

        let mut bin = bin_with_running_max(10);
        assert!(bin.observe(6, &params).is_some()); // 6 > 0 + 5

        let mut bin = bin_with_running_max(10);
        assert!(bin.observe(4, &params).is_none()); // 4 > 5 is false
    }

    #[test]
    fn test_trigger_snaps_floor_and_records_maximum() {
        let params = params_with_threshold(0.5);
        let mut bin = bin_with_running_max(10);

        bin.observe(40, &params);
        assert_eq!(bin.latest_minimum, 40);
        assert_eq!(bin.maximum_trigger, 40);

        // Still loud, but no longer above the raised floor
        assert!(bin.observe(41, &params).is_none());
        assert_eq!(bin.maximum_trigger, 40);
    }

    #[test]
    fn test_floor_drops_instantly_and_recovers_slowly() {
        let params = DetectorParams::default();
        let mut bin = bin_with_running_max(1000);
        bin.latest_minimum = 50;

        bin.observe(60, &params);
        assert_eq!(bin.latest_minimum, 49);

        bin.observe(10, &params);
        assert_eq!(bin.latest_minimum, 10);

        bin.latest_minimum = 0;
        bin.observe(5, &params);
        assert_eq!(bin.latest_minimum, 0);
    }

    #[test]
    fn test_floor_only_moves_by_documented_rules() {
        let params = DetectorParams::default();
        let mut bin = FrequencyChannelBin::new(&params);
        let samples = [0, 3, 9, 40, 12, 8, 8, 200, 150, 20, 3, 3, 90, 5, 1, 0, 77];

        for &power in &samples {
            let before = bin.latest_minimum;
            let triggered = bin.observe(power, &params).is_some();
            let after = bin.latest_minimum;

            if triggered {
                assert_eq!(after, power);
            } else if power < before {
                assert_eq!(after, power);
            } else {
                assert!(after == before || after + 1 == before);
            }
        }
    }

    #[test]
    fn test_running_max_tracks_falling_peak() {
        let params = DetectorParams::default();
        let mut bin = bin_with_running_max(20);

        bin.observe(10, &params);
        bin.observe(100, &params);
        assert_eq!(bin.running_max, 20);

        // 10 + 20/4 < 100 and 100 > 10: peak folded in with half trail
        bin.observe(10, &params);
        assert_eq!(bin.running_max, add_to_running_max(20, 100, 4));
        assert_eq!(bin.running_max, 65);
    }

    #[test]
    fn test_history_rotates_every_frame() {
        let params = DetectorParams::default();
        let mut bin = FrequencyChannelBin::new(&params);

        bin.observe(7, &params);
        bin.observe(9, &params);
        assert_eq!(bin.previous_power, 9);
        assert_eq!(bin.second_previous_power, 7);
        assert_eq!(bin.sound_power, 9);
    }

    #[test]
    fn test_add_to_running_max() {
        // Smaller peak: full trail
        assert_eq!(add_to_running_max(100, 20, 4), 80);
        // Bigger peak: half trail
        assert_eq!(add_to_running_max(100, 200, 4), 175);
        // Trail of one never halves
        assert_eq!(add_to_running_max(10, 50, 1), 50);
    }

    #[test]
    fn test_intensity() {
        assert_eq!(intensity(1, 100, 0.2), 1.0);
        assert_eq!(intensity(100, 1, 0.2), 1.0);
        assert_eq!(intensity(500, 100, 0.2), 1.0);
        assert!((intensity(100, 100, 0.2) - 1.0).abs() < 1e-6);

        let mid = intensity(10, 100, 0.2);
        assert!((mid - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_detector_reports_channels_in_order() {
        let mut detector = BeatDetector::new(3, params_with_threshold(0.5));

        let beats = detector.detect(&[50, 0, 60, 99]);
        let channels: Vec<usize> = beats.iter().map(|b| b.channel).collect();

        assert_eq!(channels, vec![0, 2]);
        assert_eq!(detector.channel_count(), 3);
        assert_eq!(detector.bins()[2].maximum_trigger, 60);
    }
}
