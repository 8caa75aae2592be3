//! Audio power providers for the host binary.
//!
//! The engine only needs one power value (0-255) per channel per frame.
//! These sources produce that from a WAV file or from a Glicol procedural
//! composition, both through the same windowed FFT channel analysis.

mod fft;
mod synth;
mod wav;

// Re-export public types
pub use fft::{hann_window, ChannelAnalyzer};
pub use synth::{SynthPowerSource, COMPOSITION};
pub use wav::WavPowerSource;
