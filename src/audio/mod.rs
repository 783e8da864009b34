//! Signal acquisition: spectrum sources for the frequency analyzer.
//!
//! Combines Glicol procedural synthesis, WAV playback and real-time FFT
//! analysis into byte magnitude spectra for audio-reactive visuals.

mod fft;
mod source;
mod synthesis;
mod system;
mod wav;

// Re-export public types
pub use fft::{hann_window, spawn_fft_thread, SpectrumAnalyser};
pub use source::{SignalSource, SpectrumTap};
pub use synthesis::{DEFAULT_PATTERN_CODE, GLICOL_COMPOSITION};
pub use system::LiveAudio;
pub use wav::WavSource;
