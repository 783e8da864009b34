//! Braless library - audio-reactive ribbon waveforms from live-coded rhythm

pub mod analyzer;
pub mod audio;
pub mod cli;
pub mod clock;
pub mod envelope;
pub mod error;
pub mod params;
pub mod rendering;
pub mod rhythm;
pub mod ribbon;
pub mod session;
