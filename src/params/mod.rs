//! Parameter definitions with units and documented semantics.
//!
//! All tunable numbers are extracted here with:
//! - Units (pixels, seconds, decibels, fractions of a bar)
//! - Documented ranges and meanings
//! - Defaults that match the live-coding front end

mod audio;
mod render;
mod rhythm;
mod wave;

use serde::Deserialize;
use std::path::Path;

use crate::error::{Result, VizError};

// Re-export all types
pub use audio::{audio_constants, AnalyserConfig, BandSplit};
pub use render::{frame_count, FrameFormat, RecordingConfig, ViewportConfig};
pub use rhythm::RhythmTuning;
pub use wave::{EnvelopeConfig, WaveConfig};

/// Complete visualizer configuration, loadable from TOML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub analyser: AnalyserConfig,
    pub bands: BandSplit,
    pub wave: WaveConfig,
    pub rhythm: RhythmTuning,
    pub envelope: EnvelopeConfig,
    pub viewport: ViewportConfig,
}

impl VisualizerConfig {
    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.analyser
            .validate()
            .and_then(|_| self.bands.validate())
            .and_then(|_| self.wave.validate())
            .and_then(|_| self.rhythm.validate())
            .and_then(|_| self.envelope.validate())
            .map_err(VizError::Config)
    }
}
