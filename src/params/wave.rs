//! Ribbon waveform shape parameters and cosmetic pass-through styling.

use serde::Deserialize;

/// Ribbon waveform parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Number of x-segments per ribbon (samples = resolution + 1, must be >= 50)
    pub resolution: usize,

    /// Amplitude ceiling in pixels (envelope target while playing)
    pub amplitude: f64,

    /// Spatial frequency (dimensionless, 0.05 ≈ 5 radians across the viewport)
    pub frequency: f64,

    /// Global time-advance rate (multiplier on wall-clock seconds)
    pub speed: f64,

    /// Fraction of the peak displacement above which the scope boost applies
    pub extreme_threshold: f64,

    /// Per-layer fill colours (hex), indexed by layer id
    pub colors: [String; 3],

    /// Per-layer opacity in [0, 1]
    pub opacity: [f32; 3],

    /// CSS mix-blend-mode applied by SVG output
    pub blend_mode: String,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            resolution: 200,
            amplitude: 100.0,
            frequency: 0.05,
            speed: 1.0,
            extreme_threshold: 0.7,
            colors: [
                "#ff2e88".to_string(), // bass
                "#7a5cff".to_string(), // mid
                "#22d3ee".to_string(), // treble
            ],
            opacity: [0.85, 0.7, 0.6],
            blend_mode: "screen".to_string(),
        }
    }
}

impl WaveConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution < 50 {
            return Err(format!(
                "resolution must be >= 50, got {}",
                self.resolution
            ));
        }
        for (name, value) in [("amplitude", self.amplitude), ("speed", self.speed)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{} must be finite and > 0, got {}", name, value));
            }
        }
        if !(self.frequency.is_finite() && self.frequency >= 0.0) {
            return Err(format!(
                "frequency must be finite and >= 0, got {}",
                self.frequency
            ));
        }
        if !(0.0..=1.0).contains(&self.extreme_threshold) {
            return Err(format!(
                "extreme_threshold must be in [0, 1], got {}",
                self.extreme_threshold
            ));
        }
        Ok(())
    }
}

/// Amplitude envelope smoothing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Fraction of the remaining distance covered per frame
    pub rate: f64,

    /// Distance below which the envelope snaps to its target
    pub snap_threshold: f64,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            rate: 0.05,
            snap_threshold: 0.1,
        }
    }
}

impl EnvelopeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.rate > 0.0 && self.rate <= 1.0) {
            return Err(format!("envelope rate must be in (0, 1], got {}", self.rate));
        }
        if !(self.snap_threshold.is_finite() && self.snap_threshold >= 0.0) {
            return Err(format!(
                "envelope snap_threshold must be finite and >= 0, got {}",
                self.snap_threshold
            ));
        }
        Ok(())
    }
}
