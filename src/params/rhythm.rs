//! Beat clock tuning.
//!
//! These constants were tuned by eye against live patterns; none of them
//! come from an acoustic model.

use serde::Deserialize;

/// Beat and scope intensity tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RhythmTuning {
    /// Added to elapsed time to compensate for audio scheduling latency (seconds)
    pub latency_offset_s: f64,

    /// Cyclic distance (fraction of a bar) beyond which beat intensity is 0
    pub beat_window: f64,

    /// Share of the previous beat intensity kept each frame
    pub beat_retain: f64,

    /// Share of the previous scope intensity kept each frame
    pub scope_retain: f64,

    /// Playback-rate factor applied to the scope cycle (0.5 = twice as long)
    pub scope_stretch: f64,

    /// Per-frame multiplicative decay of both intensities while stopped
    pub stop_decay: f64,
}

impl Default for RhythmTuning {
    fn default() -> Self {
        Self {
            latency_offset_s: 0.08,
            beat_window: 0.15,
            beat_retain: 0.7,
            scope_retain: 0.7,
            scope_stretch: 0.5,
            stop_decay: 0.95,
        }
    }
}

impl RhythmTuning {
    pub fn validate(&self) -> Result<(), String> {
        if !self.latency_offset_s.is_finite() {
            return Err(format!(
                "latency_offset_s must be finite, got {}",
                self.latency_offset_s
            ));
        }
        if !(self.beat_window > 0.0 && self.beat_window <= 0.5) {
            return Err(format!(
                "beat_window must be in (0, 0.5], got {}",
                self.beat_window
            ));
        }
        for (name, value) in [
            ("beat_retain", self.beat_retain),
            ("scope_retain", self.scope_retain),
            ("stop_decay", self.stop_decay),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(format!("{} must be in [0, 1), got {}", name, value));
            }
        }
        if !(self.scope_stretch.is_finite() && self.scope_stretch > 0.0) {
            return Err(format!(
                "scope_stretch must be finite and > 0, got {}",
                self.scope_stretch
            ));
        }
        Ok(())
    }
}
