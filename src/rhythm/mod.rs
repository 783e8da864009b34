//! Static rhythm extraction from live-coded pattern source.
//!
//! Runs once per source change, never per frame. Both extractors are
//! best-effort heuristics over user-typed text: anything they cannot make
//! sense of falls back to a default instead of failing.

mod beat;
mod literal;
mod scope;

pub use beat::extract_beat_pattern;
pub use scope::extract_scope_pattern;

/// Tempo assumed when the source sets none (beats per minute)
pub const REFERENCE_BPM: f64 = 120.0;

/// Tempo clamp range
pub const MIN_BPM: f64 = 60.0;
pub const MAX_BPM: f64 = 180.0;

/// Beats per bar
pub const BEATS_PER_BAR: f64 = 4.0;

/// Percussion hit positions within one 4-beat bar
#[derive(Debug, Clone, PartialEq)]
pub struct BeatPattern {
    /// Strictly increasing offsets in [0, 1)
    pub beats: Vec<f64>,
    /// Tempo, clamped to [MIN_BPM, MAX_BPM]
    pub bpm: f64,
    /// Bars per pattern cycle
    pub pattern_length: u32,
}

impl Default for BeatPattern {
    /// Four on the floor at 120 bpm
    fn default() -> Self {
        Self {
            beats: vec![0.0, 0.25, 0.5, 0.75],
            bpm: REFERENCE_BPM,
            pattern_length: 1,
        }
    }
}

impl BeatPattern {
    /// Bar length in seconds
    pub fn bar_duration(&self) -> f64 {
        (60.0 / self.bpm) * BEATS_PER_BAR
    }
}

/// Secondary modulation sequence with its own playback rate
#[derive(Debug, Clone, PartialEq)]
pub struct ScopePattern {
    /// Cyclic values in [0, 1]
    pub sequence: Vec<f64>,
    /// Playback-rate multiplier relative to the reference tempo (> 0)
    pub speed: f64,
    /// Cycles spanned by one pass through `sequence`
    pub pattern_length: u32,
}

impl ScopePattern {
    /// Value at fractional `position` in [0, 1), linearly interpolated
    /// between neighbouring entries and wrapping from the last to the first.
    pub fn value_at(&self, position: f64) -> f64 {
        let len = self.sequence.len();
        if len == 0 {
            return 0.0;
        }
        let scaled = position.rem_euclid(1.0) * len as f64;
        let index = (scaled.floor() as usize).min(len - 1);
        let next = (index + 1) % len;
        let t = scaled - index as f64;
        self.sequence[index] + (self.sequence[next] - self.sequence[index]) * t
    }
}
