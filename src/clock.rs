//! Beat clock: turns elapsed playback time into smoothed rhythm intensities.

use crate::params::RhythmTuning;
use crate::rhythm::{BeatPattern, ScopePattern, BEATS_PER_BAR, REFERENCE_BPM};

/// Cycle length of the reference tempo (seconds)
const REFERENCE_CYCLE_S: f64 = 60.0 / REFERENCE_BPM * BEATS_PER_BAR;

/// Normalized position of `elapsed` within a cycle of `duration` seconds
pub fn cycle_phase(elapsed: f64, duration: f64) -> Option<f64> {
    if !(duration.is_finite() && duration > 0.0 && elapsed.is_finite()) {
        return None;
    }
    Some(elapsed.rem_euclid(duration) / duration)
}

/// Smallest distance from `phase` to any beat, wrapping around the bar
pub fn cyclic_distance(phase: f64, beats: &[f64]) -> f64 {
    beats
        .iter()
        .flat_map(|&b| [b, b + 1.0, b - 1.0])
        .map(|b| (phase - b).abs())
        .fold(f64::INFINITY, f64::min)
}

/// Quadratic falloff: 1 on the beat, 0 at or beyond `window`
pub fn beat_falloff(distance: f64, window: f64) -> f64 {
    if distance > window {
        return 0.0;
    }
    let ratio = distance / window;
    (1.0 - 2.0 * ratio * ratio).max(0.0)
}

/// Stateful rhythm follower, advanced once per frame
#[derive(Debug, Clone)]
pub struct BeatClock {
    tuning: RhythmTuning,
    beat_intensity: f64,
    scope_intensity: f64,
    /// Session time at which the current playback run started
    playback_start: Option<f64>,
}

impl BeatClock {
    pub fn new(tuning: RhythmTuning) -> Self {
        Self {
            tuning,
            beat_intensity: 0.0,
            scope_intensity: 0.0,
            playback_start: None,
        }
    }

    /// Seconds since the current playback run began. The first call after
    /// construction or [`decay`](Self::decay) starts the run at `now`.
    pub fn playback_elapsed(&mut self, now: f64) -> f64 {
        let start = *self.playback_start.get_or_insert(now);
        now - start
    }

    /// Advance the beat intensity for this frame and return it
    pub fn tick(&mut self, elapsed: f64, pattern: &BeatPattern) -> f64 {
        let raw = cycle_phase(elapsed + self.tuning.latency_offset_s, pattern.bar_duration())
            .map(|phase| {
                let distance = cyclic_distance(phase, &pattern.beats);
                beat_falloff(distance, self.tuning.beat_window)
            })
            .unwrap_or(0.0);

        self.beat_intensity = blend(self.beat_intensity, raw, self.tuning.beat_retain);
        self.beat_intensity
    }

    /// Advance the scope intensity for this frame and return it
    ///
    /// The scope cycle runs off its own length and speed, stretched by
    /// `scope_stretch` so it moves slower than the beat.
    pub fn tick_scope(&mut self, elapsed: f64, pattern: &ScopePattern) -> f64 {
        let cycle = pattern.pattern_length.max(1) as f64 * REFERENCE_CYCLE_S
            / (pattern.speed * self.tuning.scope_stretch);

        let raw = cycle_phase(elapsed + self.tuning.latency_offset_s, cycle)
            .map(|phase| pattern.value_at(phase))
            .unwrap_or(0.0);

        self.scope_intensity = blend(self.scope_intensity, raw, self.tuning.scope_retain);
        self.scope_intensity
    }

    /// Ease the scope intensity out when the source has no scope pattern
    pub fn fade_scope(&mut self) -> f64 {
        self.scope_intensity = blend(self.scope_intensity, 0.0, self.tuning.scope_retain);
        self.scope_intensity
    }

    /// Stopped frame: decay both intensities and forget the playback start
    pub fn decay(&mut self) {
        self.beat_intensity *= self.tuning.stop_decay;
        self.scope_intensity *= self.tuning.stop_decay;
        self.playback_start = None;
    }

    pub fn beat_intensity(&self) -> f64 {
        self.beat_intensity
    }

    pub fn scope_intensity(&self) -> f64 {
        self.scope_intensity
    }
}

/// Exponential smoothing keeping `retain` of the previous value
fn blend(previous: f64, raw: f64, retain: f64) -> f64 {
    (previous * retain + raw * (1.0 - retain)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LATENCY: f64 = 0.08;

    fn clock() -> BeatClock {
        BeatClock::new(RhythmTuning::default())
    }

    /// Elapsed time whose latency-compensated phase lands on `phase` (120 bpm)
    fn elapsed_at(phase: f64) -> f64 {
        phase * 2.0 - LATENCY
    }

    #[test]
    fn test_cyclic_distance_wraps() {
        assert_relative_eq!(cyclic_distance(0.95, &[0.0]), 0.05, epsilon = 1e-12);
        assert_relative_eq!(cyclic_distance(0.05, &[0.9]), 0.15, epsilon = 1e-12);
        assert_relative_eq!(cyclic_distance(0.3, &[0.0, 0.25, 0.5]), 0.05, epsilon = 1e-12);
        assert_eq!(cyclic_distance(0.3, &[]), f64::INFINITY);
    }

    #[test]
    fn test_falloff_shape() {
        assert_eq!(beat_falloff(0.0, 0.15), 1.0);
        assert_relative_eq!(beat_falloff(0.075, 0.15), 0.5, epsilon = 1e-12);
        assert_eq!(beat_falloff(0.12, 0.15), 0.0);
        assert_eq!(beat_falloff(0.2, 0.15), 0.0);
    }

    #[test]
    fn test_on_beat_converges_to_one() {
        let mut clock = clock();
        let pattern = BeatPattern::default();

        let mut previous = 0.0;
        for _ in 0..30 {
            let intensity = clock.tick(elapsed_at(0.25), &pattern);
            assert!(intensity > previous);
            previous = intensity;
        }
        assert!(previous > 0.99);
    }

    #[test]
    fn test_off_beat_smooths_to_zero() {
        let mut clock = clock();
        let pattern = BeatPattern {
            beats: vec![0.0],
            ..BeatPattern::default()
        };

        for _ in 0..30 {
            clock.tick(elapsed_at(0.0), &pattern);
        }
        assert!(clock.beat_intensity() > 0.99);

        for _ in 0..30 {
            clock.tick(elapsed_at(0.5), &pattern);
        }
        assert!(clock.beat_intensity() < 0.01);
    }

    #[test]
    fn test_intensity_stays_in_range() {
        let mut clock = clock();
        let pattern = BeatPattern::default();
        let scope = ScopePattern {
            sequence: vec![0.0, 1.0, 0.5],
            speed: 1.5,
            pattern_length: 2,
        };

        for frame in 0..600 {
            let t = frame as f64 / 60.0;
            let beat = clock.tick(t, &pattern);
            let scoped = clock.tick_scope(t, &scope);
            assert!((0.0..=1.0).contains(&beat));
            assert!((0.0..=1.0).contains(&scoped));
        }
    }

    #[test]
    fn test_scope_follows_sequence() {
        let mut clock = clock();
        let scope = ScopePattern {
            sequence: vec![0.0, 1.0],
            speed: 1.0,
            pattern_length: 1,
        };

        // Cycle is 2s / 0.5 stretch = 4s; phase 0.5 sits on the 1.0 entry
        for _ in 0..40 {
            clock.tick_scope(2.0 - LATENCY, &scope);
        }
        assert!(clock.scope_intensity() > 0.99);

        for _ in 0..40 {
            clock.tick_scope(-LATENCY, &scope);
        }
        assert!(clock.scope_intensity() < 0.01);
    }

    #[test]
    fn test_decay_and_restart() {
        let mut clock = clock();
        let pattern = BeatPattern::default();

        assert_eq!(clock.playback_elapsed(10.0), 0.0);
        assert_eq!(clock.playback_elapsed(10.5), 0.5);

        for _ in 0..30 {
            clock.tick(elapsed_at(0.0), &pattern);
        }
        let before = clock.beat_intensity();

        clock.decay();
        assert_relative_eq!(clock.beat_intensity(), before * 0.95, epsilon = 1e-12);

        // Resuming restarts elapsed time from zero
        assert_eq!(clock.playback_elapsed(42.0), 0.0);
    }

    #[test]
    fn test_degenerate_tempo_is_silent() {
        let mut clock = clock();
        let pattern = BeatPattern {
            bpm: 0.0,
            ..BeatPattern::default()
        };
        assert_eq!(clock.tick(1.0, &pattern), 0.0);
        assert_eq!(clock.fade_scope(), 0.0);
    }
}
