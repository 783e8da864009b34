//! Deterministic per-frame ribbon synthesis.

use glam::DVec2;

use super::{LayerState, RibbonGeometry};
use crate::analyzer::FrequencyBands;
use crate::params::WaveConfig;

/// Peak magnitude of carrier + harmonic
const MAX_DISPLACEMENT: f64 = 1.35;

/// Envelope ratio below which thickness stops breathing
const BREATH_GATE: f64 = 0.1;

/// Smallest allowed half-thickness (pixels)
const MIN_THICKNESS: f64 = 1.0;

/// Per-frame inputs to the synthesizer
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthInput {
    /// Animation time (seconds, already scaled by the global speed)
    pub time: f64,
    pub bands: FrequencyBands,
    pub beat_intensity: f64,
    pub scope_intensity: f64,
    /// Current envelope amplitude (pixels)
    pub amplitude: f64,
    pub width: f64,
    pub height: f64,
}

/// One evaluated x-sample of a ribbon
#[derive(Debug, Clone, Copy)]
struct RibbonSample {
    spine_y: f64,
    thickness: f64,
    displacement: f64,
    boosted: bool,
}

/// Pure function of its inputs: identical inputs give identical geometry
#[derive(Debug, Clone)]
pub struct RibbonSynthesizer {
    resolution: usize,
    frequency: f64,
    amplitude_ceiling: f64,
    extreme_threshold: f64,
}

impl RibbonSynthesizer {
    pub fn new(config: &WaveConfig) -> Self {
        Self {
            resolution: config.resolution,
            frequency: config.frequency,
            amplitude_ceiling: config.amplitude,
            extreme_threshold: config.extreme_threshold,
        }
    }

    /// Build one ribbon per layer. Degenerate viewports or a zero
    /// resolution produce no geometry.
    pub fn synthesize(&self, layers: &[LayerState], input: &SynthInput) -> Vec<RibbonGeometry> {
        let drawable = input.width.is_finite()
            && input.height.is_finite()
            && input.width > 0.0
            && input.height > 0.0
            && self.resolution > 0;
        if !drawable {
            return Vec::new();
        }

        layers
            .iter()
            .map(|layer| self.ribbon(layer, input))
            .collect()
    }

    fn ribbon(&self, layer: &LayerState, input: &SynthInput) -> RibbonGeometry {
        let count = self.resolution + 1;
        let mut top = Vec::with_capacity(count);
        let mut bottom = Vec::with_capacity(count);

        for i in 0..count {
            let x = i as f64 / self.resolution as f64 * input.width;
            let sample = self.sample(layer, x, input);
            top.push(DVec2::new(x, sample.spine_y - sample.thickness));
            bottom.push(DVec2::new(x, sample.spine_y + sample.thickness));
        }
        bottom.reverse();

        RibbonGeometry {
            layer: layer.index,
            top,
            bottom,
        }
    }

    fn sample(&self, layer: &LayerState, x: f64, input: &SynthInput) -> RibbonSample {
        let index = layer.index as f64;
        let energy = input.bands.for_layer(layer.index);
        let beat = input.beat_intensity;
        let time = input.time;
        let is_bass = layer.index == 0;

        // Layer-local time
        let speed_boost = 1.0 + 0.5 * energy;
        let rhythm_speed = if is_bass { 1.0 + 0.3 * beat } else { 1.0 };
        let layer_time =
            time * layer.speed_multiplier * layer.direction_sign * speed_boost * rhythm_speed;

        // Amplitude before the scope boost
        let rhythm_amp = if is_bass { 1.0 + 0.25 * beat } else { 1.0 };
        let base_amplitude = input.amplitude * (0.7 + 0.6 * energy) * rhythm_amp;

        let wave_x = (x / input.width) * 10.0 * (self.frequency * 10.0);

        // Band-weighted perturbations
        let frequency_mod = energy * (wave_x * 1.7 + time * 0.9).sin();
        let harmonic_mod = energy * (wave_x * 0.6 - time * 1.3).cos();
        let (rhythm_mod, harmonic_rhythm_mod) = if is_bass {
            (
                beat * 0.4 * (wave_x * 3.0 + time * 4.0).sin(),
                beat * 0.3 * (wave_x * 1.5 - time * 3.0).cos(),
            )
        } else {
            (0.0, 0.0)
        };

        let carrier = (wave_x + layer_time + layer.phase_offset + frequency_mod * 0.3 + rhythm_mod)
            .sin();
        let harmonic = (wave_x * 2.3 - layer_time * 1.5
            + index
            + harmonic_mod * 0.2
            + harmonic_rhythm_mod)
            .sin()
            * 0.35;
        let displacement = carrier + harmonic;

        // Scope boost only near crests and troughs, so it changes height, not shape
        let boosted =
            layer.index == 1 && displacement.abs() > self.extreme_threshold * MAX_DISPLACEMENT;
        let amplitude = if boosted {
            base_amplitude * (0.85 + 0.3 * input.scope_intensity)
        } else {
            base_amplitude
        };

        let spine_y = input.height / 2.0 + displacement * amplitude * 0.55;

        // Thickness breathes unless the envelope is nearly flat
        let envelope_ratio = if self.amplitude_ceiling > 0.0 {
            input.amplitude / self.amplitude_ceiling
        } else {
            0.0
        };
        let modulation = if envelope_ratio < BREATH_GATE {
            0.0
        } else {
            let breathing = (wave_x * 0.8 + time * 2.0 + index).cos() * 0.15;
            let band_wobble = energy * 0.1 * (wave_x * 1.1 + time * 1.7).sin();
            let rhythm_swell = if is_bass { beat * 0.2 } else { 0.0 };
            breathing + band_wobble + rhythm_swell
        };
        let thickness = (amplitude * 0.25 * (1.0 + modulation)).max(MIN_THICKNESS);

        RibbonSample {
            spine_y,
            thickness,
            displacement,
            boosted,
        }
    }
}
