//! Layered ribbon waveform geometry.
//!
//! Three fixed layers, one per frequency band, each rendered as a closed
//! polygon: a top edge left to right, then a bottom edge right to left.

mod synth;

use glam::DVec2;
use std::f64::consts::PI;

pub use synth::{RibbonSynthesizer, SynthInput};

/// Number of ribbon layers (bass, mid, treble)
pub const LAYER_COUNT: usize = 3;

/// Static per-layer motion parameters, derived from the layer index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerState {
    /// Stable layer id (0 bass, 1 mid, 2 treble)
    pub index: usize,
    pub speed_multiplier: f64,
    /// +1 or -1; odd layers travel the other way
    pub direction_sign: f64,
    /// Radians
    pub phase_offset: f64,
}

impl LayerState {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            speed_multiplier: 0.5 + 0.4 * index as f64,
            direction_sign: if index % 2 == 0 { 1.0 } else { -1.0 },
            phase_offset: index as f64 * 2.0 * PI / LAYER_COUNT as f64,
        }
    }

    /// The three standard layers
    pub fn all() -> [LayerState; LAYER_COUNT] {
        [Self::new(0), Self::new(1), Self::new(2)]
    }
}

/// One layer's closed outline for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RibbonGeometry {
    /// Stable layer id for styling
    pub layer: usize,
    /// Top edge, ascending x
    pub top: Vec<DVec2>,
    /// Bottom edge, descending x
    pub bottom: Vec<DVec2>,
}

impl RibbonGeometry {
    /// Boundary points in drawing order: top edge then bottom edge
    pub fn outline(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.top.iter().chain(self.bottom.iter()).copied()
    }

    pub fn points(&self) -> Vec<DVec2> {
        self.outline().collect()
    }

    pub fn len(&self) -> usize {
        self.top.len() + self.bottom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
