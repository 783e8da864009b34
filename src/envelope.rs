//! Single-pole amplitude envelope for the play/stop "flatline" transition.

use crate::params::EnvelopeConfig;

/// Exponential approach toward a target, snapping once close enough
#[derive(Debug, Clone)]
pub struct AmplitudeEnvelope {
    current: f64,
    target: f64,
    rate: f64,
    snap_threshold: f64,
}

impl AmplitudeEnvelope {
    pub fn new(config: &EnvelopeConfig) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            rate: config.rate,
            snap_threshold: config.snap_threshold,
        }
    }

    /// Move one frame toward `target` and return the new value
    pub fn step(&mut self, target: f64) -> f64 {
        self.target = target.max(0.0);
        let diff = self.target - self.current;
        if diff.abs() < self.snap_threshold {
            self.current = self.target;
        } else {
            self.current += diff * self.rate;
        }
        self.current
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}
