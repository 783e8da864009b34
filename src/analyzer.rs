//! Per-frame frequency band extraction from a magnitude spectrum.

use std::sync::Arc;

use crate::audio::SignalSource;
use crate::params::BandSplit;

/// Normalized band energies for one frame, all in [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrequencyBands {
    pub bass: f64,
    pub mid: f64,
    pub treble: f64,
    /// Unweighted mean over all bins
    pub overall: f64,
}

impl FrequencyBands {
    /// Energy of the band driving ribbon layer `index` (0 bass, 1 mid, 2 treble)
    pub fn for_layer(&self, index: usize) -> f64 {
        match index {
            0 => self.bass,
            1 => self.mid,
            _ => self.treble,
        }
    }
}

/// Compute band energies from byte magnitudes
///
/// Each band is the mean of `bin / 255` over its range. The bass mean is
/// multiplied by `split.bass_gain` and clamped to 1, since raw bass bins
/// read low relative to how loud they sound. Empty ranges read as 0.
pub fn band_energies(bins: &[u8], split: &BandSplit) -> FrequencyBands {
    if bins.is_empty() {
        return FrequencyBands::default();
    }

    let n = bins.len();
    let mean = |range: std::ops::Range<usize>| -> f64 {
        if range.is_empty() {
            return 0.0;
        }
        let len = range.len() as f64;
        bins[range].iter().map(|&b| b as f64 / 255.0).sum::<f64>() / len
    };

    FrequencyBands {
        bass: (mean(split.bass_bins(n)) * split.bass_gain).min(1.0),
        mid: mean(split.mid_bins(n)),
        treble: mean(split.treble_bins(n)),
        overall: mean(0..n),
    }
}

/// Samples band energies from an attached signal source once per frame
pub struct FrequencyAnalyzer {
    source: Option<Arc<dyn SignalSource>>,
    split: BandSplit,
    /// Reused spectrum snapshot
    scratch: Vec<u8>,
}

impl FrequencyAnalyzer {
    pub fn new(split: BandSplit) -> Self {
        Self {
            source: None,
            split,
            scratch: Vec::new(),
        }
    }

    pub fn connect(&mut self, source: Arc<dyn SignalSource>) {
        self.source = Some(source);
    }

    /// Drop the source; later samples read as silence
    pub fn disconnect(&mut self) -> Option<Arc<dyn SignalSource>> {
        self.source.take()
    }

    /// Current band energies. No source, a detached source, or an empty
    /// spectrum all read as silence.
    pub fn sample(&mut self) -> FrequencyBands {
        let Some(source) = &self.source else {
            return FrequencyBands::default();
        };
        if !source.read_spectrum(&mut self.scratch) {
            return FrequencyBands::default();
        }
        band_energies(&self.scratch, &self.split)
    }
}
