//! Spectrum analysis configuration and band partitioning.

use serde::Deserialize;
use std::ops::Range;

/// Spectrum analyser configuration (mirrors a browser analyser node)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyserConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: usize,

    /// FFT window size (must be power of 2, yields `fft_size / 2` bins)
    pub fft_size: usize,

    /// FFT update interval for the live analysis thread (milliseconds)
    /// 16 ms ≈ one update per 60 Hz frame
    pub update_interval_ms: u64,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_decibels: f32,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_decibels: f32,

    /// Per-bin smoothing between successive spectra, in [0, 1)
    pub smoothing_time_constant: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 2048,
            update_interval_ms: 16,
            min_decibels: -100.0,
            max_decibels: -30.0,
            smoothing_time_constant: 0.8,
        }
    }
}

impl AnalyserConfig {
    /// Number of magnitude bins produced per spectrum
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 2048 {
            return Err(format!(
                "FFT size must be a power of 2 and >= 2048, got {}",
                self.fft_size
            ));
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if !(self.min_decibels.is_finite()
            && self.max_decibels.is_finite()
            && self.min_decibels < self.max_decibels)
        {
            return Err(format!(
                "min_decibels ({}) must be below max_decibels ({})",
                self.min_decibels, self.max_decibels
            ));
        }
        if !(0.0..1.0).contains(&self.smoothing_time_constant) {
            return Err(format!(
                "smoothing_time_constant must be in [0, 1), got {}",
                self.smoothing_time_constant
            ));
        }
        Ok(())
    }
}

/// Partition of the bin range into bass / mid / treble
///
/// Bass content concentrates in the lowest few percent of the represented
/// bandwidth, so the split is by bin fraction, not by Hz.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BandSplit {
    /// Fraction of bins assigned to bass (from bin 0)
    pub bass_fraction: f64,

    /// Fraction of bins assigned to mid (after bass); treble takes the rest
    pub mid_fraction: f64,

    /// Gain applied to the bass average before clamping to 1
    pub bass_gain: f64,
}

impl Default for BandSplit {
    fn default() -> Self {
        Self {
            bass_fraction: 0.10,
            mid_fraction: 0.50,
            bass_gain: 2.0,
        }
    }
}

impl BandSplit {
    /// Bin range for bass
    pub fn bass_bins(&self, bin_count: usize) -> Range<usize> {
        0..self.bass_end(bin_count)
    }

    /// Bin range for mid
    pub fn mid_bins(&self, bin_count: usize) -> Range<usize> {
        self.bass_end(bin_count)..self.mid_end(bin_count)
    }

    /// Bin range for treble (everything above mid)
    pub fn treble_bins(&self, bin_count: usize) -> Range<usize> {
        self.mid_end(bin_count)..bin_count
    }

    fn bass_end(&self, bin_count: usize) -> usize {
        ((bin_count as f64 * self.bass_fraction).floor() as usize).min(bin_count)
    }

    fn mid_end(&self, bin_count: usize) -> usize {
        let mid_len = (bin_count as f64 * self.mid_fraction).floor() as usize;
        (self.bass_end(bin_count) + mid_len).min(bin_count)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.bass_fraction >= 0.0
            && self.mid_fraction >= 0.0
            && self.bass_fraction + self.mid_fraction <= 1.0)
        {
            return Err(format!(
                "band fractions must be non-negative and sum to <= 1, got bass {} mid {}",
                self.bass_fraction, self.mid_fraction
            ));
        }
        if !(self.bass_gain.is_finite() && self.bass_gain > 0.0) {
            return Err(format!("bass_gain must be finite and > 0, got {}", self.bass_gain));
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    /// 128 samples = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_ranges_cover_all_bins() {
        let split = BandSplit::default();

        let bass = split.bass_bins(1024);
        let mid = split.mid_bins(1024);
        let treble = split.treble_bins(1024);

        assert_eq!(bass, 0..102);
        assert_eq!(mid, 102..614);
        assert_eq!(treble, 614..1024);
    }

    #[test]
    fn test_band_ranges_tiny_spectrum() {
        let split = BandSplit::default();

        // 4 bins: bass rounds down to empty, mid gets 2, treble the rest
        assert!(split.bass_bins(4).is_empty());
        assert_eq!(split.mid_bins(4), 0..2);
        assert_eq!(split.treble_bins(4), 2..4);
    }

    #[test]
    fn test_analyser_config_validation() {
        assert!(AnalyserConfig::default().validate().is_ok());
        assert_eq!(AnalyserConfig::default().bin_count(), 1024);

        let bad_size = AnalyserConfig {
            fft_size: 3000,
            ..Default::default()
        };
        assert!(bad_size.validate().is_err());

        let bad_db = AnalyserConfig {
            min_decibels: -20.0,
            ..Default::default()
        };
        assert!(bad_db.validate().is_err());
    }
}
