//! Offline signal source backed by a WAV file.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::fft::SpectrumAnalyser;
use super::source::SignalSource;
use crate::error::Result;
use crate::params::AnalyserConfig;

struct Playback {
    /// Playhead position in samples
    position: usize,
    analyser: SpectrumAnalyser,
}

/// Analyses a decoded WAV file at a caller-controlled playhead
///
/// Used for deterministic offline rendering: the host advances the
/// playhead by exactly one frame duration per tick.
pub struct WavSource {
    samples: Vec<f32>,
    sample_rate: u32,
    fft_size: usize,
    playback: Mutex<Playback>,
    attached: AtomicBool,
}

impl WavSource {
    /// Decode a WAV file, mixing all channels down to mono
    pub fn open(path: impl AsRef<Path>, config: AnalyserConfig) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        let samples = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        Ok(Self::from_samples(samples, spec.sample_rate, config))
    }

    /// Wrap already-decoded mono samples
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32, config: AnalyserConfig) -> Self {
        Self {
            samples,
            sample_rate,
            fft_size: config.fft_size,
            playback: Mutex::new(Playback {
                position: 0,
                analyser: SpectrumAnalyser::new(config),
            }),
            attached: AtomicBool::new(false),
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate.max(1) as f64
    }

    /// Move the playhead to `seconds` from the start of the file
    pub fn seek(&self, seconds: f64) {
        let position = (seconds.max(0.0) * self.sample_rate as f64) as usize;
        if let Ok(mut playback) = self.playback.lock() {
            playback.position = position;
        }
    }
}

impl SignalSource for WavSource {
    fn attach(&self) -> Result<()> {
        if let Ok(mut playback) = self.playback.lock() {
            playback.analyser.reset();
        }
        self.attached.store(true, Ordering::Release);
        Ok(())
    }

    fn detach(&self) {
        self.attached.store(false, Ordering::Release);
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    fn read_spectrum(&self, out: &mut Vec<u8>) -> bool {
        if !self.is_attached() {
            return false;
        }
        let Ok(mut playback) = self.playback.lock() else {
            return false;
        };
        // Past the end of the file the signal is gone
        if playback.position >= self.samples.len() {
            return false;
        }

        let end = playback.position;
        let start = end.saturating_sub(self.fft_size);
        let spectrum = playback.analyser.process(&self.samples[start..end]);
        out.clear();
        out.extend_from_slice(spectrum);
        true
    }
}
