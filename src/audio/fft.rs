//! FFT analysis producing byte magnitude spectra.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::source::SpectrumTap;
use crate::params::AnalyserConfig;

/// Converts windows of PCM samples into smoothed byte spectra
///
/// Bin values follow the browser analyser convention: magnitude scaled by
/// 1/N, smoothed against the previous spectrum, converted to dB, then mapped
/// linearly from `[min_decibels, max_decibels]` onto `0..=255`.
pub struct SpectrumAnalyser {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
}

impl SpectrumAnalyser {
    pub fn new(config: AnalyserConfig) -> Self {
        let size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let window = (0..size).map(|i| hann_window(i, size)).collect();

        Self {
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); size],
            smoothed: vec![0.0; config.bin_count()],
            bytes: vec![0; config.bin_count()],
            config,
        }
    }

    /// Analyse the most recent `fft_size` samples (zero-padded in front when
    /// fewer are given) and return the byte spectrum.
    pub fn process(&mut self, samples: &[f32]) -> &[u8] {
        let size = self.config.fft_size;
        let take = samples.len().min(size);
        let pad = size - take;
        let recent = &samples[samples.len() - take..];

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        let tau = self.config.smoothing_time_constant;
        let min_db = self.config.min_decibels;
        let range_db = self.config.max_decibels - min_db;
        let scale = 1.0 / size as f32;

        for (bin, (smoothed, byte)) in self
            .smoothed
            .iter_mut()
            .zip(self.bytes.iter_mut())
            .enumerate()
        {
            let magnitude = self.buffer[bin].norm() * scale;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;

            let db = if *smoothed > 0.0 {
                20.0 * smoothed.log10()
            } else {
                f32::NEG_INFINITY
            };
            let scaled = 255.0 * (db - min_db) / range_db;
            *byte = scaled.clamp(0.0, 255.0) as u8;
        }

        &self.bytes
    }

    /// Forget smoothing history
    pub fn reset(&mut self) {
        self.smoothed.iter_mut().for_each(|s| *s = 0.0);
        self.bytes.iter_mut().for_each(|b| *b = 0);
    }
}

/// Spawn FFT analysis thread
///
/// Consumes `sample_buffer` with 50% overlap and publishes each spectrum to
/// `tap` until `running` is cleared.
pub fn spawn_fft_thread(
    config: AnalyserConfig,
    sample_buffer: Arc<Mutex<Vec<f32>>>,
    tap: SpectrumTap,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let size = config.fft_size;
        let interval = Duration::from_millis(config.update_interval_ms);
        let mut analyser = SpectrumAnalyser::new(config);
        let mut window = Vec::with_capacity(size);

        while running.load(Ordering::Acquire) {
            thread::sleep(interval);

            {
                let Ok(mut buf) = sample_buffer.lock() else {
                    tracing::warn!("sample buffer poisoned, stopping FFT thread");
                    return;
                };
                if buf.len() < size {
                    continue;
                }
                // Fell behind: skip to the newest window instead of lagging
                if buf.len() > size * 4 {
                    let excess = buf.len() - size;
                    buf.drain(0..excess);
                }
                window.clear();
                window.extend_from_slice(&buf[..size]);

                // 50% overlap (drain half the buffer)
                buf.drain(0..size / 2);
            }

            tap.publish(analyser.process(&window));
        }
    })
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
