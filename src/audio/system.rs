//! Live audio: Glicol synthesis on a cpal output stream, analysed on a
//! background FFT thread.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use glicol::Engine;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{info, warn};

use super::fft::spawn_fft_thread;
use super::source::{SignalSource, SpectrumTap};
use crate::error::{Result, VizError};
use crate::params::{audio_constants::BLOCK_SIZE, AnalyserConfig};

type SharedWavWriter = Arc<Mutex<hound::WavWriter<std::io::BufWriter<std::fs::File>>>>;

/// Live audio system feeding a spectrum tap
pub struct LiveAudio {
    /// Spectrum published by the FFT thread
    tap: SpectrumTap,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,

    /// Cleared on drop to stop the FFT thread
    running: Arc<AtomicBool>,

    fft_thread: Option<thread::JoinHandle<()>>,

    capture: Option<SharedWavWriter>,
}

impl LiveAudio {
    /// Start playing `composition` and analysing its output.
    ///
    /// When `capture_path` is given the played audio is also written there
    /// as 32-bit float stereo WAV.
    pub fn start(
        config: AnalyserConfig,
        composition: &str,
        capture_path: Option<&Path>,
    ) -> Result<Self> {
        config.validate().map_err(VizError::Config)?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| VizError::Audio("No audio output device found".to_string()))?;

        let stream_config = device
            .default_output_config()
            .map_err(|e| VizError::Audio(format!("Failed to get audio config: {}", e)))?;

        info!(
            device = %device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate = stream_config.sample_rate().0,
            "audio output opened"
        );

        // Synthesize at the device rate; spectrum bins are rate-independent
        let sample_rate = stream_config.sample_rate().0 as usize;

        let capture = capture_path
            .map(|path| -> Result<SharedWavWriter> {
                let spec = hound::WavSpec {
                    channels: 2,
                    sample_rate: sample_rate as u32,
                    bits_per_sample: 32,
                    sample_format: hound::SampleFormat::Float,
                };
                Ok(Arc::new(Mutex::new(hound::WavWriter::create(path, spec)?)))
            })
            .transpose()?;
        let capture_clone = capture.clone();

        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(sample_rate);
        engine.update_with_code(composition);
        engine
            .update()
            .map_err(|e| VizError::Audio(format!("Glicol engine init failed: {:?}", e)))?;

        let engine = Arc::new(Mutex::new(engine));
        let engine_clone = Arc::clone(&engine);

        let sample_buffer = Arc::new(Mutex::new(Vec::<f32>::new()));
        let sample_buffer_clone = Arc::clone(&sample_buffer);

        let stream = device
            .build_output_stream(
                &stream_config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let (Ok(mut engine), Ok(mut samples)) =
                        (engine_clone.lock(), sample_buffer_clone.lock())
                    else {
                        data.iter_mut().for_each(|s| *s = 0.0);
                        return;
                    };

                    let frames_needed = data.len() / 2; // Stereo frames
                    let mut frame_idx = 0;

                    while frame_idx < frames_needed {
                        let (buffers, _) = engine.next_block(vec![]);
                        let samples_to_copy = (frames_needed - frame_idx).min(BLOCK_SIZE);

                        for i in 0..samples_to_copy {
                            // Hard clip to ±0.5
                            let left = buffers[0][i].clamp(-0.5, 0.5);
                            let right = buffers[1][i].clamp(-0.5, 0.5);

                            let out_idx = (frame_idx + i) * 2;
                            data[out_idx] = left;
                            data[out_idx + 1] = right;

                            samples.push(0.5 * (left + right));

                            if let Some(ref writer) = capture_clone {
                                if let Ok(mut w) = writer.lock() {
                                    let _ = w.write_sample(left);
                                    let _ = w.write_sample(right);
                                }
                            }
                        }

                        frame_idx += samples_to_copy;
                    }
                },
                |err| warn!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| VizError::Audio(format!("Failed to build audio stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| VizError::Audio(format!("Failed to start audio stream: {}", e)))?;

        let tap = SpectrumTap::new();
        let running = Arc::new(AtomicBool::new(true));
        let fft_thread = spawn_fft_thread(config, sample_buffer, tap.clone(), Arc::clone(&running));

        Ok(Self {
            tap,
            _stream: stream,
            running,
            fft_thread: Some(fft_thread),
            capture,
        })
    }

    /// Spectrum source to hand to a [`crate::analyzer::FrequencyAnalyzer`]
    pub fn source(&self) -> Arc<dyn SignalSource> {
        Arc::new(self.tap.clone())
    }
}

impl Drop for LiveAudio {
    fn drop(&mut self) {
        self.tap.detach();
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.fft_thread.take() {
            let _ = handle.join();
        }
        // WavWriter finalizes the capture file when the last clone drops
        self.capture.take();
    }
}
