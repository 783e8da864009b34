//! Braless - audio-reactive ribbon waveform visualizer
//!
//! Reads pattern-language source, follows its rhythm, and draws three
//! layered ribbons that breathe with the audio spectrum.

use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use braless::audio::{
    LiveAudio, SignalSource, WavSource, DEFAULT_PATTERN_CODE, GLICOL_COMPOSITION,
};
use braless::cli::{Args, DEFAULT_DURATION_SECS};
use braless::error::Result;
use braless::params::frame_count;
use braless::rendering::FrameRecorder;
use braless::session::{Frame, VisualizerSession};

/// How the run is clocked
enum Pacing {
    /// Fixed dt per frame, as fast as possible (deterministic)
    Stepped,
    /// Wall-clock dt, sleeping to hold the frame rate
    RealTime,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = args.load_config()?;
    let code = args.load_code(DEFAULT_PATTERN_CODE)?;

    let mut session = VisualizerSession::new(config.clone());
    session.set_code(&code);
    info!(
        beats = ?session.beat_pattern().beats,
        bpm = session.beat_pattern().bpm,
        scope = session.scope_pattern().is_some(),
        "pattern loaded"
    );

    // The live audio handle must outlive the run loop
    let (pacing, duration, wav, live) = if let Some(path) = &args.wav {
        let source = Arc::new(WavSource::open(path, config.analyser.clone())?);
        source.attach()?;
        let duration = args.duration.unwrap_or(source.duration_secs() as f32);
        info!(path = %path.display(), seconds = source.duration_secs(), "offline WAV analysis");
        session.connect_source(source.clone());
        (Pacing::Stepped, duration, Some(source), None)
    } else if args.silent {
        info!("silent run, rhythm from pattern text only");
        let duration = args.duration.unwrap_or(DEFAULT_DURATION_SECS);
        (Pacing::Stepped, duration, None, None)
    } else {
        let composition = match &args.glicol {
            Some(path) => std::fs::read_to_string(path)?,
            None => GLICOL_COMPOSITION.to_string(),
        };
        let capture = args.record.as_ref().map(|dir| dir.join("audio.wav"));
        if let Some(dir) = &args.record {
            std::fs::create_dir_all(dir)?;
        }
        let live = LiveAudio::start(config.analyser.clone(), &composition, capture.as_deref())?;
        let source = live.source();
        source.attach()?;
        session.connect_source(source);
        let duration = args.duration.unwrap_or(DEFAULT_DURATION_SECS);
        (Pacing::RealTime, duration, None, Some(live))
    };

    let mut recorder = match args.recording_config(duration) {
        Some(recording) => Some(FrameRecorder::create(
            recording,
            config.wave.clone(),
            config.viewport.width,
            config.viewport.height,
        )?),
        None => None,
    };

    session.set_playing(true);
    run(
        &args,
        &mut session,
        pacing,
        duration,
        wav.as_deref(),
        recorder.as_mut(),
    )?;

    if let Some(recorder) = recorder {
        recorder.finish();
    }
    if let Some(live) = live {
        session.disconnect_source();
        drop(live);
    }
    Ok(())
}

fn run(
    args: &Args,
    session: &mut VisualizerSession,
    pacing: Pacing,
    duration: f32,
    wav: Option<&WavSource>,
    mut recorder: Option<&mut FrameRecorder>,
) -> Result<()> {
    let fps = args.fps.max(1);
    let frame_dt = 1.0 / fps as f64;
    let total_frames = frame_count(duration, fps);
    let stop_after = args.stop_after.map(f64::from);

    let start = Instant::now();
    let mut last = start;
    let mut elapsed = 0.0;

    for frame_idx in 0..total_frames {
        let dt = match pacing {
            Pacing::Stepped => frame_dt,
            Pacing::RealTime => {
                let target = start + Duration::from_secs_f64(frame_idx as f64 * frame_dt);
                if let Some(wait) = target.checked_duration_since(Instant::now()) {
                    std::thread::sleep(wait);
                }
                let now = Instant::now();
                let dt = now.duration_since(last).as_secs_f64();
                last = now;
                dt
            }
        };
        elapsed += dt;

        if let Some(source) = wav {
            source.seek(elapsed);
        }
        if let Some(limit) = stop_after {
            if elapsed >= limit && session.is_playing() {
                info!(seconds = elapsed, "stopping playback");
                session.set_playing(false);
            }
        }

        let frame = session.tick(dt);

        if frame_idx % fps as usize == 0 {
            report(&frame, elapsed);
        }
        if let Some(recorder) = recorder.as_deref_mut() {
            if !recorder.is_complete() {
                recorder.write_frame(&frame)?;
            }
        }
    }

    Ok(())
}

fn report(frame: &Frame, elapsed: f64) {
    info!(
        t = elapsed,
        bass = frame.bands.bass,
        mid = frame.bands.mid,
        treble = frame.bands.treble,
        beat = frame.beat_intensity,
        scope = frame.scope_intensity,
        amplitude = frame.amplitude,
        ribbons = frame.ribbons.len(),
        "frame"
    );
}
