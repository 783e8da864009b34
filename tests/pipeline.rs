//! End-to-end session scenarios: pattern text and audio in, ribbons out.

use std::sync::Arc;

use braless::audio::{SignalSource, WavSource};
use braless::params::VisualizerConfig;
use braless::rendering::svg;
use braless::session::VisualizerSession;

const DT: f64 = 1.0 / 60.0;

fn config() -> VisualizerConfig {
    let mut config = VisualizerConfig::default();
    config.viewport.width = 800;
    config.viewport.height = 400;
    config
}

/// 110 Hz tone with a 4-per-second amplitude pulse
fn pulsed_tone(seconds: f64, sample_rate: u32) -> Vec<f32> {
    let n = (seconds * sample_rate as f64) as usize;
    (0..n)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let gate = if (t * 4.0).fract() < 0.25 { 1.0 } else { 0.1 };
            (gate * 0.8 * (2.0 * std::f64::consts::PI * 110.0 * t).sin()) as f32
        })
        .collect()
}

#[test]
fn test_play_stop_play_envelope() {
    let mut session = VisualizerSession::new(config());
    session.set_code(r#"s("bd ~ sd ~")"#);

    session.set_playing(true);
    let mut amplitude = 0.0;
    for _ in 0..300 {
        let frame = session.tick(DT);
        assert!(frame.amplitude >= amplitude);
        amplitude = frame.amplitude;
    }
    assert_eq!(amplitude, 100.0);

    session.set_playing(false);
    let mut frames = 0;
    loop {
        let frame = session.tick(DT);
        assert!(frame.amplitude <= amplitude);
        amplitude = frame.amplitude;
        frames += 1;
        if amplitude == 0.0 {
            break;
        }
        assert!(frames < 1000, "envelope never reached zero");
    }
    // Smooth decay, not a jump
    assert!(frames > 30);

    // Stopped and flat: every ribbon sits on the centre line
    let flat = session.tick(DT);
    for ribbon in &flat.ribbons {
        assert!(ribbon.top.iter().all(|p| p.y == 199.0));
    }

    session.set_playing(true);
    assert_eq!(session.tick(DT).amplitude, 5.0);
}

#[test]
fn test_beat_intensity_pulses_with_pattern() {
    let mut session = VisualizerSession::new(config());
    session.set_code(r#"s("bd bd bd bd")"#);
    session.set_playing(true);

    // Two bars at 120 bpm
    let intensities: Vec<f64> = (0..240).map(|_| session.tick(DT).beat_intensity).collect();
    let peak = intensities.iter().cloned().fold(0.0, f64::max);
    let trough = intensities.iter().cloned().fold(1.0, f64::min);

    assert!(peak > 0.5, "peak {}", peak);
    assert!(trough < 0.2, "trough {}", trough);
    assert!(intensities.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn test_scope_pattern_drives_scope_intensity() {
    let mut session = VisualizerSession::new(config());
    session.set_code(r#"n("0 ~ 7 12").note("c3")"#);
    assert!(session.scope_pattern().is_some());

    session.set_playing(true);
    let max_scope = (0..480)
        .map(|_| session.tick(DT).scope_intensity)
        .fold(0.0, f64::max);
    assert!(max_scope > 0.5);

    // Code without a scope literal lets the scope fade out
    session.set_code(r#"s("bd sd")"#);
    let last = (0..60)
        .map(|_| session.tick(DT).scope_intensity)
        .last()
        .unwrap();
    assert!(last < 0.01);
}

#[test]
fn test_identical_runs_are_identical() {
    let samples = pulsed_tone(2.0, 22_050);
    let run = || {
        let source = Arc::new(WavSource::from_samples(
            samples.clone(),
            22_050,
            config().analyser,
        ));
        source.attach().unwrap();

        let mut session = VisualizerSession::new(config());
        session.connect_source(source.clone());
        session.set_code(r#"s("bd*2 ~ hh").fast(1.5)"#);
        session.set_playing(true);

        (1..=90)
            .map(|i| {
                source.seek(i as f64 * DT);
                let frame = session.tick(DT);
                frame
                    .ribbons
                    .iter()
                    .map(svg::path_data)
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_audio_energy_reaches_bands() {
    let source = Arc::new(WavSource::from_samples(
        pulsed_tone(1.0, 44_100),
        44_100,
        config().analyser,
    ));
    source.attach().unwrap();

    let mut session = VisualizerSession::new(config());
    session.connect_source(source.clone());
    session.set_playing(true);

    source.seek(0.2);
    let frame = session.tick(DT);
    assert!(frame.bands.bass > frame.bands.treble);
    assert!(frame.bands.bass > 0.0);

    // Past the end of the file the signal reads as silence
    source.seek(5.0);
    let frame = session.tick(DT);
    assert_eq!(frame.bands.overall, 0.0);
}

#[test]
fn test_degenerate_viewport_recovers() {
    let mut session = VisualizerSession::new(config());
    session.set_playing(true);

    session.resize(0, 0);
    assert!(session.tick(DT).ribbons.is_empty());

    session.resize(320, 240);
    let frame = session.tick(DT);
    assert_eq!(frame.ribbons.len(), 3);
    for ribbon in &frame.ribbons {
        assert_eq!(ribbon.len(), 2 * (200 + 1));
        assert!(ribbon.outline().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}
