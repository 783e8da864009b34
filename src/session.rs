//! Visualizer session: owns all per-frame state and advances it one tick
//! at a time.
//!
//! Everything here runs on the render thread. The only data crossing
//! threads is the spectrum snapshot read through the analyzer.

use std::sync::Arc;
use tracing::{debug, info};

use crate::analyzer::{FrequencyAnalyzer, FrequencyBands};
use crate::audio::SignalSource;
use crate::clock::BeatClock;
use crate::envelope::AmplitudeEnvelope;
use crate::params::VisualizerConfig;
use crate::rhythm::{extract_beat_pattern, extract_scope_pattern, BeatPattern, ScopePattern};
use crate::ribbon::{LayerState, RibbonGeometry, RibbonSynthesizer, SynthInput, LAYER_COUNT};

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct Frame {
    /// Animation time (seconds, scaled by the configured speed)
    pub time: f64,
    pub bands: FrequencyBands,
    pub beat_intensity: f64,
    pub scope_intensity: f64,
    /// Envelope amplitude used for this frame (pixels)
    pub amplitude: f64,
    /// One ribbon per layer, or none when the viewport is degenerate
    pub ribbons: Vec<RibbonGeometry>,
}

/// Frame-sequential visualizer state
pub struct VisualizerSession {
    config: VisualizerConfig,
    analyzer: FrequencyAnalyzer,
    clock: BeatClock,
    envelope: AmplitudeEnvelope,
    synthesizer: RibbonSynthesizer,
    layers: [LayerState; LAYER_COUNT],

    /// Source text the cached patterns were extracted from
    code: String,
    beat_pattern: BeatPattern,
    scope_pattern: Option<ScopePattern>,

    playing: bool,
    width: f64,
    height: f64,
    /// Animation time, scaled by the configured speed
    time: f64,
    /// Unscaled seconds; the beat clock follows this
    wall_time: f64,
}

impl VisualizerSession {
    pub fn new(config: VisualizerConfig) -> Self {
        let analyzer = FrequencyAnalyzer::new(config.bands.clone());
        let clock = BeatClock::new(config.rhythm.clone());
        let envelope = AmplitudeEnvelope::new(&config.envelope);
        let synthesizer = RibbonSynthesizer::new(&config.wave);
        let width = config.viewport.width as f64;
        let height = config.viewport.height as f64;

        Self {
            config,
            analyzer,
            clock,
            envelope,
            synthesizer,
            layers: LayerState::all(),
            code: String::new(),
            beat_pattern: BeatPattern::default(),
            scope_pattern: None,
            playing: false,
            width,
            height,
            time: 0.0,
            wall_time: 0.0,
        }
    }

    /// Connect the spectrum source the analyzer samples while playing
    pub fn connect_source(&mut self, source: Arc<dyn SignalSource>) {
        info!("signal source connected");
        self.analyzer.connect(source);
    }

    pub fn disconnect_source(&mut self) -> Option<Arc<dyn SignalSource>> {
        info!("signal source disconnected");
        self.analyzer.disconnect()
    }

    /// Update the pattern source. Patterns are only re-extracted when the
    /// text actually changed.
    pub fn set_code(&mut self, code: &str) -> bool {
        if code == self.code {
            return false;
        }
        self.code = code.to_string();
        self.beat_pattern = extract_beat_pattern(code);
        self.scope_pattern = extract_scope_pattern(code);
        debug!(
            beats = self.beat_pattern.beats.len(),
            bpm = self.beat_pattern.bpm,
            scope = self.scope_pattern.is_some(),
            "patterns refreshed"
        );
        true
    }

    pub fn set_playing(&mut self, playing: bool) {
        if playing != self.playing {
            debug!(playing, "transport changed");
        }
        self.playing = playing;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f64;
        self.height = height as f64;
    }

    /// Advance by `dt` wall-clock seconds and produce the frame
    pub fn tick(&mut self, dt: f64) -> Frame {
        if dt.is_finite() && dt > 0.0 {
            self.time += dt * self.config.wave.speed;
            self.wall_time += dt;
        }

        let (bands, beat_intensity, scope_intensity) = if self.playing {
            let elapsed = self.clock.playback_elapsed(self.wall_time);
            let bands = self.analyzer.sample();
            let beat = self.clock.tick(elapsed, &self.beat_pattern);
            let scope = match &self.scope_pattern {
                Some(pattern) => self.clock.tick_scope(elapsed, pattern),
                None => self.clock.fade_scope(),
            };
            (bands, beat, scope)
        } else {
            self.clock.decay();
            (
                FrequencyBands::default(),
                self.clock.beat_intensity(),
                self.clock.scope_intensity(),
            )
        };

        let target = if self.playing {
            self.config.wave.amplitude
        } else {
            0.0
        };
        let amplitude = self.envelope.step(target);

        let input = SynthInput {
            time: self.time,
            bands,
            beat_intensity,
            scope_intensity,
            amplitude,
            width: self.width,
            height: self.height,
        };
        let ribbons = self.synthesizer.synthesize(&self.layers, &input);

        Frame {
            time: self.time,
            bands,
            beat_intensity,
            scope_intensity,
            amplitude,
            ribbons,
        }
    }

    pub fn beat_pattern(&self) -> &BeatPattern {
        &self.beat_pattern
    }

    pub fn scope_pattern(&self) -> Option<&ScopePattern> {
        self.scope_pattern.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}
