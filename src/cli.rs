//! Command-line argument parsing.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::Result;
use crate::params::{FrameFormat, RecordingConfig, VisualizerConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "braless")]
#[command(about = "Audio-reactive ribbon waveform driven by live-coded patterns", long_about = None)]
pub struct Args {
    /// Pattern source file driving beat and scope extraction
    #[arg(long, value_name = "FILE")]
    pub code: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Analyse a WAV file offline, stepping one frame at a time
    #[arg(long, value_name = "FILE", conflicts_with = "silent")]
    pub wav: Option<PathBuf>,

    /// Glicol composition to play live instead of the built-in one
    #[arg(long, value_name = "FILE", conflicts_with_all = ["wav", "silent"])]
    pub glicol: Option<PathBuf>,

    /// Run without any audio signal (rhythm from the pattern text only)
    #[arg(long)]
    pub silent: bool,

    /// Run length (seconds). Defaults to the WAV length, or 10 s.
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Stop playback after this many seconds to show the flatline
    #[arg(long, value_name = "SECONDS")]
    pub stop_after: Option<f32>,

    /// Viewport width (pixels), overrides the config
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height (pixels), overrides the config
    #[arg(long)]
    pub height: Option<u32>,

    /// Record numbered frames into DIR
    #[arg(long, value_name = "DIR")]
    pub record: Option<PathBuf>,

    /// Recorded frame format
    #[arg(long, value_enum, default_value_t = FormatArg::Svg)]
    pub format: FormatArg,

    /// Frame rate (FPS)
    #[arg(long, default_value_t = 60)]
    pub fps: u32,
}

/// Frame format as spelled on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Svg,
    Png,
}

impl From<FormatArg> for FrameFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Svg => FrameFormat::Svg,
            FormatArg::Png => FrameFormat::Png,
        }
    }
}

/// Default run length without a WAV file (seconds)
pub const DEFAULT_DURATION_SECS: f32 = 10.0;

impl Args {
    /// Load the config file (or defaults) and apply viewport overrides
    pub fn load_config(&self) -> Result<VisualizerConfig> {
        let mut config = match &self.config {
            Some(path) => VisualizerConfig::load(path)?,
            None => VisualizerConfig::default(),
        };
        if let Some(width) = self.width {
            config.viewport.width = width;
        }
        if let Some(height) = self.height {
            config.viewport.height = height;
        }
        config.validate()?;
        Ok(config)
    }

    /// Pattern source text, or `fallback` when no file was given
    pub fn load_code(&self, fallback: &str) -> Result<String> {
        match &self.code {
            Some(path) => Ok(std::fs::read_to_string(path)?),
            None => Ok(fallback.to_string()),
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn recording_config(&self, duration_secs: f32) -> Option<RecordingConfig> {
        self.record.as_ref().map(|dir| {
            let mut config = RecordingConfig::new(duration_secs, dir);
            config.fps = self.fps.max(1);
            config.format = self.format.into();
            config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["braless"]).unwrap();
        assert!(args.code.is_none());
        assert!(!args.silent);
        assert_eq!(args.fps, 60);
        assert_eq!(args.format, FormatArg::Svg);
        assert!(args.recording_config(1.0).is_none());
    }

    #[test]
    fn test_recording_flags() {
        let args = Args::try_parse_from([
            "braless", "--record", "out", "--format", "png", "--fps", "30", "--width", "640",
        ])
        .unwrap();

        let recording = args.recording_config(2.0).unwrap();
        assert_eq!(recording.fps, 30);
        assert_eq!(recording.format, FrameFormat::Png);
        assert_eq!(recording.total_frames(), 60);

        let config = args.load_config().unwrap();
        assert_eq!(config.viewport.width, 640);
        assert_eq!(config.viewport.height, 720);
    }

    #[test]
    fn test_wav_conflicts_with_silent() {
        assert!(Args::try_parse_from(["braless", "--wav", "a.wav", "--silent"]).is_err());
    }

    #[test]
    fn test_zero_viewport_override_is_allowed() {
        let args = Args::try_parse_from(["braless", "--width", "0"]).unwrap();
        assert_eq!(args.load_config().unwrap().viewport.width, 0);
    }
}
