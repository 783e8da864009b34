//! Viewport and recording configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Viewport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Viewport width (pixels)
    pub width: u32,

    /// Viewport height (pixels)
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Output format for recorded frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    Svg,
    Png,
}

impl FrameFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FrameFormat::Svg => "svg",
            FrameFormat::Png => "png",
        }
    }
}

/// Frames needed to cover `duration_secs` at `fps` (rounded up)
pub fn frame_count(duration_secs: f32, fps: u32) -> usize {
    let frames = duration_secs.max(0.0) as f64 * fps as f64;
    // f32 durations like 0.1 widen to slightly more than the typed value
    (frames - 1e-6).ceil().max(0.0) as usize
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: PathBuf,

    /// Frame rate (FPS)
    pub fps: u32,

    /// Frame file format
    pub format: FrameFormat,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            duration_secs,
            output_dir: output_dir.into(),
            fps: 60,
            format: FrameFormat::Svg,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        frame_count(self.duration_secs, self.fps)
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Path of a numbered frame
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.frames_dir()
            .join(format!("frame_{:05}.{}", index, self.format.extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_frame_count() {
        let config = RecordingConfig::new(2.5, "out");
        assert_eq!(config.total_frames(), 150);
    }

    #[test]
    fn test_frame_count_rounds_up() {
        assert_eq!(frame_count(0.5, 4), 2);
        assert_eq!(frame_count(0.51, 4), 3);
        assert_eq!(frame_count(0.1, 60), 6);
        assert_eq!(frame_count(0.0, 60), 0);
        assert_eq!(frame_count(-1.0, 60), 0);
    }

    #[test]
    fn test_frame_path_numbering() {
        let mut config = RecordingConfig::new(1.0, "out");
        config.format = FrameFormat::Png;
        assert_eq!(
            config.frame_path(7),
            PathBuf::from("out").join("frames").join("frame_00007.png")
        );
    }
}
