//! Frame output: SVG documents, PNG rasters, and the numbered-frame recorder.

pub mod raster;
pub mod svg;

use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::Result;
use crate::params::{FrameFormat, RecordingConfig, WaveConfig};
use crate::session::Frame;

/// Writes one numbered file per frame into the recording's frame directory
pub struct FrameRecorder {
    config: RecordingConfig,
    wave: WaveConfig,
    width: u32,
    height: u32,
    frames_written: usize,
}

impl FrameRecorder {
    /// Create the output directories and start a recording
    pub fn create(config: RecordingConfig, wave: WaveConfig, width: u32, height: u32) -> Result<Self> {
        std::fs::create_dir_all(config.frames_dir())?;
        info!(
            dir = %config.frames_dir().display(),
            frames = config.total_frames(),
            fps = config.fps,
            format = config.format.extension(),
            "recording started"
        );

        Ok(Self {
            config,
            wave,
            width,
            height,
            frames_written: 0,
        })
    }

    /// Write the next frame and return its path
    pub fn write_frame(&mut self, frame: &Frame) -> Result<PathBuf> {
        let path = self.config.frame_path(self.frames_written);

        let written: Result<()> = match self.config.format {
            FrameFormat::Svg => {
                let doc = svg::document(frame, self.width, self.height, &self.wave);
                std::fs::write(&path, doc).map_err(Into::into)
            }
            FrameFormat::Png => raster::rasterize(frame, self.width, self.height, &self.wave)
                .save(&path)
                .map_err(Into::into),
        };
        if let Err(e) = &written {
            warn!(frame = self.frames_written, error = %e, "failed to write frame");
        }
        written?;

        self.frames_written += 1;
        Ok(path)
    }

    /// Recording is complete once the configured duration is covered
    pub fn is_complete(&self) -> bool {
        self.frames_written >= self.config.total_frames()
    }

    /// End the recording, returning the number of frames written
    pub fn finish(self) -> usize {
        info!(
            frames = self.frames_written,
            dir = %self.config.frames_dir().display(),
            "recording finished"
        );
        self.frames_written
    }
}
