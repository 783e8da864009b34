//! Error types for the host-facing parts of the visualizer.
//!
//! The per-frame core (analyzer, pattern extraction, clock, envelope,
//! ribbon synthesis) never fails. Only configuration, audio devices and
//! file output can.

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, VizError>;

#[derive(Debug, thiserror::Error)]
pub enum VizError {
    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Config file could not be parsed
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio device or engine failure
    #[error("audio error: {0}")]
    Audio(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = VizError::Config("resolution must be >= 50".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: resolution must be >= 50"
        );

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: VizError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
