//! Configuration errors
//!
//! The simulation tick itself never fails; everything that can go wrong is
//! rejected when a session is built.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tunnel radius must be positive, got {0}")]
    InvalidRadius(f32),
    #[error("tunnel needs at least 3 sides, got {0}")]
    TooFewSides(u32),
    #[error("segment length must be positive, got {0}")]
    InvalidSegmentLength(f32),
    #[error("gap length must not be negative, got {0}")]
    InvalidGapLength(f32),
    #[error("ball radius must be positive and smaller than the tunnel radius, got {0}")]
    InvalidBallRadius(f32),
    #[error("invalid physics tuning: {0}")]
    InvalidTuning(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}
