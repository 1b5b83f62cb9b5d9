//! Tunnel layout and physics tuning
//!
//! Both structs default to the values in [`crate::consts`] and can be loaded
//! from a JSON file. Missing fields fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Shape of the tunnel and the segment window around the ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    /// Distance from the axis to each face
    pub radius: f32,
    /// Number of faces of the cross-section
    pub sides: u32,
    /// Length of a segment along the forward axis
    pub segment_length: f32,
    /// Empty space between consecutive segments
    pub gap_length: f32,
    pub segments_ahead: u32,
    pub segments_behind: u32,
    pub ball_radius: f32,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            radius: TUNNEL_RADIUS,
            sides: TUNNEL_SIDES,
            segment_length: SEGMENT_LENGTH,
            gap_length: GAP_LENGTH,
            segments_ahead: SEGMENTS_AHEAD,
            segments_behind: SEGMENTS_BEHIND,
            ball_radius: BALL_RADIUS,
        }
    }
}

impl TunnelConfig {
    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        if self.sides < 3 {
            return Err(ConfigError::TooFewSides(self.sides));
        }
        if !(self.segment_length > 0.0) {
            return Err(ConfigError::InvalidSegmentLength(self.segment_length));
        }
        if !(self.gap_length >= 0.0) {
            return Err(ConfigError::InvalidGapLength(self.gap_length));
        }
        if !(self.ball_radius > 0.0 && self.ball_radius < self.radius) {
            return Err(ConfigError::InvalidBallRadius(self.ball_radius));
        }
        Ok(())
    }

    /// Distance between the starts of two consecutive segments
    #[inline]
    pub fn spacing(&self) -> f32 {
        self.segment_length + self.gap_length
    }

    /// Forward position of the platform centers of segment 0
    #[inline]
    pub fn first_platform_center(&self) -> f32 {
        self.segment_length / 2.0
    }

    /// Forward position of the platform centers of segment `index`
    #[inline]
    pub fn platform_center(&self, index: u32) -> f32 {
        self.first_platform_center() + index as f32 * self.spacing()
    }

    /// Segment containing a forward position (negative positions map to 0)
    #[inline]
    pub fn segment_index_at(&self, forward: f32) -> u32 {
        (forward / self.spacing()).floor().max(0.0) as u32
    }

    /// Distance from the axis to a platform's walkable surface
    #[inline]
    pub fn platform_surface_distance(&self) -> f32 {
        self.radius - PLATFORM_INSET - PLATFORM_THICKNESS / 2.0
    }

    /// Vertical offset below which the run is lost
    #[inline]
    pub fn lose_threshold(&self) -> f32 {
        -self.radius - LOSE_MARGIN
    }

    /// Vertical offset of a ball resting on an unrotated bottom platform
    pub fn resting_offset(&self) -> f32 {
        -self.platform_surface_distance() + self.ball_radius
    }
}

/// Per-tick kinematics and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Vertical acceleration per tick (negative)
    pub gravity: f32,
    /// Vertical velocity after every bounce
    pub bounce_speed: f32,
    /// Forward distance per tick at difficulty level 0
    pub forward_speed: f32,
    pub bounces_per_level: u32,
    pub speed_increment: f32,
    /// Radians per second while a rotate key is held
    pub rotation_speed: f32,
    /// Easing rate of the tunnel angle toward its target (1/s)
    pub rotation_easing: f32,
    pub bounce_score: u64,
    pub collectible_score: u64,
    pub collect_radius: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            bounce_speed: BOUNCE_SPEED,
            forward_speed: FORWARD_SPEED,
            bounces_per_level: BOUNCES_PER_LEVEL,
            speed_increment: SPEED_INCREMENT,
            rotation_speed: ROTATION_SPEED,
            rotation_easing: ROTATION_EASING,
            bounce_score: BOUNCE_SCORE,
            collectible_score: COLLECTIBLE_SCORE,
            collect_radius: COLLECT_RADIUS,
        }
    }
}

impl PhysicsTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gravity < 0.0) {
            return Err(ConfigError::InvalidTuning("gravity must be negative"));
        }
        if !(self.bounce_speed > 0.0) {
            return Err(ConfigError::InvalidTuning("bounce speed must be positive"));
        }
        if !(self.forward_speed > 0.0) {
            return Err(ConfigError::InvalidTuning("forward speed must be positive"));
        }
        if self.bounces_per_level == 0 {
            return Err(ConfigError::InvalidTuning("bounces per level must be at least 1"));
        }
        if !(self.speed_increment >= 0.0) {
            return Err(ConfigError::InvalidTuning("speed increment must not be negative"));
        }
        if !(self.rotation_easing > 0.0) {
            return Err(ConfigError::InvalidTuning("rotation easing must be positive"));
        }
        Ok(())
    }

    /// Difficulty multiplier applied to gravity and forward speed
    ///
    /// Ramps by `speed_increment` every `bounces_per_level` bounces. Bounce
    /// speed is not scaled, so jump height stays the same at every level.
    #[inline]
    pub fn speed_multiplier(&self, jump_count: u32) -> f32 {
        1.0 + (jump_count / self.bounces_per_level) as f32 * self.speed_increment
    }

    /// Ticks from a bounce to the apex at level 0
    pub fn ticks_to_apex(&self) -> f32 {
        self.bounce_speed / -self.gravity
    }
}

/// Full session configuration as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub tunnel: TunnelConfig,
    pub physics: PhysicsTuning,
    /// Fixed RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.tunnel.validate()?;
        config.physics.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
