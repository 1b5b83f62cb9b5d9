//! Tunnel Runner - simulation core for an endless rotating-tunnel ball game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, segment streaming, game state)
//! - `config`: Tunnel and physics tuning, loadable from JSON
//! - `error`: Configuration errors
//!
//! Rendering, audio and persistence live outside this crate and consume
//! [`sim::Snapshot`] and [`sim::GameEvent`] values.

pub mod config;
pub mod error;
pub mod sim;

pub use config::{PhysicsTuning, TunnelConfig};
pub use error::ConfigError;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default frame delta for headless runs (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Tunnel defaults
    pub const TUNNEL_RADIUS: f32 = 4.0;
    pub const TUNNEL_SIDES: u32 = 8;
    pub const SEGMENT_LENGTH: f32 = 3.0;
    pub const GAP_LENGTH: f32 = 6.0;
    pub const SEGMENTS_AHEAD: u32 = 6;
    pub const SEGMENTS_BEHIND: u32 = 2;
    /// Extra segments kept behind the window before eviction
    pub const EVICTION_HYSTERESIS: u32 = 2;

    /// Platform placement relative to its face
    pub const PLATFORM_INSET: f32 = 0.2;
    pub const PLATFORM_THICKNESS: f32 = 0.2;
    /// Collectibles hover this far in from the face
    pub const COLLECTIBLE_INSET: f32 = 1.0;
    /// Chance that the first platform of a segment carries a collectible
    pub const COLLECTIBLE_CHANCE: f32 = 0.3;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.3;
    /// Gap left between ball and platform after a bounce
    pub const REST_EPSILON: f32 = 0.001;
    /// Vertical slack allowed when deciding that the ball reached a platform
    pub const LANDING_TOLERANCE: f32 = 0.01;
    /// Ball falls this far below the tunnel wall before the run is lost
    pub const LOSE_MARGIN: f32 = 3.0;

    /// Per-tick kinematics (logical step, not seconds)
    pub const GRAVITY: f32 = -0.006;
    pub const BOUNCE_SPEED: f32 = 0.24;
    pub const FORWARD_SPEED: f32 = 0.1125;
    /// Difficulty ramps every this many bounces
    pub const BOUNCES_PER_LEVEL: u32 = 10;
    pub const SPEED_INCREMENT: f32 = 0.15;

    /// Tunnel rotation (radians per second while a key is held)
    pub const ROTATION_SPEED: f32 = 3.0;
    /// Exponential easing rate toward the target angle (1/s)
    pub const ROTATION_EASING: f32 = 12.0;

    /// Scoring
    pub const BOUNCE_SCORE: u64 = 1;
    pub const COLLECTIBLE_SCORE: u64 = 5;
    pub const COLLECT_RADIUS: f32 = 0.6;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Rotate a point around the tunnel axis by `angle` radians
#[inline]
pub fn rotate(point: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let p = rotate(Vec2::new(1.0, 0.0), PI / 2.0);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
    }
}
