//! Ball kinematics
//!
//! One call to [`step`] is one logical tick. Gravity and forward speed scale
//! with the difficulty multiplier while the bounce speed stays fixed, so the
//! apex always falls halfway between two platform centers.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{self, Landing, Probe};
use super::window::SegmentWindow;
use crate::config::{PhysicsTuning, TunnelConfig};
use crate::consts::REST_EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    /// Distance along the tunnel axis
    pub forward: f32,
    /// Height relative to the axis (negative is down)
    pub vertical: f32,
    /// Vertical velocity per tick
    pub velocity: f32,
    pub jump_count: u32,
}

impl BallState {
    /// Ball at rest on the segment 0 foothold
    pub fn resting(config: &TunnelConfig) -> Self {
        Self {
            forward: config.first_platform_center(),
            vertical: config.resting_offset(),
            velocity: 0.0,
            jump_count: 0,
        }
    }

    /// Still sitting on the foothold, waiting for its first tick of play
    pub fn on_foothold(&self, config: &TunnelConfig) -> bool {
        self.jump_count == 0
            && self.velocity == 0.0
            && self.forward == config.first_platform_center()
    }

    /// World-space center (the ball stays in the x = 0 plane)
    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, self.vertical, self.forward)
    }

    /// Forward distance covered per tick at the current difficulty
    pub fn forward_speed(&self, tuning: &PhysicsTuning) -> f32 {
        tuning.forward_speed * tuning.speed_multiplier(self.jump_count)
    }
}

/// What happened to the ball during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Fell past the lose threshold; the ball was left untouched
    Fell,
    /// Pushed off the foothold at the start of a run; not a bounce
    Launched,
    /// Bounced off a platform and now sits on its center
    Landed(Landing),
    /// Still in the air
    Airborne,
}

/// Advance the ball by one logical tick
pub fn step(
    ball: &mut BallState,
    config: &TunnelConfig,
    tuning: &PhysicsTuning,
    window: &SegmentWindow,
    rotation: f32,
) -> StepOutcome {
    let multiplier = tuning.speed_multiplier(ball.jump_count);
    let velocity = ball.velocity + tuning.gravity * multiplier;
    let proposed_vertical = ball.vertical + velocity;
    let proposed_forward = ball.forward + tuning.forward_speed * multiplier;

    if proposed_vertical < config.lose_threshold() {
        return StepOutcome::Fell;
    }

    let probe = Probe {
        forward: ball.forward,
        vertical: ball.vertical,
        proposed_forward,
        proposed_vertical,
        velocity,
    };

    match collision::check(window, config, &probe, rotation) {
        Some(landing) => {
            let launch = ball.on_foothold(config);
            ball.forward = snap_to_platform_center(config, ball.forward);
            ball.vertical = landing.platform_top + config.ball_radius + REST_EPSILON;
            ball.velocity = tuning.bounce_speed;
            if launch {
                return StepOutcome::Launched;
            }
            ball.jump_count += 1;
            StepOutcome::Landed(landing)
        }
        None => {
            ball.forward = proposed_forward;
            ball.vertical = proposed_vertical;
            ball.velocity = velocity;
            StepOutcome::Airborne
        }
    }
}

/// Nearest platform center to `forward`, never behind it
///
/// Constant-speed accumulation drifts; snapping on every bounce keeps each
/// landing exactly on a center. Progress never goes backward: when the ball
/// is already past the nearest center (only at extreme speed multipliers)
/// the landing stays where it is, off-center.
pub fn snap_to_platform_center(config: &TunnelConfig, forward: f32) -> f32 {
    let first = config.first_platform_center();
    let k = ((forward - first) / config.spacing()).round().max(0.0);
    let center = first + k * config.spacing();
    if center < forward {
        log::debug!("Late landing at {:.4}, keeping position past center {:.4}", forward, center);
        forward
    } else {
        center
    }
}
