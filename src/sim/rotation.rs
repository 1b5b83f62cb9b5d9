//! Tunnel rotation
//!
//! Runs on wall-clock frame time, unlike the ball, which advances one fixed
//! logical step per tick. Held keys push the target; the angle chases it
//! with an exponential approach, so it never overshoots.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TunnelRotation {
    /// Current angle (radians, unwrapped)
    pub angle: f32,
    /// Angle the tunnel is easing toward
    pub target: f32,
}

impl TunnelRotation {
    /// Apply held rotate keys for one frame
    ///
    /// Right turns increase the angle. Holding both keys cancels out.
    pub fn hold(&mut self, left: bool, right: bool, speed: f32, dt: f32) {
        let direction = match (left, right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        self.target += direction * speed * dt;
    }

    /// Jump the target (autopilot)
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Move the angle toward the target for one frame
    pub fn ease(&mut self, rate: f32, dt: f32) {
        let blend = 1.0 - (-rate * dt.max(0.0)).exp();
        self.angle += (self.target - self.angle) * blend;
    }

    /// Remaining distance to the target
    pub fn error(&self) -> f32 {
        self.target - self.angle
    }
}
