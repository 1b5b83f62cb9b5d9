//! Platform landing and collectible pickup detection
//!
//! The ball never leaves the vertical plane through the tunnel axis (x = 0 in
//! world space). Platforms live in tunnel-local space, so every check first
//! moves the platform (or the ball) through the current tunnel rotation.

use glam::{Vec2, Vec3};

use super::geometry::{face_angle, face_width};
use super::window::SegmentWindow;
use crate::config::TunnelConfig;
use crate::consts::{LANDING_TOLERANCE, PLATFORM_INSET};
use crate::rotate;

/// Faces tilted further than this from the floor can't be landed on
const MIN_FLOOR_SINE: f32 = 0.1;

/// Ball motion for one tick, as seen by the detector
#[derive(Debug, Clone, Copy)]
pub struct Probe {
    /// Forward position before the move
    pub forward: f32,
    /// Vertical offset before the move
    pub vertical: f32,
    pub proposed_forward: f32,
    pub proposed_vertical: f32,
    /// Vertical velocity used for the move
    pub velocity: f32,
}

/// The platform the ball lands on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// World-space height of the platform surface under the ball
    pub platform_top: f32,
    pub segment_index: u32,
    pub face: u32,
}

/// A collectible the ball touched this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub segment_index: u32,
    /// Index into the segment's platform list
    pub platform: usize,
    pub face: u32,
    /// World-space position of the collectible
    pub position: Vec3,
}

/// Height of a platform's surface where it crosses x = 0 in world space
///
/// `None` if the platform faces sideways/up after rotation or doesn't reach
/// under the ball.
pub fn surface_under_ball(config: &TunnelConfig, face: u32, rotation: f32) -> Option<f32> {
    let angle = face_angle(face, config.sides) + rotation;
    let (sin, cos) = angle.sin_cos();
    if sin > -MIN_FLOOR_SINE {
        return None;
    }

    // Surface line: p · (cos, sin) = d. At x = 0 that gives y = d / sin.
    let d = config.platform_surface_distance();
    let y = d / sin;
    let half_width = face_width(config.radius - PLATFORM_INSET, config.sides) / 2.0;
    // Offset of (0, y) from the surface center, along the surface
    if (y * cos).abs() > half_width {
        return None;
    }
    Some(y)
}

/// Find the platform the ball lands on this tick, if any
///
/// A landing needs the ball to be falling, to reach the surface this tick,
/// and to have started the tick at or above it. Among candidates the highest
/// surface wins; ties go to the lowest segment, then the lowest face.
pub fn check(
    window: &SegmentWindow,
    config: &TunnelConfig,
    probe: &Probe,
    rotation: f32,
) -> Option<Landing> {
    if probe.velocity >= 0.0 {
        return None;
    }

    let step = (probe.proposed_forward - probe.forward).abs();
    let bottom_before = probe.vertical - config.ball_radius;
    let bottom_after = probe.proposed_vertical - config.ball_radius;

    let first = config.segment_index_at(probe.proposed_forward - step);
    let last = config.segment_index_at(probe.proposed_forward + step);

    let mut best: Option<Landing> = None;
    for record in window.segments_between(first, last) {
        let start = record.index as f32 * config.spacing();
        let end = start + config.segment_length;
        if probe.proposed_forward < start - step || probe.proposed_forward > end + step {
            continue;
        }

        for platform in &record.platforms {
            let Some(top) = surface_under_ball(config, platform.face, rotation) else {
                continue;
            };
            if bottom_after > top + LANDING_TOLERANCE || bottom_before < top - LANDING_TOLERANCE {
                continue;
            }

            let candidate = Landing {
                platform_top: top,
                segment_index: record.index,
                face: platform.face,
            };
            best = match best {
                None => Some(candidate),
                Some(current) if is_better(&candidate, &current) => Some(candidate),
                keep => keep,
            };
        }
    }
    best
}

fn is_better(candidate: &Landing, current: &Landing) -> bool {
    if candidate.platform_top != current.platform_top {
        return candidate.platform_top > current.platform_top;
    }
    (candidate.segment_index, candidate.face) < (current.segment_index, current.face)
}

/// Ball position in tunnel-local space
#[inline]
pub fn to_tunnel_space(world: Vec3, rotation: f32) -> Vec3 {
    let local = rotate(Vec2::new(world.x, world.y), -rotation);
    Vec3::new(local.x, local.y, world.z)
}

/// Tunnel-local point in world space
#[inline]
pub fn to_world_space(local: Vec3, rotation: f32) -> Vec3 {
    let world = rotate(Vec2::new(local.x, local.y), rotation);
    Vec3::new(world.x, world.y, local.z)
}

/// Uncollected collectibles within `radius` of any of the ball positions
///
/// Positions are world-space ball centers. Each collectible is reported once
/// even if several positions reach it.
pub fn collectibles_in_reach(
    window: &SegmentWindow,
    config: &TunnelConfig,
    positions: &[Vec3],
    rotation: f32,
    radius: f32,
) -> Vec<Pickup> {
    let mut pickups: Vec<Pickup> = Vec::new();
    let Some(first) = positions.iter().map(|p| config.segment_index_at(p.z)).min() else {
        return pickups;
    };
    let last = positions
        .iter()
        .map(|p| config.segment_index_at(p.z))
        .max()
        .unwrap_or(first);

    let local: Vec<Vec3> = positions
        .iter()
        .map(|&p| to_tunnel_space(p, rotation))
        .collect();

    for record in window.segments_between(first, last) {
        for (i, platform) in record.uncollected() {
            let target = platform.collectible_position(config);
            if local.iter().any(|p| p.distance(target) < radius) {
                pickups.push(Pickup {
                    segment_index: record.index,
                    platform: i,
                    face: platform.face,
                    position: to_world_space(target, rotation),
                });
            }
        }
    }
    pickups
}
