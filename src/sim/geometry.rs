//! Tunnel cross-section geometry
//!
//! The tunnel is a regular polygon around the forward axis. Face `i` sits at
//! angle `i / sides * 2π`, measured counter-clockwise from +x, so with eight
//! sides face 6 is the floor (270°).

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::{normalize_angle, polar_to_cartesian};

/// Angle of a face's center, in tunnel-local space
#[inline]
pub fn face_angle(face: u32, sides: u32) -> f32 {
    face as f32 / sides as f32 * TAU
}

/// Width of one face (polygon edge length)
#[inline]
pub fn face_width(radius: f32, sides: u32) -> f32 {
    2.0 * radius * (PI / sides as f32).sin()
}

/// Center of a face, moved `inset` toward the axis
#[inline]
pub fn face_position(radius: f32, face: u32, sides: u32, inset: f32) -> Vec2 {
    polar_to_cartesian(radius - inset, face_angle(face, sides))
}

/// Face whose center is closest to the tunnel bottom (270°)
pub fn bottom_face(sides: u32) -> u32 {
    let bottom = 3.0 * PI / 2.0;
    (0..sides)
        .min_by(|&a, &b| {
            let da = shortest_angle_delta(face_angle(a, sides), bottom).abs();
            let db = shortest_angle_delta(face_angle(b, sides), bottom).abs();
            da.total_cmp(&db)
        })
        .unwrap_or(0)
}

/// Signed delta that takes `from` to `to` the short way around
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Tunnel rotation that puts `face` directly under the axis
///
/// Returns the equivalent angle nearest to `near`, so the tunnel never spins
/// the long way around.
pub fn rotation_to_floor(face: u32, sides: u32, near: f32) -> f32 {
    let wanted = 3.0 * PI / 2.0 - face_angle(face, sides);
    near + shortest_angle_delta(near, wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_angle() {
        assert_eq!(face_angle(0, 8), 0.0);
        assert!((face_angle(2, 8) - PI / 2.0).abs() < 1e-6);
        assert!((face_angle(6, 8) - 3.0 * PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_face_width_square() {
        // Square with apothem-free radius r: edge = r * sqrt(2)
        let w = face_width(1.0, 4);
        assert!((w - 2.0_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_face_position_inset() {
        let p = face_position(4.0, 6, 8, 0.2);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y + 3.8).abs() < 1e-5);
    }

    #[test]
    fn test_bottom_face() {
        assert_eq!(bottom_face(8), 6);
        assert_eq!(bottom_face(4), 3);
        // Hexagon faces at 240° and 300° are equally close
        assert!(matches!(bottom_face(6), 4 | 5));
        // Triangle: 240° is the closest face to the floor
        assert_eq!(bottom_face(3), 2);
    }

    #[test]
    fn test_rotation_to_floor_takes_short_way() {
        // Face 0 (east) needs a -90° turn to reach the floor
        let r = rotation_to_floor(0, 8, 0.0);
        assert!((r + PI / 2.0).abs() < 1e-5);

        // Starting from a full turn, stay near it
        let r = rotation_to_floor(0, 8, TAU);
        assert!((r - (TAU - PI / 2.0)).abs() < 1e-4);

        // Bottom face already on the floor
        let r = rotation_to_floor(6, 8, 0.0);
        assert!(r.abs() < 1e-5);
    }
}
