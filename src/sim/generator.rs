//! Procedural platform layout
//!
//! Every segment gets one to three platforms on distinct faces. Randomness
//! comes from a [`RandomSource`] so a run can be replayed from its seed, or
//! scripted outright in tests.

use std::collections::VecDeque;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{bottom_face, face_position};
use crate::config::TunnelConfig;
use crate::consts::{COLLECTIBLE_CHANCE, COLLECTIBLE_INSET, PLATFORM_INSET};

/// Source of uniform values in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;

    /// Uniform integer in `0..n`
    fn next_below(&mut self, n: u32) -> u32 {
        ((self.next_unit() * n as f32) as u32).min(n.saturating_sub(1))
    }
}

impl RandomSource for Pcg32 {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed list of values, for tests and recorded layouts
///
/// Running out of values is a bug in the caller and panics.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<f32>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Rolls that make [`SegmentGenerator::generate`] place a single
    /// platform on `face`
    pub fn single_platform_rolls(face: u32, sides: u32, collectible: bool) -> Vec<f32> {
        let mut rolls = vec![0.0];
        // Fisher-Yates from the top: every slot keeps its face, except that
        // the slot holding `face` swaps with slot 0
        for i in (1..sides).rev() {
            let j = if i == face { 0 } else { i };
            rolls.push((j as f32 + 0.5) / (i + 1) as f32);
        }
        rolls.push(if collectible { 0.0 } else { 0.99 });
        rolls
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        match self.values.pop_front() {
            Some(v) => v.clamp(0.0, 0.999_999),
            None => panic!("scripted random source exhausted"),
        }
    }
}

/// A landing surface on one face of one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub segment_index: u32,
    pub face: u32,
    /// Platform center in tunnel-local space (z = forward position)
    pub position: Vec3,
    pub has_collectible: bool,
}

impl Platform {
    /// Where the collectible floats, in tunnel-local space
    pub fn collectible_position(&self, config: &TunnelConfig) -> Vec3 {
        let p = face_position(config.radius, self.face, config.sides, COLLECTIBLE_INSET);
        Vec3::new(p.x, p.y, self.position.z)
    }
}

/// Builds platform layouts for segment indices
pub struct SegmentGenerator {
    config: TunnelConfig,
    rng: Box<dyn RandomSource>,
}

impl SegmentGenerator {
    pub fn new(config: TunnelConfig, rng: Box<dyn RandomSource>) -> Self {
        Self { config, rng }
    }

    /// Deterministic generator for a run seed
    pub fn seeded(config: TunnelConfig, seed: u64) -> Self {
        Self::new(config, Box::new(Pcg32::seed_from_u64(seed)))
    }

    /// Platforms for one segment, ordered by face choice
    pub fn generate(&mut self, segment_index: u32, is_first: bool) -> Vec<Platform> {
        if is_first {
            // Starting foothold: always on the floor, never a collectible
            return vec![self.platform(segment_index, bottom_face(self.config.sides), false)];
        }

        let count = 1 + self.rng.next_below(3);
        let faces = self.shuffled_faces();
        let collectible = self.rng.next_unit() < COLLECTIBLE_CHANCE;

        faces
            .into_iter()
            .take(count as usize)
            .enumerate()
            .map(|(i, face)| self.platform(segment_index, face, i == 0 && collectible))
            .collect()
    }

    /// Fisher-Yates shuffle of every face index
    fn shuffled_faces(&mut self) -> Vec<u32> {
        let mut faces: Vec<u32> = (0..self.config.sides).collect();
        for i in (1..faces.len()).rev() {
            let j = self.rng.next_below(i as u32 + 1) as usize;
            faces.swap(i, j);
        }
        faces
    }

    fn platform(&self, segment_index: u32, face: u32, has_collectible: bool) -> Platform {
        let p = face_position(self.config.radius, face, self.config.sides, PLATFORM_INSET);
        Platform {
            segment_index,
            face,
            position: Vec3::new(p.x, p.y, self.config.platform_center(segment_index)),
            has_collectible,
        }
    }
}
