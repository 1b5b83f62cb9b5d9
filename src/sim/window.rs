//! Sliding window of materialized tunnel segments
//!
//! The window owns every live segment. The collision detector and the
//! presentation layer only ever borrow it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::generator::{Platform, SegmentGenerator};
use crate::config::TunnelConfig;
use crate::consts::EVICTION_HYSTERESIS;

/// One generated segment and the state of its collectibles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub index: u32,
    pub platforms: Vec<Platform>,
    /// Parallel to `platforms`; only meaningful where `has_collectible`
    pub collected: Vec<bool>,
}

impl SegmentRecord {
    pub fn new(index: u32, platforms: Vec<Platform>) -> Self {
        let collected = vec![false; platforms.len()];
        Self {
            index,
            platforms,
            collected,
        }
    }

    /// Platforms still carrying a collectible
    pub fn uncollected(&self) -> impl Iterator<Item = (usize, &Platform)> {
        self.platforms
            .iter()
            .enumerate()
            .filter(|(i, p)| p.has_collectible && !self.collected[*i])
    }
}

/// What an [`SegmentWindow::advance`] call changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowChange {
    pub created: Vec<SegmentRecord>,
    pub evicted: Vec<u32>,
}

impl WindowChange {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.evicted.is_empty()
    }
}

pub struct SegmentWindow {
    config: TunnelConfig,
    generator: SegmentGenerator,
    segments: BTreeMap<u32, SegmentRecord>,
}

impl SegmentWindow {
    pub fn new(config: TunnelConfig, generator: SegmentGenerator) -> Self {
        Self {
            config,
            generator,
            segments: BTreeMap::new(),
        }
    }

    /// Bring the window in line with the ball's forward position
    pub fn advance(&mut self, forward: f32) -> WindowChange {
        let current = self.config.segment_index_at(forward);
        let lowest = current.saturating_sub(self.config.segments_behind);
        let highest = current + self.config.segments_ahead;
        let evict_below = current.saturating_sub(self.config.segments_behind + EVICTION_HYSTERESIS);

        let mut change = WindowChange::default();

        // Everything below the cutoff goes; split_off keeps the upper half
        let kept = self.segments.split_off(&evict_below);
        let dropped = std::mem::replace(&mut self.segments, kept);
        for index in dropped.into_keys() {
            log::debug!("Evicted segment {}", index);
            change.evicted.push(index);
        }

        for index in lowest..=highest {
            if self.segments.contains_key(&index) {
                continue;
            }
            let platforms = self.generator.generate(index, index == 0);
            let record = SegmentRecord::new(index, platforms);
            log::debug!(
                "Spawned segment {} with {} platform(s)",
                index,
                record.platforms.len()
            );
            change.created.push(record.clone());
            self.segments.insert(index, record);
        }

        change
    }

    /// Drop every segment (restart)
    pub fn reset(&mut self) {
        self.segments.clear();
    }

    pub fn segment(&self, index: u32) -> Option<&SegmentRecord> {
        self.segments.get(&index)
    }

    /// Live segments in index order
    pub fn segments(&self) -> impl Iterator<Item = &SegmentRecord> {
        self.segments.values()
    }

    /// Live segments with `first <= index <= last`
    pub fn segments_between(&self, first: u32, last: u32) -> impl Iterator<Item = &SegmentRecord> {
        self.segments.range(first..=last.max(first)).map(|(_, record)| record)
    }

    pub fn indices(&self) -> Vec<u32> {
        self.segments.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Mark a collectible as taken; returns false if it was already gone
    pub fn mark_collected(&mut self, index: u32, platform: usize) -> bool {
        let Some(record) = self.segments.get_mut(&index) else {
            return false;
        };
        let has_collectible = record
            .platforms
            .get(platform)
            .is_some_and(|p| p.has_collectible);
        match record.collected.get_mut(platform) {
            Some(flag) if has_collectible && !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }
}
