//! Procedural item layout for one track segment

use glam::Vec3;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{COLLECT_FADE_MS, LANES};
use crate::lane_center;
use crate::tuning::Tuning;

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Gift,
    Snowman,
    /// Cleared by jumping
    Rock,
    /// Cleared by ducking
    Arch,
    /// Grants a random power-up, only reachable mid-jump
    AbilityBox,
}

impl ItemKind {
    pub const HAZARDS: [ItemKind; 3] = [ItemKind::Snowman, ItemKind::Rock, ItemKind::Arch];

    pub fn is_hazard(self) -> bool {
        matches!(self, ItemKind::Snowman | ItemKind::Rock | ItemKind::Arch)
    }
}

/// What to do with a hazard roll once the segment already holds the maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HazardOverflow {
    /// The lane stays empty
    #[default]
    Drop,
    /// Half the time a gift spawns instead
    CoinFlipGift,
}

/// A lane-bound entity owned by a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub lane: i8,
    /// Offset along the travel axis, relative to the segment centre
    pub offset: f32,
    pub kind: ItemKind,
    /// Terminal: collected items never collide again
    pub collected: bool,
    /// Simulation time of collection, drives the fade-out
    pub collected_at_ms: Option<f64>,
}

impl Item {
    pub fn new(lane: i8, offset: f32, kind: ItemKind) -> Self {
        Self {
            lane,
            offset,
            kind,
            collected: false,
            collected_at_ms: None,
        }
    }

    /// Mark collected (first call wins)
    pub fn collect(&mut self, now_ms: f64) {
        if !self.collected {
            self.collected = true;
            self.collected_at_ms = Some(now_ms);
        }
    }

    /// World position given the owning segment's offset
    pub fn world_position(&self, segment_offset: f32) -> Vec3 {
        Vec3::new(lane_center(self.lane), 0.0, segment_offset + self.offset)
    }

    /// Render opacity: 1 while live, fading to 0 after collection
    pub fn opacity(&self, now_ms: f64) -> f32 {
        match self.collected_at_ms {
            None => 1.0,
            Some(at) => (1.0 - ((now_ms - at) / COLLECT_FADE_MS) as f32).clamp(0.0, 1.0),
        }
    }
}

/// Generate the items for one segment of length `span`.
///
/// Lanes are visited in shuffled order so the hazard cap doesn't always spare
/// the same lane. At most `max_hazards_per_segment` hazards are placed, which
/// keeps at least one lane passable without power-ups.
pub fn generate_items<R: Rng + ?Sized>(rng: &mut R, span: f32, tuning: &Tuning) -> Vec<Item> {
    let mut lanes = LANES;
    lanes.shuffle(rng);

    let half = (span / 2.0 - tuning.edge_margin).max(0.0);
    let bands = tuning.spawn;
    let mut hazards = 0;
    let mut items = Vec::with_capacity(lanes.len());

    for lane in lanes {
        let roll: f32 = rng.random();
        let offset = rng.random::<f32>() * 2.0 * half - half;

        let kind = if roll < bands.nothing {
            None
        } else if roll < bands.gift {
            Some(ItemKind::Gift)
        } else if roll < bands.ability_box {
            Some(ItemKind::AbilityBox)
        } else if hazards < tuning.max_hazards_per_segment {
            hazards += 1;
            Some(ItemKind::HAZARDS[rng.random_range(0..ItemKind::HAZARDS.len())])
        } else {
            match tuning.hazard_overflow {
                HazardOverflow::Drop => None,
                HazardOverflow::CoinFlipGift => rng.random_bool(0.5).then_some(ItemKind::Gift),
            }
        };

        if let Some(kind) = kind {
            items.push(Item::new(lane, offset, kind));
        }
    }

    items
}
