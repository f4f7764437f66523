//! Collision detection and response between the player and track items
//!
//! Everything is an axis-aligned box on the track plane: the player's eased
//! lateral position against a lane centre, and the distance along the
//! travel axis against the player's origin. Vertical state never changes
//! the boxes; it only decides whether a hazard is countered.

use super::generator::ItemKind;
use super::player::PlayerState;
use super::state::{GamePhase, GameState};
use super::track::Track;
use crate::consts::*;
use crate::lane_center;

/// Collision footprint on the track plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    /// Lateral extent
    pub width: f32,
    /// Extent along the travel axis
    pub depth: f32,
}

impl Hitbox {
    pub const PLAYER: Hitbox = Hitbox::from_dims(PLAYER_HITBOX);

    const fn from_dims((width, depth): (f32, f32)) -> Self {
        Self { width, depth }
    }

    pub fn for_kind(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Gift => Self::from_dims(GIFT_HITBOX),
            ItemKind::Snowman | ItemKind::Rock => Self::from_dims(OBSTACLE_HITBOX),
            ItemKind::Arch => Self::from_dims(ARCH_HITBOX),
            ItemKind::AbilityBox => Self::from_dims(ABILITY_BOX_HITBOX),
        }
    }

    /// Whether a distance along the travel axis puts the boxes in contact
    #[inline]
    pub fn overlaps_depth(&self, dz: f32) -> bool {
        dz.abs() < (self.depth + Self::PLAYER.depth) / 2.0
    }

    /// Whether a lateral distance puts the boxes in contact
    #[inline]
    pub fn overlaps_width(&self, dx: f32) -> bool {
        dx.abs() < (self.width + Self::PLAYER.width) / 2.0
    }
}

/// Whether the player's current evasive move clears a hazard
pub fn hazard_countered(kind: ItemKind, player: &PlayerState) -> bool {
    match kind {
        ItemKind::Rock => player.jumping,
        ItemKind::Arch => player.ducking,
        _ => false,
    }
}

/// What one collision pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResult {
    pub gifts: u32,
    pub power_ups: u32,
    /// Hazards soaked up by the shield
    pub absorbed: u32,
    /// The hazard that ended the run
    pub crashed: Option<ItemKind>,
}

/// Check every live item near the player and apply its effect.
///
/// Items are visited in ring order, then generation order; the first
/// uncountered hazard without a shield ends the run and stops the pass.
/// Player motion is read, never written.
pub fn resolve_collisions(state: &mut GameState, track: &mut Track) -> CollisionResult {
    let mut result = CollisionResult::default();
    if state.phase() != GamePhase::Playing {
        return result;
    }

    let player = state.player().clone();
    let now = state.clock_ms();
    let magnet = state.power_ups().magnet_active;
    let magnet_radius = state.tuning().magnet_radius;
    let window = track.tuning().segment_length;

    for segment in track.segments_mut() {
        // Broad phase
        if segment.offset.abs() > window {
            continue;
        }

        for item in segment.items.iter_mut() {
            if item.collected {
                continue;
            }

            let hitbox = Hitbox::for_kind(item.kind);
            let dz = segment.offset + item.offset;
            if !hitbox.overlaps_depth(dz) {
                continue;
            }
            let dx = lane_center(item.lane) - player.x;

            if item.kind == ItemKind::Gift && magnet && dx.hypot(dz) <= magnet_radius {
                item.collect(now);
                state.increase_score(1);
                result.gifts += 1;
                continue;
            }

            if !hitbox.overlaps_width(dx) {
                continue;
            }

            match item.kind {
                ItemKind::Gift => {
                    item.collect(now);
                    state.increase_score(1);
                    result.gifts += 1;
                }
                ItemKind::AbilityBox => {
                    if player.jumping {
                        item.collect(now);
                        state.activate_random_power_up();
                        result.power_ups += 1;
                    }
                }
                kind => {
                    if hazard_countered(kind, &player) {
                        continue;
                    }
                    if state.consume_shield() {
                        log::debug!("Shield absorbed {:?}", kind);
                        item.collect(now);
                        result.absorbed += 1;
                    } else {
                        state.end_game();
                        result.crashed = Some(kind);
                        return result;
                    }
                }
            }
        }
    }

    result
}
