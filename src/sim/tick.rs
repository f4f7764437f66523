//! Per-frame simulation tick
//!
//! Core game loop step, driven by the host's animation callback with a
//! variable `dt`. Within one tick the order is fixed: input, player motion,
//! deadlines, track scroll/recycle, collisions.

use super::autopilot;
use super::collision::{CollisionResult, resolve_collisions};
use super::player::Action;
use super::state::{GamePhase, GameState};
use super::track::Track;

/// Longest frame the sim will integrate in one go (seconds)
pub const MAX_FRAME_DT: f32 = 0.1;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Key presses since the last tick, in order
    pub actions: Vec<Action>,
    /// Idle/demo mode - the autopilot plays
    pub autopilot: bool,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, track: &mut Track, input: &TickInput, dt: f32) -> CollisionResult {
    for &action in &input.actions {
        state.apply_action(action);
    }

    if state.phase() != GamePhase::Playing {
        return CollisionResult::default();
    }

    // A stalled tab can hand us a huge frame; don't tunnel through the track
    let dt = dt.clamp(0.0, MAX_FRAME_DT);

    if input.autopilot {
        for action in autopilot::plan(state, track) {
            state.apply_action(action);
        }
    }

    state.advance_clock(dt);
    state.update_player(dt);
    state.expire_power_ups();
    state.update_time(dt);

    track.advance(state.speed() * dt);
    resolve_collisions(state, track)
}
