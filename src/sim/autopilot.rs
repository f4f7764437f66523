//! Demo/attract mode - the sim plays itself
//!
//! Steers away from snowmen (nothing counters them), chases gifts when the
//! lane is clear, and times jumps and ducks for the hazards that allow it.

use super::generator::ItemKind;
use super::player::Action;
use super::state::GameState;
use super::track::Track;
use crate::consts::{LANES, MAX_LANE, MIN_LANE};

/// How far ahead the autopilot looks (world units)
const LOOKAHEAD: f32 = 30.0;
/// A lane whose next snowman is farther than this counts as safe
const SAFE_DISTANCE: f32 = 12.0;
/// React to jumpable/duckable items this many seconds before contact
const JUMP_LEAD_SECS: f32 = 0.3;
const DUCK_LEAD_SECS: f32 = 0.2;

/// Upcoming item as seen from the player: distance ahead and kind
#[derive(Debug, Clone, Copy)]
struct Upcoming {
    lane: i8,
    distance: f32,
    kind: ItemKind,
}

fn upcoming(track: &Track) -> Vec<Upcoming> {
    let mut items: Vec<Upcoming> = track
        .segments()
        .iter()
        .flat_map(|seg| {
            seg.items
                .iter()
                .filter(|item| !item.collected)
                .map(move |item| Upcoming {
                    lane: item.lane,
                    // Items approach from negative offsets
                    distance: -(seg.offset + item.offset),
                    kind: item.kind,
                })
        })
        .filter(|u| u.distance > -1.0 && u.distance < LOOKAHEAD)
        .collect();
    items.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    items
}

/// Distance to the first snowman in a lane (infinite if none)
fn snowman_distance(items: &[Upcoming], lane: i8) -> f32 {
    items
        .iter()
        .find(|u| u.lane == lane && u.kind == ItemKind::Snowman)
        .map(|u| u.distance)
        .unwrap_or(f32::INFINITY)
}

fn has_gift(items: &[Upcoming], lane: i8) -> bool {
    items
        .iter()
        .any(|u| u.lane == lane && u.kind == ItemKind::Gift && u.distance < snowman_distance(items, lane))
}

/// Pick the lane to head for
fn choose_lane(items: &[Upcoming], current: i8) -> i8 {
    let current_clear = snowman_distance(items, current);
    if current_clear > SAFE_DISTANCE && has_gift(items, current) {
        return current;
    }

    let mut best = current;
    let mut best_score = f32::NEG_INFINITY;
    for lane in LANES {
        let clear = snowman_distance(items, lane).min(LOOKAHEAD * 2.0);
        let mut score = clear;
        if has_gift(items, lane) {
            score += 5.0;
        }
        // Every lane crossed costs time in the other lanes
        score -= (lane - current).abs() as f32 * 2.0;
        if score > best_score {
            best_score = score;
            best = lane;
        }
    }
    best
}

/// Actions for this frame
pub fn plan(state: &GameState, track: &Track) -> Vec<Action> {
    let items = upcoming(track);
    let player = state.player();
    let speed = state.speed().max(1.0);
    let mut actions = Vec::new();

    let target = choose_lane(&items, player.lane);
    if target < player.lane && player.lane > MIN_LANE {
        actions.push(Action::MoveLeft);
    } else if target > player.lane && player.lane < MAX_LANE {
        actions.push(Action::MoveRight);
    }

    let lane = target;
    let next = items.iter().find(|u| u.lane == lane && u.distance > 0.0);
    if let Some(next) = next {
        let secs = next.distance / speed;
        match next.kind {
            ItemKind::Rock | ItemKind::AbilityBox if secs < JUMP_LEAD_SECS && !player.jumping => {
                actions.push(Action::Jump);
            }
            ItemKind::Arch if secs < DUCK_LEAD_SECS && !player.jumping && !player.ducking => {
                actions.push(Action::Duck);
            }
            _ => {}
        }
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::generator::Item;
    use crate::tuning::Tuning;

    fn setup() -> (GameState, Track) {
        let tuning = Tuning::default();
        let mut state = GameState::new(2, 0, tuning.clone());
        state.start_game();
        let mut track = Track::new(2, tuning);
        for seg in track.segments_mut() {
            seg.items.clear();
        }
        (state, track)
    }

    #[test]
    fn test_steers_off_a_snowman_lane() {
        let (state, mut track) = setup();
        track.segments_mut()[0].items = vec![Item::new(0, -6.0, ItemKind::Snowman)];
        let actions = plan(&state, &track);
        assert!(actions.contains(&Action::MoveLeft) || actions.contains(&Action::MoveRight));
    }

    #[test]
    fn test_stays_put_when_clear() {
        let (state, track) = setup();
        assert!(plan(&state, &track).is_empty());
    }

    #[test]
    fn test_jumps_rock_just_ahead() {
        let (state, mut track) = setup();
        track.segments_mut()[0].items = vec![Item::new(0, -2.0, ItemKind::Rock)];
        assert_eq!(plan(&state, &track), vec![Action::Jump]);
    }

    #[test]
    fn test_ducks_arch_just_ahead() {
        let (state, mut track) = setup();
        track.segments_mut()[0].items = vec![Item::new(0, -1.5, ItemKind::Arch)];
        assert_eq!(plan(&state, &track), vec![Action::Duck]);
    }
}
