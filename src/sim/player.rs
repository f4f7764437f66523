//! Player motion: lane easing, jump arc and duck timer

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LANE, MIN_LANE};
use crate::tuning::Tuning;
use crate::{lane_center, lerp};

/// Discrete input actions (one per key press)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Duck,
    ToggleDebug,
}

/// Continuous player motion state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Target lane (-1, 0, 1)
    pub lane: i8,
    /// Eased lateral position; collisions use this, not `lane`
    pub x: f32,
    /// Height above the track
    pub y: f32,
    pub vy: f32,
    pub jumping: bool,
    pub ducking: bool,
    /// Simulation time at which the current duck ends
    pub duck_until_ms: Option<f64>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            lane: 0,
            x: 0.0,
            y: 0.0,
            vy: 0.0,
            jumping: false,
            ducking: false,
            duck_until_ms: None,
        }
    }
}

impl PlayerState {
    /// Back to the centre lane on the ground; drops any pending duck deadline
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply a movement action. Out-of-range moves clamp and illegal ones
    /// (jumping mid-air) are ignored. Returns whether anything changed.
    pub fn apply(&mut self, action: Action, now_ms: f64, tuning: &Tuning) -> bool {
        match action {
            Action::MoveLeft => self.shift_lane(-1),
            Action::MoveRight => self.shift_lane(1),
            Action::Jump => {
                if self.jumping {
                    return false;
                }
                self.jumping = true;
                self.vy = tuning.jump_force;
                true
            }
            Action::Duck => {
                if self.jumping {
                    return false;
                }
                // A press while already ducking restarts the timer
                self.ducking = true;
                self.duck_until_ms = Some(now_ms + tuning.duck_duration_ms);
                true
            }
            Action::ToggleDebug => false,
        }
    }

    fn shift_lane(&mut self, delta: i8) -> bool {
        let lane = (self.lane + delta).clamp(MIN_LANE, MAX_LANE);
        let changed = lane != self.lane;
        self.lane = lane;
        changed
    }

    /// Integrate one frame of motion
    pub fn update(&mut self, dt: f32, now_ms: f64, tuning: &Tuning) {
        let t = (dt * tuning.lane_smoothing).min(1.0);
        self.x = lerp(self.x, lane_center(self.lane), t);

        if self.jumping {
            self.vy -= tuning.gravity * dt;
            self.y += self.vy * dt;
            // Land only on the way down; a zero-length frame leaves y at 0
            if self.vy <= 0.0 && self.y <= 0.0 {
                self.y = 0.0;
                self.vy = 0.0;
                self.jumping = false;
            }
        }

        if let Some(until) = self.duck_until_ms {
            if now_ms >= until {
                self.ducking = false;
                self.duck_until_ms = None;
            }
        }
    }

    /// Time left on the current duck
    pub fn duck_remaining_ms(&self, now_ms: f64) -> f64 {
        self.duck_until_ms.map(|until| (until - now_ms).max(0.0)).unwrap_or(0.0)
    }

    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_clamps() {
        let tuning = Tuning::default();
        let mut p = PlayerState::default();
        assert!(p.apply(Action::MoveLeft, 0.0, &tuning));
        assert!(!p.apply(Action::MoveLeft, 0.0, &tuning));
        assert_eq!(p.lane, -1);
        p.apply(Action::MoveRight, 0.0, &tuning);
        p.apply(Action::MoveRight, 0.0, &tuning);
        p.apply(Action::MoveRight, 0.0, &tuning);
        assert_eq!(p.lane, 1);
    }

    #[test]
    fn test_x_eases_toward_lane() {
        let tuning = Tuning::default();
        let mut p = PlayerState::default();
        p.apply(Action::MoveRight, 0.0, &tuning);
        p.update(0.016, 16.0, &tuning);
        assert!(p.x > 0.0 && p.x < 3.5);
        let first = p.x;
        p.update(0.016, 32.0, &tuning);
        assert!(p.x > first);
        for i in 0..120 {
            p.update(0.016, 48.0 + i as f64 * 16.0, &tuning);
        }
        assert!((p.x - 3.5).abs() < 0.01);
    }

    #[test]
    fn test_large_dt_does_not_overshoot() {
        let tuning = Tuning::default();
        let mut p = PlayerState::default();
        p.apply(Action::MoveLeft, 0.0, &tuning);
        p.update(1.0, 1000.0, &tuning);
        assert_eq!(p.x, -3.5);
    }

    #[test]
    fn test_jump_arc_lands() {
        let tuning = Tuning::default();
        let mut p = PlayerState::default();
        assert!(p.apply(Action::Jump, 0.0, &tuning));
        assert!(!p.apply(Action::Jump, 0.0, &tuning));

        let mut peak: f32 = 0.0;
        let mut frames = 0;
        while p.jumping && frames < 1000 {
            p.update(0.016, frames as f64 * 16.0, &tuning);
            peak = peak.max(p.y);
            frames += 1;
        }
        assert!(!p.jumping);
        assert_eq!(p.y, 0.0);
        // v²/2g = 144/60 = 2.4
        assert!(peak > 2.0 && peak < 2.6, "peak {peak}");
        // Airtime ~ 2v/g = 0.8s
        assert!((45..56).contains(&frames), "frames {frames}");
    }

    #[test]
    fn test_jump_survives_zero_length_frame() {
        let tuning = Tuning::default();
        let mut p = PlayerState::default();
        p.apply(Action::Jump, 0.0, &tuning);
        p.update(0.0, 0.0, &tuning);
        assert!(p.jumping);
        assert_eq!(p.vy, tuning.jump_force);
        p.update(0.016, 16.0, &tuning);
        assert!(p.jumping && p.y > 0.0);
    }

    #[test]
    fn test_world_position_tracks_motion() {
        let tuning = Tuning::default();
        let mut p = PlayerState::default();
        p.apply(Action::MoveRight, 0.0, &tuning);
        p.apply(Action::Jump, 0.0, &tuning);
        p.update(1.0, 1000.0, &tuning);
        let pos = p.world_position();
        assert_eq!(pos.x, 3.5);
        assert_eq!(pos.z, 0.0);
        assert_eq!(pos.y, p.y);
    }

    #[test]
    fn test_duck_rules() {
        let tuning = Tuning::default();
        let mut p = PlayerState::default();
        assert!(p.apply(Action::Duck, 0.0, &tuning));
        assert_eq!(p.duck_until_ms, Some(800.0));

        // Pressing again restarts the timer
        p.apply(Action::Duck, 500.0, &tuning);
        p.update(0.016, 900.0, &tuning);
        assert!(p.ducking);
        p.update(0.016, 1300.0, &tuning);
        assert!(!p.ducking);
        assert_eq!(p.duck_until_ms, None);

        // No ducking mid-air
        p.apply(Action::Jump, 1300.0, &tuning);
        assert!(!p.apply(Action::Duck, 1300.0, &tuning));
        assert!(!p.ducking);
    }

    #[test]
    fn test_jump_while_ducking_resolves_both() {
        let tuning = Tuning::default();
        let mut p = PlayerState::default();
        p.apply(Action::Duck, 0.0, &tuning);
        assert!(p.apply(Action::Jump, 0.0, &tuning));
        assert!(p.ducking && p.jumping);
        p.update(0.016, 850.0, &tuning);
        assert!(!p.ducking);
        assert!(p.jumping);
    }
}
