//! Game state store
//!
//! Single source of truth for a session. Mutation goes through the
//! operations below; each returns a [`Snapshot`] of the updated state.
//! Side effects the host must perform (audio cues, persisting the high
//! score) are queued as [`GameEvent`]s rather than performed here.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::player::{Action, PlayerState};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu, waiting for a run to start
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// Power-up types granted by ability boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Absorbs one hazard hit
    Shield,
    /// Pulls in nearby gifts for a limited time
    Magnet,
}

/// Active power-up effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUps {
    pub shield: bool,
    pub magnet_active: bool,
    /// Simulation time the magnet runs out (0 when inactive)
    pub magnet_expiry_ms: f64,
}

/// Side effects for the host, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { run_id: u64 },
    RunReset { run_id: u64 },
    ScoreChanged { score: u64, speed: f32 },
    /// The best score improved and should be persisted
    HighScoreChanged(u64),
    PowerUpGained(PowerUpKind),
    ShieldConsumed,
    MagnetExpired,
    GameOver { score: u64, new_best: bool },
}

/// Read-only view of the store handed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub speed: f32,
    pub lane: i8,
    pub player_x: f32,
    pub player_y: f32,
    pub jumping: bool,
    pub ducking: bool,
    pub duck_remaining_ms: f64,
    pub shield: bool,
    pub magnet_active: bool,
    pub magnet_expiry_ms: f64,
    pub time_of_day: f32,
    pub run_id: u64,
    pub clock_ms: f64,
    pub debug: bool,
}

/// The game state store
#[derive(Debug, Clone)]
pub struct GameState {
    seed: u64,
    rng: Pcg32,
    tuning: Tuning,
    phase: GamePhase,
    score: u64,
    high_score: u64,
    speed: f32,
    player: PlayerState,
    power_ups: PowerUps,
    /// Game hours in [0, 24)
    time_of_day: f32,
    run_id: u64,
    /// Simulation clock, advanced only while playing
    clock_ms: f64,
    debug: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle store. `high_score` comes from the persistence layer.
    pub fn new(seed: u64, high_score: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let time_of_day = rng.random_range(0.0..24.0);
        Self {
            seed,
            rng,
            speed: tuning.base_speed,
            tuning,
            phase: GamePhase::Idle,
            score: 0,
            high_score,
            player: PlayerState::default(),
            power_ups: PowerUps::default(),
            time_of_day,
            run_id: 0,
            clock_ms: 0.0,
            debug: false,
            events: Vec::new(),
        }
    }

    /// Begin a run
    pub fn start_game(&mut self) -> Snapshot {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.speed = self.tuning.base_speed;
        self.player.reset();
        self.power_ups = PowerUps::default();
        self.time_of_day = self.rng.random_range(0.0..24.0);
        self.events.push(GameEvent::RunStarted { run_id: self.run_id });
        log::info!("Run {} started", self.run_id);
        self.snapshot()
    }

    /// Add points; each call also speeds the run up by one increment
    pub fn increase_score(&mut self, amount: u64) -> Snapshot {
        self.score += amount;
        // Fixed step per call, however many points it awards
        self.speed += self.tuning.speed_increment;
        self.events.push(GameEvent::ScoreChanged {
            score: self.score,
            speed: self.speed,
        });

        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::HighScoreChanged(self.high_score));
        }
        self.snapshot()
    }

    /// End the run. Calling it again once over changes nothing.
    pub fn end_game(&mut self) -> Snapshot {
        if self.phase == GamePhase::GameOver {
            return self.snapshot();
        }

        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::HighScoreChanged(self.high_score));
        }
        let new_best = self.score > 0 && self.score >= self.high_score;

        self.phase = GamePhase::GameOver;
        self.speed = 0.0;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            new_best,
        });
        log::info!(
            "Run {} over: score {} (best {})",
            self.run_id,
            self.score,
            self.high_score
        );
        self.snapshot()
    }

    /// Back to the menu. Bumps the run id and clears everything tied to the
    /// previous run, including pending duck and magnet deadlines.
    pub fn reset_game(&mut self) -> Snapshot {
        self.phase = GamePhase::Idle;
        self.score = 0;
        self.speed = self.tuning.base_speed;
        self.run_id += 1;
        self.player.reset();
        self.power_ups = PowerUps::default();
        self.time_of_day = self.rng.random_range(0.0..24.0);
        self.events.push(GameEvent::RunReset { run_id: self.run_id });
        self.snapshot()
    }

    /// Grant a shield or a magnet with equal odds
    pub fn activate_random_power_up(&mut self) -> Snapshot {
        let kind = if self.rng.random_bool(0.5) {
            PowerUpKind::Shield
        } else {
            PowerUpKind::Magnet
        };
        self.activate_power_up(kind)
    }

    /// Grant a specific power-up. A magnet picked up while one is running
    /// resets the window from now instead of stacking durations.
    pub fn activate_power_up(&mut self, kind: PowerUpKind) -> Snapshot {
        match kind {
            PowerUpKind::Shield => self.power_ups.shield = true,
            PowerUpKind::Magnet => {
                self.power_ups.magnet_active = true;
                self.power_ups.magnet_expiry_ms = self.clock_ms + self.tuning.magnet_duration_ms;
            }
        }
        log::debug!("Power-up: {:?}", kind);
        self.events.push(GameEvent::PowerUpGained(kind));
        self.snapshot()
    }

    /// Use up the shield. Returns false if there was none.
    pub fn consume_shield(&mut self) -> bool {
        if !self.power_ups.shield {
            return false;
        }
        self.power_ups.shield = false;
        self.events.push(GameEvent::ShieldConsumed);
        true
    }

    /// Advance the day/night cycle
    pub fn update_time(&mut self, dt: f32) -> Snapshot {
        self.time_of_day = (self.time_of_day + dt * self.tuning.time_of_day_rate).rem_euclid(24.0);
        self.snapshot()
    }

    pub fn toggle_debug(&mut self) -> Snapshot {
        self.debug = !self.debug;
        self.snapshot()
    }

    /// Route a key action. Movement only applies during a run.
    pub fn apply_action(&mut self, action: Action) -> Snapshot {
        match action {
            Action::ToggleDebug => return self.toggle_debug(),
            _ if self.phase != GamePhase::Playing => {}
            _ => {
                self.player.apply(action, self.clock_ms, &self.tuning);
            }
        }
        self.snapshot()
    }

    /// Advance the simulation clock
    pub(crate) fn advance_clock(&mut self, dt: f32) {
        self.clock_ms += dt as f64 * 1000.0;
    }

    /// Integrate player motion for this frame
    pub(crate) fn update_player(&mut self, dt: f32) {
        self.player.update(dt, self.clock_ms, &self.tuning);
    }

    /// Turn the magnet off once its deadline (less the grace window) passes
    pub(crate) fn expire_power_ups(&mut self) {
        let magnet = &mut self.power_ups;
        if magnet.magnet_active && self.clock_ms >= magnet.magnet_expiry_ms - self.tuning.magnet_grace_ms {
            magnet.magnet_active = false;
            magnet.magnet_expiry_ms = 0.0;
            self.events.push(GameEvent::MagnetExpired);
        }
    }

    /// Take the queued side effects
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            high_score: self.high_score,
            speed: self.speed,
            lane: self.player.lane,
            player_x: self.player.x,
            player_y: self.player.y,
            jumping: self.player.jumping,
            ducking: self.player.ducking,
            duck_remaining_ms: self.player.duck_remaining_ms(self.clock_ms),
            shield: self.power_ups.shield,
            magnet_active: self.power_ups.magnet_active,
            magnet_expiry_ms: self.power_ups.magnet_expiry_ms,
            time_of_day: self.time_of_day,
            run_id: self.run_id,
            clock_ms: self.clock_ms,
            debug: self.debug,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn power_ups(&self) -> PowerUps {
        self.power_ups
    }

    pub fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    #[cfg(test)]
    pub(crate) fn set_clock_ms(&mut self, clock_ms: f64) {
        self.clock_ms = clock_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> GameState {
        let mut state = GameState::new(42, 0, Tuning::default());
        state.start_game();
        state.drain_events();
        state
    }

    #[test]
    fn test_start_game_resets_run() {
        let mut state = GameState::new(1, 7, Tuning::default());
        assert_eq!(state.phase(), GamePhase::Idle);
        state.activate_power_up(PowerUpKind::Shield);
        let snap = state.start_game();
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.speed, 10.0);
        assert_eq!(snap.lane, 0);
        assert!(!snap.shield);
        assert_eq!(snap.high_score, 7);
        assert!((0.0..24.0).contains(&snap.time_of_day));
    }

    #[test]
    fn test_score_and_speed_climb_together() {
        let mut state = playing();
        let mut last = state.snapshot();
        for _ in 0..20 {
            let snap = state.increase_score(1);
            assert_eq!(snap.score, last.score + 1);
            assert!((snap.speed - (last.speed + 0.5)).abs() < 1e-5);
            last = snap;
        }
        assert_eq!(last.high_score, 20);
    }

    #[test]
    fn test_bonus_points_speed_up_once() {
        let mut state = playing();
        let snap = state.increase_score(2);
        assert_eq!(snap.score, 2);
        assert_eq!(snap.speed, 10.5);
    }

    #[test]
    fn test_high_score_only_when_beaten() {
        let mut state = GameState::new(3, 2, Tuning::default());
        state.start_game();
        state.increase_score(1);
        state.increase_score(1);
        assert!(!state.drain_events().iter().any(|e| matches!(e, GameEvent::HighScoreChanged(_))));
        state.increase_score(1);
        assert!(state.drain_events().contains(&GameEvent::HighScoreChanged(3)));
    }

    #[test]
    fn test_end_game_is_idempotent() {
        let mut state = playing();
        state.increase_score(2);
        state.drain_events();

        let first = state.end_game();
        let events = state.drain_events();
        let second = state.end_game();

        assert_eq!(first, second);
        assert_eq!(first.phase, GamePhase::GameOver);
        assert_eq!(first.speed, 0.0);
        assert_eq!(
            events,
            vec![GameEvent::GameOver {
                score: 2,
                new_best: true
            }]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_reset_bumps_run_id() {
        let mut state = playing();
        state.activate_power_up(PowerUpKind::Magnet);
        state.player_mut().ducking = true;
        state.player_mut().duck_until_ms = Some(500.0);
        state.end_game();

        let snap = state.reset_game();
        assert_eq!(snap.phase, GamePhase::Idle);
        assert_eq!(snap.run_id, 1);
        assert!(!snap.magnet_active);
        assert!(!snap.ducking);
        assert_eq!(state.player().duck_until_ms, None);
    }

    #[test]
    fn test_magnet_extends_from_latest_pickup() {
        let mut state = playing();
        state.set_clock_ms(1_000.0);
        let snap = state.activate_power_up(PowerUpKind::Magnet);
        assert_eq!(snap.magnet_expiry_ms, 11_000.0);

        state.set_clock_ms(10_000.0);
        let snap = state.activate_power_up(PowerUpKind::Magnet);
        assert_eq!(snap.magnet_expiry_ms, 20_000.0);

        // Still on where the first window would have closed
        state.set_clock_ms(11_000.0);
        state.expire_power_ups();
        assert!(state.power_ups().magnet_active);
    }

    #[test]
    fn test_magnet_expires_within_grace() {
        let mut state = playing();
        state.activate_power_up(PowerUpKind::Magnet);
        state.set_clock_ms(9_850.0);
        state.expire_power_ups();
        assert!(state.power_ups().magnet_active);

        state.set_clock_ms(9_900.0);
        state.expire_power_ups();
        assert!(!state.power_ups().magnet_active);
        assert!(state.drain_events().contains(&GameEvent::MagnetExpired));
    }

    #[test]
    fn test_shield_consumed_once() {
        let mut state = playing();
        assert!(!state.consume_shield());
        state.activate_power_up(PowerUpKind::Shield);
        assert!(state.consume_shield());
        assert!(!state.consume_shield());
    }

    #[test]
    fn test_random_power_up_hits_both_kinds() {
        let mut state = playing();
        let mut shields = 0;
        let mut magnets = 0;
        for _ in 0..200 {
            state.activate_random_power_up();
            for event in state.drain_events() {
                match event {
                    GameEvent::PowerUpGained(PowerUpKind::Shield) => shields += 1,
                    GameEvent::PowerUpGained(PowerUpKind::Magnet) => magnets += 1,
                    _ => {}
                }
            }
        }
        assert_eq!(shields + magnets, 200);
        assert!(shields > 50 && magnets > 50);
    }

    #[test]
    fn test_time_of_day_wraps() {
        let mut state = playing();
        let start = state.time_of_day();
        // 120 seconds is a full day
        for _ in 0..120 {
            state.update_time(1.0);
        }
        let diff = (state.time_of_day() - start).abs();
        assert!(diff < 1e-3 || (24.0 - diff) < 1e-3);
        assert!((0.0..24.0).contains(&state.time_of_day()));
    }

    #[test]
    fn test_actions_ignored_outside_a_run() {
        let mut state = GameState::new(5, 0, Tuning::default());
        let snap = state.apply_action(Action::MoveLeft);
        assert_eq!(snap.lane, 0);
        let snap = state.apply_action(Action::ToggleDebug);
        assert!(snap.debug);

        state.start_game();
        assert_eq!(state.apply_action(Action::MoveLeft).lane, -1);
    }
}
