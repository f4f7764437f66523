//! Session orchestration
//!
//! Owns the store, the track ring and the collaborators. The host calls
//! [`Session::frame`] from its animation callback and forwards key presses;
//! the session turns queued [`GameEvent`]s into audio cues and high-score
//! writes. Collaborator failures are logged here and go no further.

use crate::audio::{AudioSink, Cue};
use crate::highscores;
use crate::persistence::KeyValueStore;
use crate::platform::action_for_key;
use crate::settings::Settings;
use crate::sim::{Action, GameEvent, GamePhase, GameState, Snapshot, TickInput, Track, tick};
use crate::tuning::Tuning;

/// A running game plus its collaborators
pub struct Session<S: KeyValueStore, A: AudioSink> {
    state: GameState,
    track: Track,
    store: S,
    audio: A,
    settings: Settings,
    input: TickInput,
}

impl<S: KeyValueStore, A: AudioSink> Session<S, A> {
    /// Load the high score and settings from `store` and build an idle session
    pub fn new(seed: u64, tuning: Tuning, store: S, audio: A) -> Self {
        let high_score = highscores::load(&store);
        let settings = Settings::load(&store);
        let mut state = GameState::new(seed, high_score, tuning.clone());
        if settings.debug_overlay {
            state.toggle_debug();
        }
        let track = Track::new(Track::run_seed(seed, state.run_id()), tuning);
        let input = TickInput {
            autopilot: settings.attract_mode,
            ..Default::default()
        };
        Self {
            state,
            track,
            store,
            audio,
            settings,
            input,
        }
    }

    /// Start a run (from the menu, or straight after a game over)
    pub fn start(&mut self) -> Snapshot {
        if self.state.phase() == GamePhase::GameOver {
            self.state.reset_game();
        }
        self.track.reset(Track::run_seed(self.state.seed(), self.state.run_id()));
        self.state.start_game();
        self.dispatch_events();
        self.state.snapshot()
    }

    /// Back to the menu with a fresh ring for the next run
    pub fn reset(&mut self) -> Snapshot {
        self.state.reset_game();
        self.track.reset(Track::run_seed(self.state.seed(), self.state.run_id()));
        self.input.actions.clear();
        self.dispatch_events();
        self.state.snapshot()
    }

    /// Queue a host key press; unknown keys are ignored
    pub fn key_down(&mut self, key: &str) {
        if let Some(action) = action_for_key(key) {
            self.push_action(action);
        }
    }

    /// Queue an action for the next frame
    pub fn push_action(&mut self, action: Action) {
        self.input.actions.push(action);
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    /// Advance one frame and return the state to render
    pub fn frame(&mut self, dt: f32) -> Snapshot {
        let result = tick(&mut self.state, &mut self.track, &self.input, dt);
        self.input.actions.clear();
        if let Some(kind) = result.crashed {
            log::debug!("Crashed into {:?}", kind);
        }
        self.dispatch_events();
        self.state.snapshot()
    }

    /// Route queued side effects to the collaborators
    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::ScoreChanged { .. } => self.cue(Cue::Score),
                GameEvent::HighScoreChanged(score) => {
                    if let Err(e) = highscores::save(&mut self.store, score) {
                        log::warn!("Failed to save high score: {}", e);
                    }
                }
                GameEvent::PowerUpGained(kind) => {
                    log::info!("Power-up: {:?}", kind);
                    self.cue(Cue::PowerUp);
                }
                GameEvent::ShieldConsumed => self.cue(Cue::ShieldBreak),
                GameEvent::GameOver { new_best, .. } => {
                    self.cue(if new_best { Cue::HighScore } else { Cue::Crash });
                }
                GameEvent::MagnetExpired => log::debug!("Magnet expired"),
                GameEvent::RunStarted { .. } | GameEvent::RunReset { .. } => {}
            }
        }
    }

    fn cue(&mut self, cue: Cue) {
        let volume = self.settings.effective_volume();
        if let Err(e) = self.audio.play(cue, volume) {
            log::warn!("Audio cue {:?} failed: {}", cue, e);
        }
    }

    /// Replace and persist settings
    pub fn update_settings(&mut self, settings: Settings) {
        self.input.autopilot = settings.attract_mode;
        if let Err(e) = settings.save(&mut self.store) {
            log::warn!("Failed to save settings: {}", e);
        }
        self.settings = settings;
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioError;
    use crate::persistence::{MemoryStore, StorageError};
    use crate::sim::{Item, ItemKind};

    /// Records cues, optionally refusing every one
    #[derive(Default)]
    struct Recorder {
        cues: Vec<Cue>,
        refuse: bool,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, cue: Cue, _volume: f32) -> Result<(), AudioError> {
            if self.refuse {
                return Err(AudioError::Rejected("no user gesture".into()));
            }
            self.cues.push(cue);
            Ok(())
        }
    }

    /// Memory store that counts writes
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: usize,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes += 1;
            self.inner.set(key, value)
        }
    }

    fn session() -> Session<CountingStore, Recorder> {
        Session::new(77, Tuning::default(), CountingStore::default(), Recorder::default())
    }

    fn place(session: &mut Session<CountingStore, Recorder>, items: Vec<Item>) {
        for seg in session.track.segments_mut() {
            seg.items.clear();
        }
        // Segment 0 will be at +0.16 after one 16ms frame
        session.track.segments_mut()[0].items = items;
    }

    #[test]
    fn test_gift_scores_and_persists() {
        let mut s = session();
        s.start();
        place(&mut s, vec![Item::new(0, -0.16, ItemKind::Gift)]);
        let snap = s.frame(0.016);

        assert_eq!(snap.score, 1);
        assert_eq!(snap.speed, 10.5);
        assert_eq!(s.audio().cues, vec![Cue::Score]);
        assert_eq!(highscores::load(s.store()), 1);
    }

    #[test]
    fn test_crash_plays_once() {
        let mut s = session();
        s.start();
        place(&mut s, vec![Item::new(0, -0.16, ItemKind::Snowman)]);
        let snap = s.frame(0.016);
        assert_eq!(snap.phase, GamePhase::GameOver);

        let writes = s.store().writes;
        s.frame(0.016);
        s.frame(0.016);
        assert_eq!(s.audio().cues, vec![Cue::Crash]);
        assert_eq!(s.store().writes, writes);
    }

    #[test]
    fn test_audio_failure_is_swallowed() {
        let mut s = Session::new(
            5,
            Tuning::default(),
            MemoryStore::new(),
            Recorder {
                refuse: true,
                ..Default::default()
            },
        );
        s.start();
        for seg in s.track.segments_mut() {
            seg.items.clear();
        }
        s.track.segments_mut()[0].items = vec![Item::new(0, -0.16, ItemKind::Gift)];
        let snap = s.frame(0.016);
        assert_eq!(snap.score, 1);
        assert_eq!(snap.phase, GamePhase::Playing);
    }

    #[test]
    fn test_keys_drive_the_player() {
        let mut s = session();
        s.key_down("ArrowLeft");
        assert_eq!(s.frame(0.016).lane, 0, "ignored on the menu");

        s.start();
        s.key_down("ArrowLeft");
        s.key_down("Escape");
        let snap = s.frame(0.016);
        assert_eq!(snap.lane, -1);
        assert!(snap.player_x < 0.0);

        s.key_down("i");
        assert!(s.frame(0.016).debug);
    }

    #[test]
    fn test_restart_after_game_over_is_a_new_run() {
        let mut s = session();
        s.start();
        place(&mut s, vec![Item::new(0, -0.16, ItemKind::Rock)]);
        s.frame(0.016);
        assert_eq!(s.snapshot().phase, GamePhase::GameOver);

        let snap = s.start();
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.run_id, 1);
        assert_eq!(snap.score, 0);
        assert_eq!(s.track().recycled(), 0);
        assert!(s.track().segments()[0].items.is_empty());
    }

    #[test]
    fn test_high_score_survives_sessions() {
        let mut store = CountingStore::default();
        highscores::save(&mut store, 9).unwrap();
        let s = Session::new(1, Tuning::default(), store, Recorder::default());
        assert_eq!(s.snapshot().high_score, 9);
    }

    #[test]
    fn test_settings_persist_and_enable_autopilot() {
        let mut s = session();
        s.update_settings(Settings {
            attract_mode: true,
            ..Default::default()
        });
        assert!(s.input.autopilot);
        assert!(Settings::load(s.store()).attract_mode);
    }
}
