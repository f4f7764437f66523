//! Sled Slide - an endless three-lane runner
//!
//! Core modules:
//! - `sim`: Simulation (track ring, item generation, player physics, collisions, game state)
//! - `session`: Wires the simulation to its collaborators (audio, storage)
//! - `persistence`: Key-value storage backends
//! - `platform`: Browser/native input mapping
//! - `tuning`: Data-driven game balance
//! - `hud`: Display helpers for renderers

pub mod audio;
pub mod highscores;
pub mod hud;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Distance between lane centres (world units)
    pub const LANE_WIDTH: f32 = 3.5;
    /// Leftmost and rightmost lane indices
    pub const MIN_LANE: i8 = -1;
    pub const MAX_LANE: i8 = 1;
    pub const LANES: [i8; 3] = [-1, 0, 1];

    /// Track segment length along the travel axis
    pub const SEGMENT_LENGTH: f32 = 20.0;
    /// Segments in the recycled ring
    pub const SEGMENT_COUNT: usize = 10;
    /// Leading segments left empty at the start of a run
    pub const EMPTY_LEAD_SEGMENTS: usize = 3;
    /// Items never spawn closer than this to a segment edge
    pub const SEGMENT_EDGE_MARGIN: f32 = 2.0;

    /// Hitboxes as (width, depth)
    pub const PLAYER_HITBOX: (f32, f32) = (1.0, 1.4);
    pub const OBSTACLE_HITBOX: (f32, f32) = (2.2, 1.2);
    pub const GIFT_HITBOX: (f32, f32) = (1.0, 1.2);
    pub const ARCH_HITBOX: (f32, f32) = (1.5, 1.0);
    pub const ABILITY_BOX_HITBOX: (f32, f32) = (1.2, 1.2);
    /// Arch clearance height (render only)
    pub const ARCH_HEIGHT: f32 = 2.5;

    /// Jump impulse and gravity (units/s, units/s²)
    pub const JUMP_FORCE: f32 = 12.0;
    pub const GRAVITY: f32 = 30.0;
    /// Lateral easing rate toward the target lane (per second)
    pub const LANE_SMOOTHING: f32 = 10.0;
    /// How long a duck lasts
    pub const DUCK_DURATION_MS: f64 = 800.0;

    /// Forward speed at the start of a run
    pub const BASE_SPEED: f32 = 10.0;
    /// Speed gained per point scored
    pub const SPEED_INCREMENT: f32 = 0.5;

    /// Magnet window and expiry tolerance
    pub const MAGNET_DURATION_MS: f64 = 10_000.0;
    pub const MAGNET_GRACE_MS: f64 = 100.0;
    /// Gifts within this distance are pulled in while the magnet is active
    pub const MAGNET_RADIUS: f32 = 8.0;

    /// Game hours advanced per real second (a full day every two minutes)
    pub const TIME_OF_DAY_RATE: f32 = 0.2;

    /// Collected items fade out over this window (render only)
    pub const COLLECT_FADE_MS: f64 = 500.0;
}

/// World X coordinate of a lane centre
#[inline]
pub fn lane_center(lane: i8) -> f32 {
    lane as f32 * consts::LANE_WIDTH
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
