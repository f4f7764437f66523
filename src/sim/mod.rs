//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Variable timestep, driven by the host's frame callback
//! - Seeded RNG only
//! - Stable iteration order (ring slot order, then generation order)
//! - Timed effects are deadlines on the simulation clock, never callbacks

pub mod autopilot;
pub mod collision;
pub mod generator;
pub mod player;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::{Hitbox, resolve_collisions};
pub use generator::{HazardOverflow, Item, ItemKind, generate_items};
pub use player::{Action, PlayerState};
pub use state::{GameEvent, GamePhase, GameState, PowerUpKind, PowerUps, Snapshot};
pub use tick::{TickInput, tick};
pub use track::{Biome, Segment, Track};
