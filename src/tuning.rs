//! Data-driven game balance
//!
//! Every gameplay number the simulation reads at runtime lives in [`Tuning`].
//! Defaults come from [`crate::consts`]; a JSON document may override any
//! subset of fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::HazardOverflow;

/// Cumulative upper edges of the per-lane spawn roll.
///
/// A roll `r` in `[0, 1)` spawns nothing below `nothing`, a gift below
/// `gift`, an ability box below `ability_box` and a hazard otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnBands {
    pub nothing: f32,
    pub gift: f32,
    pub ability_box: f32,
}

impl Default for SpawnBands {
    fn default() -> Self {
        Self {
            nothing: 0.20,
            gift: 0.45,
            ability_box: 0.50,
        }
    }
}

/// Gameplay tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub base_speed: f32,
    pub speed_increment: f32,
    pub segment_length: f32,
    pub segment_count: usize,
    pub empty_lead_segments: usize,
    pub edge_margin: f32,
    /// Most hazards one segment may hold (keeps a lane open)
    pub max_hazards_per_segment: usize,
    pub spawn: SpawnBands,
    pub hazard_overflow: HazardOverflow,
    /// Consecutive segments sharing a biome
    pub biome_span: u64,
    pub jump_force: f32,
    pub gravity: f32,
    pub lane_smoothing: f32,
    pub duck_duration_ms: f64,
    pub magnet_duration_ms: f64,
    pub magnet_grace_ms: f64,
    pub magnet_radius: f32,
    pub time_of_day_rate: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            speed_increment: SPEED_INCREMENT,
            segment_length: SEGMENT_LENGTH,
            segment_count: SEGMENT_COUNT,
            empty_lead_segments: EMPTY_LEAD_SEGMENTS,
            edge_margin: SEGMENT_EDGE_MARGIN,
            max_hazards_per_segment: 2,
            spawn: SpawnBands::default(),
            hazard_overflow: HazardOverflow::default(),
            biome_span: 1,
            jump_force: JUMP_FORCE,
            gravity: GRAVITY,
            lane_smoothing: LANE_SMOOTHING,
            duck_duration_ms: DUCK_DURATION_MS,
            magnet_duration_ms: MAGNET_DURATION_MS,
            magnet_grace_ms: MAGNET_GRACE_MS,
            magnet_radius: MAGNET_RADIUS,
            time_of_day_rate: TIME_OF_DAY_RATE,
        }
    }
}

/// Rejected tuning document
#[derive(Debug)]
pub enum TuningError {
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "tuning parse error: {e}"),
            TuningError::Invalid(why) => write!(f, "invalid tuning: {why}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let b = self.spawn;
        if !(0.0 <= b.nothing && b.nothing <= b.gift && b.gift <= b.ability_box && b.ability_box <= 1.0) {
            return Err(TuningError::Invalid("spawn bands must be ordered within [0, 1]"));
        }
        if self.max_hazards_per_segment >= LANES.len() {
            return Err(TuningError::Invalid("hazard cap must leave one lane open"));
        }
        if self.segment_count < 2 {
            return Err(TuningError::Invalid("ring needs at least two segments"));
        }
        if self.segment_length <= 2.0 * self.edge_margin {
            return Err(TuningError::Invalid("edge margin leaves no room for items"));
        }
        if self.biome_span == 0 {
            return Err(TuningError::Invalid("biome span must be at least one segment"));
        }
        if self.base_speed < 0.0 || self.speed_increment < 0.0 {
            return Err(TuningError::Invalid("speeds must be non-negative"));
        }
        if self.jump_force <= 0.0 || self.gravity <= 0.0 {
            return Err(TuningError::Invalid("jump force and gravity must be positive"));
        }
        Ok(())
    }

    /// Total track length covered by the ring
    pub fn ring_length(&self) -> f32 {
        self.segment_length * self.segment_count as f32
    }
}
