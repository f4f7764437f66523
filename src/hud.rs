//! Display helpers for HUD renderers

use crate::sim::Snapshot;

/// Game clock as `HH:MM`
pub fn clock_label(time_of_day: f32) -> String {
    let hours = time_of_day.floor() as u32 % 24;
    let minutes = ((time_of_day.fract()) * 60.0).floor() as u32 % 60;
    format!("{:02}:{:02}", hours, minutes)
}

/// Speedometer reading in km/h
pub fn speed_kmh(speed: f32) -> u32 {
    (speed * 5.0).round().max(0.0) as u32
}

/// Whole seconds left on the magnet, rounded up
pub fn magnet_seconds_left(snapshot: &Snapshot) -> u32 {
    if !snapshot.magnet_active {
        return 0;
    }
    ((snapshot.magnet_expiry_ms - snapshot.clock_ms) / 1000.0).ceil().max(0.0) as u32
}

/// Whether the finished run matched or beat the record
pub fn is_new_best(snapshot: &Snapshot) -> bool {
    snapshot.score > 0 && snapshot.score >= snapshot.high_score
}
