//! Best-score persistence
//!
//! One integer, stored as a decimal string under a fixed key.

use crate::persistence::{KeyValueStore, StorageError};

/// Storage key for the best score
pub const STORAGE_KEY: &str = "santa-high-score";

/// Read the saved best score. Missing or unparsable values count as 0.
pub fn load(store: &dyn KeyValueStore) -> u64 {
    match store.get(STORAGE_KEY) {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(score) => {
                log::info!("Loaded high score {}", score);
                score
            }
            Err(_) => {
                log::warn!("Ignoring unparsable high score {:?}", raw);
                0
            }
        },
        None => {
            log::info!("No high score found, starting fresh");
            0
        }
    }
}

/// Save the best score
pub fn save(store: &mut dyn KeyValueStore, score: u64) -> Result<(), StorageError> {
    store.set(STORAGE_KEY, &score.to_string())?;
    log::debug!("High score saved ({})", score);
    Ok(())
}
