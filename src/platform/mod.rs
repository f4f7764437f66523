//! Platform abstraction layer
//!
//! Maps host key names (DOM `KeyboardEvent.key` values) to simulation actions.

use crate::sim::Action;

/// Translate a key-down into an action. Letter keys are case-insensitive.
pub fn action_for_key(key: &str) -> Option<Action> {
    match key {
        "ArrowLeft" => Some(Action::MoveLeft),
        "ArrowRight" => Some(Action::MoveRight),
        "ArrowUp" | " " => Some(Action::Jump),
        "ArrowDown" => Some(Action::Duck),
        _ => match key.to_ascii_lowercase().as_str() {
            "a" => Some(Action::MoveLeft),
            "d" => Some(Action::MoveRight),
            "w" => Some(Action::Jump),
            "s" => Some(Action::Duck),
            "i" => Some(Action::ToggleDebug),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_map() {
        assert_eq!(action_for_key("ArrowLeft"), Some(Action::MoveLeft));
        assert_eq!(action_for_key("D"), Some(Action::MoveRight));
        assert_eq!(action_for_key(" "), Some(Action::Jump));
        assert_eq!(action_for_key("s"), Some(Action::Duck));
        assert_eq!(action_for_key("I"), Some(Action::ToggleDebug));
        assert_eq!(action_for_key("Enter"), None);
    }
}
