//! Keyboard input mapping
//! Key events arrive as JSON lines, mirroring browser keydown/keyup events

use serde::{Deserialize, Serialize};

use crate::game::InputState;

/// Raw key edge from the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeyEvent {
    KeyDown { key: String },
    KeyUp { key: String },
}

/// Logical control a key is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Forward,
    Reverse,
    Left,
    Right,
    Boost,
    Exit,
}

impl Control {
    /// Browser key name to control; letters are case-insensitive
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => return Some(Self::Forward),
            "ArrowDown" => return Some(Self::Reverse),
            "ArrowLeft" => return Some(Self::Left),
            "ArrowRight" => return Some(Self::Right),
            "Shift" => return Some(Self::Boost),
            "Escape" => return Some(Self::Exit),
            _ => {}
        }

        match key.to_ascii_lowercase().as_str() {
            "w" => Some(Self::Forward),
            "s" => Some(Self::Reverse),
            "a" => Some(Self::Left),
            "d" => Some(Self::Right),
            _ => None,
        }
    }
}

/// What the session should do after a key edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Stop,
}

impl InputState {
    /// Apply a key edge. Down sets the bound flag, up clears it.
    pub fn apply(&mut self, event: &KeyEvent) -> InputAction {
        let (key, pressed) = match event {
            KeyEvent::KeyDown { key } => (key.as_str(), true),
            KeyEvent::KeyUp { key } => (key.as_str(), false),
        };

        let flag = match Control::from_key(key) {
            Some(Control::Forward) => &mut self.throttle_forward,
            Some(Control::Reverse) => &mut self.throttle_reverse,
            Some(Control::Left) => &mut self.steer_left,
            Some(Control::Right) => &mut self.steer_right,
            Some(Control::Boost) => &mut self.boost,
            Some(Control::Exit) if pressed => return InputAction::Stop,
            Some(Control::Exit) | None => return InputAction::None,
        };
        *flag = pressed;
        InputAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(key: &str) -> KeyEvent {
        KeyEvent::KeyDown { key: key.to_string() }
    }

    fn up(key: &str) -> KeyEvent {
        KeyEvent::KeyUp { key: key.to_string() }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Control::from_key("w"), Some(Control::Forward));
        assert_eq!(Control::from_key("W"), Some(Control::Forward));
        assert_eq!(Control::from_key("ArrowLeft"), Some(Control::Left));
        assert_eq!(Control::from_key("Shift"), Some(Control::Boost));
        assert_eq!(Control::from_key("Escape"), Some(Control::Exit));
        assert_eq!(Control::from_key("arrowleft"), None);
        assert_eq!(Control::from_key("q"), None);
    }

    #[test]
    fn test_edges_set_and_clear() {
        let mut input = InputState::default();
        assert_eq!(input.apply(&down("w")), InputAction::None);
        assert_eq!(input.apply(&down("ArrowRight")), InputAction::None);
        input.apply(&down("Shift"));
        assert!(input.throttle_forward && input.steer_right && input.boost);

        input.apply(&up("ArrowUp"));
        assert!(!input.throttle_forward);
        assert!(input.steer_right);

        // Unknown keys are ignored
        let before = input;
        input.apply(&down("x"));
        assert_eq!(input, before);
    }

    #[test]
    fn test_escape_stops() {
        let mut input = InputState::default();
        assert_eq!(input.apply(&down("Escape")), InputAction::Stop);
        assert_eq!(input.apply(&up("Escape")), InputAction::None);
    }

    #[test]
    fn test_parse_json_event() {
        let event: KeyEvent = serde_json::from_str(r#"{"type":"key_down","key":"a"}"#).unwrap();
        assert_eq!(event, down("a"));
    }
}
