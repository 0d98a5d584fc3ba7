// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-neutral input vocabulary shared by the state machines.

bitflags::bitflags! {
    /// Keyboard modifiers held during an input event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Alt / Option.
        const ALT   = 0b0000_0100;
        /// Meta / Command.
        const META  = 0b0000_1000;
    }
}

impl Modifiers {
    /// Returns `true` if the platform "command" modifier (Ctrl or Cmd) is held.
    #[must_use]
    pub fn command(self) -> bool {
        self.intersects(Self::CTRL | Self::META)
    }
}

/// Mouse button of a press or release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (usually left) button.
    Primary,
    /// Auxiliary (usually middle) button.
    Auxiliary,
    /// Secondary (usually right) button.
    Secondary,
    /// Any other button, by DOM index.
    Other(u8),
}

impl MouseButton {
    /// Maps a DOM `MouseEvent.button` index.
    #[must_use]
    pub fn from_dom_index(index: u8) -> Self {
        match index {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// A logical key, as reported by DOM `KeyboardEvent.key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// `ArrowUp`
    ArrowUp,
    /// `ArrowDown`
    ArrowDown,
    /// `ArrowLeft`
    ArrowLeft,
    /// `ArrowRight`
    ArrowRight,
    /// A printable character.
    Character(char),
    /// Anything else.
    Other,
}

impl Key {
    /// Parses a DOM `KeyboardEvent.key` string.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Other,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Key, Modifiers, MouseButton};

    #[test]
    fn dom_keys_parse() {
        assert_eq!(Key::from_dom("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_dom("="), Key::Character('='));
        assert_eq!(Key::from_dom("Enter"), Key::Other);
        assert_eq!(Key::from_dom(""), Key::Other);
    }

    #[test]
    fn command_modifier_covers_ctrl_and_meta() {
        assert!(Modifiers::CTRL.command());
        assert!(Modifiers::META.command());
        assert!((Modifiers::SHIFT | Modifiers::META).command());
        assert!(!Modifiers::ALT.command());
        assert!(!Modifiers::empty().command());
    }

    #[test]
    fn mouse_button_indices() {
        assert_eq!(MouseButton::from_dom_index(0), MouseButton::Primary);
        assert_eq!(MouseButton::from_dom_index(2), MouseButton::Secondary);
        assert_eq!(MouseButton::from_dom_index(4), MouseButton::Other(4));
    }
}
