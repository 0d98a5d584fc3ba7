// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard shortcuts for a focused diagram container.
//!
//! | Key | Action |
//! |---|---|
//! | Arrow keys | pan by [`PAN_STEP`] pixels in the arrow's direction |
//! | Ctrl/Cmd + `=` (or `+`) | zoom in by 10% |
//! | Ctrl/Cmd + `-` | zoom out by 10% |
//! | Ctrl/Cmd + `0` | reset to fit |
//!
//! Anything else maps to `None` and must be left to the host untouched.

use kurbo::Vec2;

use crate::input::{Key, Modifiers};

/// Pan distance of one arrow key press, in pixels.
pub const PAN_STEP: f64 = 50.0;

/// Zoom factor of one zoom-in step.
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Zoom factor of one zoom-out step.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// What a recognized key press does.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    /// Pan by a delta, animated.
    Pan(Vec2),
    /// Zoom about the container center by a factor, animated.
    Zoom(f64),
    /// Reset zoom and pan so the diagram fits its container.
    Fit,
}

/// Maps a key press to an action.
#[must_use]
pub fn key_action(key: &Key, modifiers: Modifiers) -> Option<KeyAction> {
    match key {
        Key::ArrowUp => Some(KeyAction::Pan(Vec2::new(0.0, -PAN_STEP))),
        Key::ArrowDown => Some(KeyAction::Pan(Vec2::new(0.0, PAN_STEP))),
        Key::ArrowLeft => Some(KeyAction::Pan(Vec2::new(-PAN_STEP, 0.0))),
        Key::ArrowRight => Some(KeyAction::Pan(Vec2::new(PAN_STEP, 0.0))),
        Key::Character(c) if modifiers.command() => match c {
            '=' | '+' => Some(KeyAction::Zoom(ZOOM_IN_FACTOR)),
            '-' => Some(KeyAction::Zoom(ZOOM_OUT_FACTOR)),
            '0' => Some(KeyAction::Fit),
            _ => None,
        },
        _ => None,
    }
}
