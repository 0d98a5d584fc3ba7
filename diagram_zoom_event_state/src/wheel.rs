// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wheel policy: decide whether a wheel event zooms and by how much.
//!
//! Plain wheel scrolling belongs to the document; it only zooms a diagram
//! while a modifier (Ctrl, Cmd or Alt) is held, or when the container is
//! fullscreen and there is no document left to scroll.

use crate::input::Modifiers;

/// Scale change per wheel delta unit. Negative deltas (wheel up) zoom in.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = -0.001;

/// Returns the additive scale change for a wheel event, or `None` if the
/// event should scroll the document instead.
#[must_use]
pub fn wheel_zoom_delta(delta_y: f64, modifiers: Modifiers, fullscreen: bool) -> Option<f64> {
    let wants_zoom =
        fullscreen || modifiers.intersects(Modifiers::CTRL | Modifiers::META | Modifiers::ALT);
    if !wants_zoom || !delta_y.is_finite() {
        return None;
    }
    Some(delta_y * WHEEL_ZOOM_SENSITIVITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_wheel_scrolls() {
        assert_eq!(wheel_zoom_delta(100.0, Modifiers::empty(), false), None);
        assert_eq!(wheel_zoom_delta(100.0, Modifiers::SHIFT, false), None);
    }

    fn close(actual: Option<f64>, expected: f64) -> bool {
        actual.is_some_and(|a| (a - expected).abs() < 1e-12)
    }

    #[test]
    fn modifier_or_fullscreen_zooms() {
        assert!(close(wheel_zoom_delta(-100.0, Modifiers::CTRL, false), 0.1));
        assert!(close(wheel_zoom_delta(-100.0, Modifiers::META, false), 0.1));
        assert!(close(wheel_zoom_delta(-100.0, Modifiers::ALT, false), 0.1));
        assert!(close(wheel_zoom_delta(200.0, Modifiers::empty(), true), -0.2));
    }

    #[test]
    fn non_finite_delta_is_ignored() {
        assert_eq!(wheel_zoom_delta(f64::NAN, Modifiers::CTRL, true), None);
    }
}
