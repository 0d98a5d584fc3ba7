// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch state helper: per-frame zoom factors from two touch points.
//!
//! The factor reported by [`PinchState::update`] is the ratio between the
//! current finger distance and the distance at the previous frame, so a
//! caller multiplies it into the current zoom every frame. The midpoint of
//! the two touches is reported as the focal point.
//!
//! ```
//! use kurbo::Point;
//! use diagram_zoom_event_state::pinch::PinchState;
//!
//! let mut pinch = PinchState::default();
//! pinch.start(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
//! let step = pinch.update(Point::new(-50.0, 0.0), Point::new(150.0, 0.0)).unwrap();
//! assert_eq!(step.factor, 2.0);
//! assert_eq!(step.focal, Point::new(50.0, 0.0));
//! ```

use kurbo::Point;

/// One pinch frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchStep {
    /// Ratio of the current finger distance to the previous one.
    pub factor: f64,
    /// Midpoint between the two touches.
    pub focal: Point,
}

/// Tracks a two-finger pinch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PinchState {
    last_distance: Option<f64>,
}

impl PinchState {
    /// Begins a pinch with the two touch positions.
    pub fn start(&mut self, a: Point, b: Point) {
        let d = a.distance(b);
        self.last_distance = (d > 0.0).then_some(d);
    }

    /// Records a new frame and returns the zoom step since the last one.
    ///
    /// Returns `None` if no pinch is active or the fingers coincide, in which
    /// case no ratio can be formed.
    pub fn update(&mut self, a: Point, b: Point) -> Option<PinchStep> {
        let d = a.distance(b);
        if d <= 0.0 {
            return None;
        }
        let Some(last) = self.last_distance else {
            // Fingers were coincident at start; begin measuring from here.
            self.last_distance = Some(d);
            return None;
        };
        self.last_distance = Some(d);
        Some(PinchStep {
            factor: d / last,
            focal: a.midpoint(b),
        })
    }

    /// Ends the pinch.
    pub fn end(&mut self) {
        self.last_distance = None;
    }

    /// Returns `true` while a pinch is active.
    pub fn is_pinching(&self) -> bool {
        self.last_distance.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_are_frame_to_frame() {
        let mut pinch = PinchState::default();
        pinch.start(Point::new(0.0, 0.0), Point::new(0.0, 100.0));

        let s1 = pinch
            .update(Point::new(0.0, 0.0), Point::new(0.0, 200.0))
            .unwrap();
        assert_eq!(s1.factor, 2.0);

        // Shrinking back to 100 is a 0.5 step relative to the previous frame.
        let s2 = pinch
            .update(Point::new(0.0, 0.0), Point::new(0.0, 100.0))
            .unwrap();
        assert_eq!(s2.factor, 0.5);
        assert_eq!(s2.focal, Point::new(0.0, 50.0));
    }

    #[test]
    fn update_without_start_is_none() {
        let mut pinch = PinchState::default();
        assert!(!pinch.is_pinching());
        assert!(pinch
            .update(Point::new(0.0, 0.0), Point::new(1.0, 1.0))
            .is_none());
        // The first update primes the distance.
        assert!(pinch.is_pinching());
    }

    #[test]
    fn coincident_fingers_yield_no_step() {
        let mut pinch = PinchState::default();
        pinch.start(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert!(!pinch.is_pinching());
        assert!(pinch
            .update(Point::new(5.0, 5.0), Point::new(5.0, 5.0))
            .is_none());
    }

    #[test]
    fn end_resets() {
        let mut pinch = PinchState::default();
        pinch.start(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        pinch.end();
        assert!(!pinch.is_pinching());
    }
}
