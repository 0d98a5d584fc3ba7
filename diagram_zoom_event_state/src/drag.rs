// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag state helper: pan offsets computed relative to where the drag started.
//!
//! ## Usage
//!
//! 1) On pointer down, call [`DragState::start`] with the pointer position and
//!    the pan offset the diagram had at that moment.
//! 2) On each move, call [`DragState::update`]; it returns the pan offset the
//!    diagram should have now (`origin + (pos - start)`).
//! 3) On pointer up or leave, call [`DragState::end`].
//!
//! Because every update is computed from the drag start rather than summed
//! from per-event deltas, the pan after a drag equals the pan before it plus
//! the aggregate pointer displacement, no matter how many move events fired.
//! Ending a drag never moves the diagram.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use diagram_zoom_event_state::drag::DragState;
//!
//! let mut drag = DragState::default();
//! drag.start(Point::new(10.0, 20.0), Vec2::ZERO);
//! assert!(drag.is_dragging());
//!
//! drag.update(Point::new(25.0, 10.0));
//! let pan = drag.update(Point::new(40.0, 0.0)).unwrap();
//! assert_eq!(pan, Vec2::new(30.0, -20.0));
//!
//! assert_eq!(drag.end(), Some(Vec2::new(30.0, -20.0)));
//! assert!(!drag.is_dragging());
//! ```

use kurbo::{Point, Vec2};

/// Tracks a single-pointer drag.
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct DragState {
    /// Pointer position when the drag started.
    pub start_pos: Option<Point>,
    /// Last pointer position seen during the drag.
    pub last_pos: Option<Point>,
    /// Pan offset of the diagram when the drag started.
    pub origin: Vec2,
}

impl DragState {
    /// Starts a drag at `pos`; `origin` is the current pan offset.
    ///
    /// Starting while already dragging restarts from the new position.
    pub fn start(&mut self, pos: Point, origin: Vec2) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.origin = origin;
    }

    /// Records a pointer move and returns the pan offset to apply.
    ///
    /// Returns `None` when no drag is active.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        let start = self.start_pos?;
        self.last_pos = Some(pos);
        Some(self.origin + (pos - start))
    }

    /// Returns the displacement from the drag start to `pos`.
    pub fn total_offset(&self, pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| pos - start)
    }

    /// Ends the drag, returning the aggregate displacement it produced.
    pub fn end(&mut self) -> Option<Vec2> {
        let total = match (self.start_pos, self.last_pos) {
            (Some(start), Some(last)) => Some(last - start),
            _ => None,
        };
        self.start_pos = None;
        self.last_pos = None;
        self.origin = Vec2::ZERO;
        total
    }

    /// Returns `true` while a drag is active.
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_drag_state_is_not_dragging() {
        let drag = DragState::default();
        assert!(!drag.is_dragging());
        assert!(drag.last_pos.is_none());
    }

    #[test]
    fn update_is_relative_to_start_and_origin() {
        let mut drag = DragState::default();
        drag.start(Point::new(100.0, 100.0), Vec2::new(-5.0, 7.0));

        assert_eq!(
            drag.update(Point::new(110.0, 90.0)),
            Some(Vec2::new(5.0, -3.0))
        );
        // Second move is still measured from the start, not from the last move.
        assert_eq!(
            drag.update(Point::new(130.0, 80.0)),
            Some(Vec2::new(25.0, -13.0))
        );
    }

    #[test]
    fn update_returns_none_when_not_dragging() {
        let mut drag = DragState::default();
        assert_eq!(drag.update(Point::new(15.0, 25.0)), None);
        assert!(drag.last_pos.is_none());
    }

    #[test]
    fn many_small_moves_aggregate_exactly() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0), Vec2::ZERO);
        let mut last = None;
        for i in 1..=10 {
            let f = f64::from(i);
            last = drag.update(Point::new(3.0 * f, -2.0 * f));
        }
        assert_eq!(last, Some(Vec2::new(30.0, -20.0)));
        assert_eq!(drag.end(), Some(Vec2::new(30.0, -20.0)));
    }

    #[test]
    fn end_without_moves_reports_zero() {
        let mut drag = DragState::default();
        drag.start(Point::new(4.0, 4.0), Vec2::new(1.0, 1.0));
        assert_eq!(drag.end(), Some(Vec2::ZERO));
    }

    #[test]
    fn end_on_fresh_state_is_safe() {
        let mut drag = DragState::default();
        assert_eq!(drag.end(), None);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn total_offset_tracks_start() {
        let mut drag = DragState::default();
        assert_eq!(drag.total_offset(Point::new(1.0, 1.0)), None);
        drag.start(Point::new(10.0, 20.0), Vec2::ZERO);
        assert_eq!(
            drag.total_offset(Point::new(20.0, 35.0)),
            Some(Vec2::new(10.0, 15.0))
        );
    }

    #[test]
    fn start_overwrites_previous_drag() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0), Vec2::ZERO);
        drag.update(Point::new(10.0, 10.0));

        drag.start(Point::new(50.0, 60.0), Vec2::new(10.0, 10.0));
        assert_eq!(drag.start_pos, drag.last_pos);
        assert_eq!(
            drag.update(Point::new(55.0, 65.0)),
            Some(Vec2::new(15.0, 15.0))
        );
    }
}
