// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for gestures driven through the whole engine.

mod common;

use common::{LEAF, button, engine, wrapped};
use diagram_zoom::{Modifiers, MouseButton, MouseEventKind, MouseInput};
use diagram_zoom_view::MIN_SCALE;
use kurbo::{Point, Vec2};
use proptest::prelude::*;

fn at(kind: MouseEventKind, target: diagram_zoom_dom::NodeId, p: Point) -> MouseInput {
    MouseInput {
        kind,
        target,
        position: p,
        modifiers: Modifiers::empty(),
    }
}

proptest! {
    #[test]
    fn drag_applies_the_net_displacement_once(
        start in (-300.0..300.0_f64, -300.0..300.0_f64),
        path in prop::collection::vec((-300.0..300.0_f64, -300.0..300.0_f64), 1..24),
    ) {
        let mut zoom = engine();
        let (id, _, svg) = wrapped(&mut zoom);
        let start = Point::new(start.0, start.1);
        zoom.mouse(at(MouseEventKind::Down(MouseButton::Primary), svg, start));
        let mut last = start;
        for &(x, y) in &path {
            last = Point::new(x, y);
            zoom.mouse(at(MouseEventKind::Move, svg, last));
        }
        zoom.mouse(at(MouseEventKind::Up, svg, last));

        let t = zoom.state().container(LEAF, &id).unwrap().transform();
        let expected: Vec2 = last - start;
        prop_assert!((t.translate() - expected).hypot() < 1e-9);
    }

    #[test]
    fn zoom_buttons_respect_the_floor(clicks in prop::collection::vec(any::<bool>(), 1..80)) {
        let mut zoom = engine();
        let (id, node, _) = wrapped(&mut zoom);
        let zoom_in = button(zoom.document(), node, "zoom-in");
        let zoom_out = button(zoom.document(), node, "zoom-out");
        for inward in clicks {
            zoom.click(if inward { zoom_in } else { zoom_out });
            let scale = zoom.state().container(LEAF, &id).unwrap().transform().scale();
            prop_assert!(scale >= MIN_SCALE);
        }
    }
}
