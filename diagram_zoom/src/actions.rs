// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry operations written through to the document.
//!
//! The transform is applied to the wrapped diagram element as CSS
//! `transform` with `transform-origin: 0 0`. Every operation here uses that
//! origin; the center-preserving zoom converts the container center into
//! diagram space itself instead of relying on a centered origin.

use kurbo::{Point, Vec2};

use diagram_zoom_dom::Document;
use diagram_zoom_view::Transition;

use crate::state::ContainerState;

/// Writes the container's transform into the diagram element's style.
///
/// With `animate`, a transition is installed too; it is removed again by
/// [`clear_transition`] when the host reports the transition ended.
pub(crate) fn apply(doc: &mut Document, container: &ContainerState, animate: bool) {
    let content = container.content;
    doc.set_style(content, "transform-origin", "0 0");
    doc.set_style(content, "transform", &container.transform.css().to_string());
    if animate {
        doc.set_style(content, "transition", &Transition::TRANSFORM.to_string());
    }
}

/// Removes a transition installed by an animated operation.
pub(crate) fn clear_transition(doc: &mut Document, container: &ContainerState) -> bool {
    doc.remove_style(container.content, "transition")
}

/// Pans by `delta` pixels.
pub(crate) fn move_by(
    doc: &mut Document,
    container: &mut ContainerState,
    delta: Vec2,
    animate: bool,
) {
    container.transform.move_by(delta);
    apply(doc, container, animate);
}

/// Sets the pan offset outright, without animation.
pub(crate) fn pan_to(doc: &mut Document, container: &mut ContainerState, translate: Vec2) {
    container.transform.set_translate(translate);
    apply(doc, container, false);
}

/// Zooms by `factor` about `focal`, in container coordinates.
pub(crate) fn zoom_about(
    doc: &mut Document,
    container: &mut ContainerState,
    focal: Point,
    factor: f64,
) {
    container.transform.zoom_about(focal, factor);
    apply(doc, container, false);
}

/// Zooms by `factor` keeping the container center fixed.
pub(crate) fn zoom_by(
    doc: &mut Document,
    container: &mut ContainerState,
    factor: f64,
    animate: bool,
) {
    let size = doc.size(container.node);
    let center = Point::new(size.width / 2.0, size.height / 2.0);
    container.transform.zoom_about(center, factor);
    apply(doc, container, animate);
}

/// Zooms by an additive wheel delta keeping `cursor` fixed.
pub(crate) fn zoom_at_cursor(
    doc: &mut Document,
    container: &mut ContainerState,
    cursor: Point,
    delta: f64,
) {
    container.transform.zoom_at_cursor(cursor, delta);
    apply(doc, container, false);
}

/// Fits the diagram into the container, centered, never above 1:1.
///
/// Returns `false` and leaves everything untouched while either element has
/// no layout size yet.
pub(crate) fn fit(doc: &mut Document, container: &mut ContainerState, animate: bool) -> bool {
    let outer = doc.size(container.node);
    let inner = doc.size(container.content);
    if !container.transform.fit(outer, inner) {
        return false;
    }
    apply(doc, container, animate);
    true
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;
    use crate::host::{LeafId, ViewMode};
    use crate::id::ContainerId;
    use crate::state::ContainerSizes;

    fn setup() -> (Document, ContainerState) {
        let mut doc = Document::new();
        let root = doc.root();
        let node = doc.create_element("div");
        let content = doc.create_element("div");
        doc.append_child(root, node);
        doc.append_child(node, content);
        doc.set_size(node, Size::new(400.0, 300.0));
        doc.set_size(content, Size::new(800.0, 300.0));
        let container = ContainerState::new(
            ContainerId::from_raw("id-1-abc"),
            LeafId(1),
            "Default".to_owned(),
            ViewMode::Preview,
            node,
            content,
            String::new(),
            ContainerSizes {
                expanded: Size::new(400.0, 300.0),
                folded: Size::new(200.0, 150.0),
            },
            false,
        );
        (doc, container)
    }

    #[test]
    fn move_writes_transform_with_top_left_origin() {
        let (mut doc, mut c) = setup();
        move_by(&mut doc, &mut c, Vec2::new(30.0, -20.0), false);
        assert_eq!(
            doc.style(c.content, "transform"),
            Some("translate(30px, -20px) scale(1)")
        );
        assert_eq!(doc.style(c.content, "transform-origin"), Some("0 0"));
        assert_eq!(doc.style(c.content, "transition"), None);
    }

    #[test]
    fn animated_ops_install_a_clearable_transition() {
        let (mut doc, mut c) = setup();
        zoom_by(&mut doc, &mut c, 2.0, true);
        assert_eq!(
            doc.style(c.content, "transition"),
            Some("transform 0.3s ease-out")
        );
        assert!(clear_transition(&mut doc, &c));
        assert!(!clear_transition(&mut doc, &c));
        // A later plain move stays plain.
        move_by(&mut doc, &mut c, Vec2::new(1.0, 0.0), false);
        assert_eq!(doc.style(c.content, "transition"), None);
    }

    #[test]
    fn zoom_keeps_container_center() {
        let (mut doc, mut c) = setup();
        let center = Point::new(200.0, 150.0);
        let before = c.transform.to_diagram(center);
        zoom_by(&mut doc, &mut c, 1.1, false);
        let after = c.transform.to_diagram(center);
        assert!((before - after).hypot() < 1e-9);
    }

    #[test]
    fn fit_shrinks_and_centers() {
        let (mut doc, mut c) = setup();
        assert!(fit(&mut doc, &mut c, false));
        assert_eq!(c.transform.scale(), 0.5);
        assert_eq!(c.transform.translate(), Vec2::new(0.0, 75.0));
    }

    #[test]
    fn fit_waits_for_layout() {
        let (mut doc, mut c) = setup();
        doc.set_size(c.content, Size::ZERO);
        assert!(!fit(&mut doc, &mut c, false));
        assert_eq!(doc.style(c.content, "transform"), None);
    }
}
