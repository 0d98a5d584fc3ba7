// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input registrations of containers.
//!
//! The host forwards raw input with the element it hit. Routing walks from
//! that element up through its ancestors and stops at the first container
//! registered for the input kind, the way a DOM event bubbles to the
//! nearest listener. Dropping a registration is all it takes to detach a
//! container from input.

use hashbrown::HashMap;

use diagram_zoom_dom::{Document, NodeId};

use crate::host::LeafId;
use crate::id::ContainerId;

bitflags::bitflags! {
    /// Input kinds a container listens for.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub(crate) struct Listen: u16 {
        /// Press, move, release, enter and leave.
        const MOUSE = 1 << 0;
        /// Wheel.
        const WHEEL = 1 << 1;
        /// Touch start, move and end.
        const TOUCH = 1 << 2;
        /// Key presses while focused.
        const KEY = 1 << 3;
        /// Focus in and out.
        const FOCUS = 1 << 4;
        /// Clicks on panel buttons.
        const CLICK = 1 << 5;
        /// End of a transform transition.
        const TRANSITION = 1 << 6;
        /// Context menu requests.
        const CONTEXT_MENU = 1 << 7;
        /// Everything the gesture engine handles.
        const GESTURES = Self::MOUSE.bits()
            | Self::WHEEL.bits()
            | Self::TOUCH.bits()
            | Self::KEY.bits()
            | Self::FOCUS.bits()
            | Self::CLICK.bits()
            | Self::TRANSITION.bits();
    }
}

#[derive(Clone, Debug)]
struct Registration {
    leaf: LeafId,
    id: ContainerId,
    kinds: Listen,
}

/// A routed input: the listening container and its address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Route {
    pub(crate) node: NodeId,
    pub(crate) leaf: LeafId,
    pub(crate) id: ContainerId,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Listeners {
    entries: HashMap<NodeId, Registration>,
}

impl Listeners {
    /// Adds `kinds` to the registration of `node`.
    pub(crate) fn register(&mut self, node: NodeId, leaf: LeafId, id: &ContainerId, kinds: Listen) {
        self.entries
            .entry(node)
            .and_modify(|r| r.kinds |= kinds)
            .or_insert_with(|| Registration {
                leaf,
                id: id.clone(),
                kinds,
            });
    }

    pub(crate) fn release(&mut self, node: NodeId) -> bool {
        self.entries.remove(&node).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Finds the nearest container at or above `target` listening for `kind`.
    pub(crate) fn route(&self, doc: &Document, target: NodeId, kind: Listen) -> Option<Route> {
        if !doc.is_alive(target) {
            return None;
        }
        core::iter::once(target)
            .chain(doc.ancestors(target))
            .find_map(|node| {
                let r = self.entries.get(&node)?;
                r.kinds.contains(kind).then(|| Route {
                    node,
                    leaf: r.leaf,
                    id: r.id.clone(),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_bubble_to_nearest_listener() {
        let mut doc = Document::new();
        let root = doc.root();
        let container = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.append_child(root, container);
        doc.append_child(container, inner);

        let id = ContainerId::from_raw("id-1-a");
        let mut listeners = Listeners::default();
        listeners.register(container, LeafId(1), &id, Listen::MOUSE);

        let route = listeners.route(&doc, inner, Listen::MOUSE).unwrap();
        assert_eq!(route.node, container);
        assert_eq!(route.id, id);
        assert!(listeners.route(&doc, inner, Listen::KEY).is_none());
        assert!(listeners.route(&doc, root, Listen::MOUSE).is_none());

        listeners.register(container, LeafId(1), &id, Listen::KEY);
        assert!(listeners.route(&doc, inner, Listen::KEY).is_some());
        assert!(listeners.route(&doc, inner, Listen::MOUSE).is_some());
        assert_eq!(listeners.len(), 1);

        assert!(listeners.release(container));
        assert!(listeners.route(&doc, inner, Listen::MOUSE).is_none());
        assert_eq!(listeners.len(), 0);
    }
}
