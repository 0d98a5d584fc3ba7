// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document arena: structure, attributes, layout sizes and observation.

use std::borrow::Cow;
use std::collections::BTreeMap;

use hashbrown::HashMap;
use kurbo::Size;
use smallvec::smallvec;

use crate::mutation::{MutationKind, MutationRecord, ObserveOptions};
use crate::selector::SelectorList;
use crate::types::{NodeId, ObserverId};

/// Kind of a document node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with a tag, classes, attributes and children.
    Element,
    /// A text node.
    Text,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    kind: NodeKind,
    tag: String,
    text: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    size: Size,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(generation: u32, kind: NodeKind, tag: String, text: String) -> Self {
        Self {
            generation,
            kind,
            tag,
            text,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            size: Size::ZERO,
            parent: None,
            children: Vec::new(),
        }
    }

    fn class_name(&self) -> Option<String> {
        (!self.classes.is_empty()).then(|| self.classes.join(" "))
    }

    fn style_text(&self) -> Option<String> {
        if self.style.is_empty() {
            return None;
        }
        let mut out = String::new();
        for (k, v) in &self.style {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(k);
            out.push_str(": ");
            out.push_str(v);
            out.push(';');
        }
        Some(out)
    }
}

#[derive(Clone, Debug)]
struct Observer {
    target: NodeId,
    options: ObserveOptions,
    queue: Vec<MutationRecord>,
}

/// A headless element tree mirroring the host document.
///
/// Every operation taking a [`NodeId`] tolerates stale or detached ids:
/// queries return empty results and updates return `false`. The host DOM can
/// change under any handler at any time, and callers treat that as a normal
/// condition rather than an error.
pub struct Document {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    observers: HashMap<ObserverId, Observer>,
    next_observer: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Creates a document containing only its root (`<html>`) element.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 0),
            observers: HashMap::new(),
            next_observer: 1,
        };
        doc.root = doc.alloc(NodeKind::Element, "html".to_owned(), String::new());
        doc
    }

    /// Returns the root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    // --- Structure -------------------------------------------------------

    /// Creates a detached element. Tags are stored lowercase.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element, tag.to_ascii_lowercase(), String::new())
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text, "#text".to_owned(), text.to_owned())
    }

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Returns the kind of a live node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    /// Returns the lowercase tag of a live element.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id)
            .filter(|n| n.kind == NodeKind::Element)
            .map(|n| n.tag.as_str())
    }

    /// Returns the parent of a node, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Returns the children of a node in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    /// Returns `true` if the node is attached under the root.
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// Iterates the ancestors of a node, nearest first (excluding the node).
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Returns the descendants of a node in pre-order (excluding the node).
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// An attached `child` is moved (a removal record is queued on its old
    /// parent first). Returns `false` if either node is dead, `parent` is not
    /// an element, or the insertion would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` under `parent` before `reference` (or last if `None`).
    ///
    /// Returns `false` if `reference` is not a child of `parent`, in addition
    /// to the failure cases of [`Document::append_child`].
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> bool {
        if self.kind(parent) != Some(NodeKind::Element) || !self.is_alive(child) {
            return false;
        }
        if self.contains(child, parent) {
            return false;
        }
        if let Some(r) = reference
            && (r == child || self.parent(r) != Some(parent))
        {
            return false;
        }
        self.detach(child);
        let Some(p) = self.node_mut(parent) else {
            return false;
        };
        let at = reference
            .and_then(|r| p.children.iter().position(|&c| c == r))
            .unwrap_or(p.children.len());
        p.children.insert(at, child);
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        self.queue(MutationRecord {
            target: parent,
            kind: MutationKind::ChildList {
                added: smallvec![child],
                removed: smallvec![],
            },
        });
        true
    }

    /// Detaches a node from its parent. The node stays alive and can be
    /// re-inserted. Returns `false` if it was not attached.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.detach(id)
    }

    /// Detaches a node and frees it and its whole subtree.
    ///
    /// Ids into the freed subtree become stale.
    pub fn destroy(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes[next.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(next.idx());
            }
        }
    }

    // --- Classes, attributes, style ---------------------------------------

    /// Returns the sorted class list of an element.
    #[must_use]
    pub fn classes(&self, id: NodeId) -> &[String] {
        self.node(id).map_or(&[], |n| n.classes.as_slice())
    }

    /// Returns `true` if the element carries `class`.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|n| {
            n.classes
                .binary_search_by(|c| c.as_str().cmp(class))
                .is_ok()
        })
    }

    /// Adds a class. Returns `true` if the class list changed.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        let had = self.has_class(id, class);
        !had && self.toggle_class(id, class, Some(true))
    }

    /// Removes a class. Returns `true` if the class list changed.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        let had = self.has_class(id, class);
        self.toggle_class(id, class, Some(false));
        had
    }

    /// Toggles a class, or forces it on/off with `force`.
    ///
    /// Returns whether the class is present afterwards.
    pub fn toggle_class(&mut self, id: NodeId, class: &str, force: Option<bool>) -> bool {
        if class.is_empty() || self.kind(id) != Some(NodeKind::Element) {
            return false;
        }
        let present = self.has_class(id, class);
        let want = force.unwrap_or(!present);
        if want == present {
            return present;
        }
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let old_value = node.class_name();
        match node.classes.binary_search_by(|c| c.as_str().cmp(class)) {
            Ok(at) => {
                node.classes.remove(at);
            }
            Err(at) => node.classes.insert(at, class.to_owned()),
        }
        self.queue(MutationRecord {
            target: id,
            kind: MutationKind::Attribute {
                name: "class".to_owned(),
                old_value,
            },
        });
        want
    }

    /// Returns an attribute value. `class` and `style` are synthesized from
    /// the class list and style properties.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<Cow<'_, str>> {
        let node = self.node(id)?;
        match name {
            "class" => node.class_name().map(Cow::Owned),
            "style" => node.style_text().map(Cow::Owned),
            _ => node.attributes.get(name).map(|v| Cow::Borrowed(v.as_str())),
        }
    }

    /// Iterates the plain attributes (everything but `class` and `style`) in
    /// name order.
    pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.node(id).into_iter().flat_map(|n| {
            n.attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
        })
    }

    /// Sets an attribute. Returns `true` if the value changed.
    ///
    /// Setting `class` replaces the class list; setting `style` replaces all
    /// style properties.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        if self.kind(id) != Some(NodeKind::Element) {
            return false;
        }
        let old_value = self.attribute(id, name).map(Cow::into_owned);
        if old_value.as_deref() == Some(value) {
            return false;
        }
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        match name {
            "class" => {
                let mut classes: Vec<String> =
                    value.split_whitespace().map(str::to_owned).collect();
                classes.sort();
                classes.dedup();
                node.classes = classes;
            }
            "style" => node.style = parse_style(value),
            _ => {
                node.attributes.insert(name.to_owned(), value.to_owned());
            }
        }
        self.queue(MutationRecord {
            target: id,
            kind: MutationKind::Attribute {
                name: name.to_owned(),
                old_value,
            },
        });
        true
    }

    /// Removes an attribute. Returns `true` if it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let Some(old_value) = self.attribute(id, name).map(Cow::into_owned) else {
            return false;
        };
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        match name {
            "class" => node.classes.clear(),
            "style" => node.style.clear(),
            _ => {
                node.attributes.remove(name);
            }
        }
        self.queue(MutationRecord {
            target: id,
            kind: MutationKind::Attribute {
                name: name.to_owned(),
                old_value: Some(old_value),
            },
        });
        true
    }

    /// Returns an inline style property.
    #[must_use]
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.style.get(property))
            .map(String::as_str)
    }

    /// Sets an inline style property. Returns `true` if it changed.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> bool {
        if self.kind(id) != Some(NodeKind::Element) || self.style(id, property) == Some(value) {
            return false;
        }
        let old_value = self.attribute(id, "style").map(Cow::into_owned);
        if let Some(node) = self.node_mut(id) {
            node.style.insert(property.to_owned(), value.to_owned());
        }
        self.queue_style_change(id, old_value);
        true
    }

    /// Removes an inline style property. Returns `true` if it was present.
    pub fn remove_style(&mut self, id: NodeId, property: &str) -> bool {
        if self.style(id, property).is_none() {
            return false;
        }
        let old_value = self.attribute(id, "style").map(Cow::into_owned);
        if let Some(node) = self.node_mut(id) {
            node.style.remove(property);
        }
        self.queue_style_change(id, old_value);
        true
    }

    // --- Layout and text ----------------------------------------------------

    /// Returns the host-reported layout size (zero for dead nodes).
    #[must_use]
    pub fn size(&self, id: NodeId) -> Size {
        self.node(id).map_or(Size::ZERO, |n| n.size)
    }

    /// Records a new layout size reported by the host.
    ///
    /// Queues a resize record if the size changed.
    pub fn set_size(&mut self, id: NodeId, size: Size) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if node.size == size {
            return false;
        }
        let old = node.size;
        node.size = size;
        self.queue(MutationRecord {
            target: id,
            kind: MutationKind::Resize { old, new: size },
        });
        true
    }

    /// Returns the text of a text node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id)
            .filter(|n| n.kind == NodeKind::Text)
            .map(|n| n.text.as_str())
    }

    /// Concatenates the text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_owned();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.text(d))
            .collect()
    }

    // --- Selectors --------------------------------------------------------

    /// Returns `true` if the element matches any selector in the list.
    #[must_use]
    pub fn matches(&self, id: NodeId, selectors: &SelectorList) -> bool {
        selectors.matches(self, id)
    }

    /// Returns the first descendant (pre-order, excluding `scope`) matching.
    #[must_use]
    pub fn query_selector(&self, scope: NodeId, selectors: &SelectorList) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&d| selectors.matches(self, d))
    }

    /// Returns all descendants (pre-order, excluding `scope`) matching.
    #[must_use]
    pub fn query_selector_all(&self, scope: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&d| selectors.matches(self, d))
            .collect()
    }

    /// Returns the nearest inclusive ancestor matching.
    #[must_use]
    pub fn closest(&self, id: NodeId, selectors: &SelectorList) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        core::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&a| selectors.matches(self, a))
    }

    // --- Observation ------------------------------------------------------

    /// Starts observing `target`. Records are queued from now on.
    pub fn observe(&mut self, target: NodeId, options: ObserveOptions) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.insert(
            id,
            Observer {
                target,
                options,
                queue: Vec::new(),
            },
        );
        id
    }

    /// Stops an observer and drops its pending records.
    ///
    /// Returns `false` if it was already disconnected, so double disconnects
    /// are harmless.
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        self.observers.remove(&id).is_some()
    }

    /// Returns `true` if the observer is still connected.
    #[must_use]
    pub fn is_observing(&self, id: ObserverId) -> bool {
        self.observers.contains_key(&id)
    }

    /// Returns the number of connected observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Returns `true` if any observer has queued records.
    #[must_use]
    pub fn has_pending_records(&self) -> bool {
        self.observers.values().any(|o| !o.queue.is_empty())
    }

    /// Drains the queued records of every observer, in creation order.
    pub fn take_records(&mut self) -> Vec<(ObserverId, Vec<MutationRecord>)> {
        let mut out: Vec<(ObserverId, Vec<MutationRecord>)> = self
            .observers
            .iter_mut()
            .filter(|(_, o)| !o.queue.is_empty())
            .map(|(&id, o)| (id, core::mem::take(&mut o.queue)))
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    /// Drains the queued records of one observer.
    pub fn take_records_for(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .get_mut(&id)
            .map(|o| core::mem::take(&mut o.queue))
            .unwrap_or_default()
    }

    // --- Internals --------------------------------------------------------

    fn alloc(&mut self, kind: NodeKind, tag: String, text: String) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, kind, tag, text));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            NodeId::new(idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, kind, tag, text)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            NodeId::new((self.nodes.len() - 1) as u32, generation)
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.generation())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.generation())
    }

    fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
        self.queue(MutationRecord {
            target: parent,
            kind: MutationKind::ChildList {
                added: smallvec![],
                removed: smallvec![id],
            },
        });
        true
    }

    fn queue_style_change(&mut self, id: NodeId, old_value: Option<String>) {
        self.queue(MutationRecord {
            target: id,
            kind: MutationKind::Attribute {
                name: "style".to_owned(),
                old_value,
            },
        });
    }

    fn queue(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let interested: Vec<ObserverId> = self
            .observers
            .iter()
            .filter(|(_, o)| {
                o.options.wants(&record.kind)
                    && (o.target == record.target
                        || (o.options.subtree && self.contains(o.target, record.target)))
            })
            .map(|(&id, _)| id)
            .collect();
        for id in interested {
            if let Some(o) = self.observers.get_mut(&id) {
                o.queue.push(record.clone());
            }
        }
    }
}

fn parse_style(text: &str) -> BTreeMap<String, String> {
    text.split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let (k, v) = (k.trim(), v.trim());
            (!k.is_empty()).then(|| (k.to_owned(), v.to_owned()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(doc: &mut Document, parent: NodeId, tag: &str) -> NodeId {
        let id = doc.create_element(tag);
        assert!(doc.append_child(parent, id));
        id
    }

    #[test]
    fn destroy_makes_ids_stale_and_reuses_slots() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = el(&mut doc, root, "div");
        let b = el(&mut doc, a, "span");
        doc.destroy(a);
        assert!(!doc.is_alive(a));
        assert!(!doc.is_alive(b));
        assert!(doc.children(root).is_empty());

        let c = doc.create_element("p");
        assert!(doc.is_alive(c));
        assert_ne!(c, a);
        assert_ne!(c, b);
        // Stale ids never alias the reused slot.
        assert_eq!(doc.tag(a), None);
        assert_eq!(doc.tag(b), None);
    }

    #[test]
    fn insert_before_orders_children_and_rejects_cycles() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = el(&mut doc, root, "a");
        let c = el(&mut doc, root, "c");
        let b = doc.create_element("b");
        assert!(doc.insert_before(root, b, Some(c)));
        assert_eq!(doc.children(root), &[a, b, c]);

        // Cannot insert an ancestor under its descendant.
        let inner = el(&mut doc, a, "i");
        assert!(!doc.append_child(inner, a));
        // Reference must be a child of the parent.
        let x = doc.create_element("x");
        assert!(!doc.insert_before(a, x, Some(c)));
    }

    #[test]
    fn moving_a_node_queues_remove_then_add() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = el(&mut doc, root, "div");
        let b = el(&mut doc, root, "div");
        let child = el(&mut doc, a, "svg");
        let obs = doc.observe(root, ObserveOptions::child_list_subtree());

        assert!(doc.append_child(b, child));
        let records = doc.take_records_for(obs);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].target, a);
        assert_eq!(records[0].removed_nodes(), &[child]);
        assert_eq!(records[1].target, b);
        assert_eq!(records[1].added_nodes(), &[child]);
    }

    #[test]
    fn observers_only_see_their_scope_and_kinds() {
        let mut doc = Document::new();
        let root = doc.root();
        let scope = el(&mut doc, root, "section");
        let outside = el(&mut doc, root, "aside");
        let shallow = doc.observe(scope, ObserveOptions::class_attribute());
        let deep = doc.observe(scope, ObserveOptions::child_list_subtree());

        let inner = el(&mut doc, scope, "div");
        el(&mut doc, outside, "div");
        doc.add_class(inner, "x");
        doc.add_class(scope, "folded");

        let batches = doc.take_records();
        assert_eq!(batches.len(), 2);
        // Creation order.
        assert_eq!(batches[0].0, shallow);
        assert_eq!(batches[0].1.len(), 1);
        assert_eq!(batches[0].1[0].target, scope);
        assert_eq!(batches[1].0, deep);
        assert_eq!(batches[1].1.len(), 1);
        assert_eq!(batches[1].1[0].added_nodes(), &[inner]);
    }

    #[test]
    fn disconnect_drops_pending_records() {
        let mut doc = Document::new();
        let root = doc.root();
        let obs = doc.observe(root, ObserveOptions::child_list_subtree());
        el(&mut doc, root, "div");
        assert!(doc.has_pending_records());
        assert!(doc.disconnect(obs));
        assert!(!doc.disconnect(obs));
        assert!(!doc.has_pending_records());
        assert!(doc.take_records().is_empty());
        assert_eq!(doc.observer_count(), 0);
    }

    #[test]
    fn class_attribute_and_style_round_trip() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = el(&mut doc, root, "div");
        assert!(doc.add_class(a, "b"));
        assert!(doc.add_class(a, "a"));
        assert!(!doc.add_class(a, "a"));
        assert_eq!(doc.attribute(a, "class").as_deref(), Some("a b"));
        assert!(doc.remove_class(a, "b"));
        assert!(!doc.remove_class(a, "b"));
        assert!(!doc.toggle_class(a, "a", None));
        assert!(doc.classes(a).is_empty());

        assert!(doc.set_style(a, "width", "400px"));
        assert!(doc.set_style(a, "height", "300px"));
        assert_eq!(
            doc.attribute(a, "style").as_deref(),
            Some("height: 300px; width: 400px;")
        );
        assert!(doc.set_attribute(a, "style", "transform: scale(2)"));
        assert_eq!(doc.style(a, "transform"), Some("scale(2)"));
        assert_eq!(doc.style(a, "width"), None);

        assert!(doc.set_attribute(a, "tabindex", "0"));
        assert!(!doc.set_attribute(a, "tabindex", "0"));
        assert!(doc.remove_attribute(a, "tabindex"));
        assert_eq!(doc.attribute(a, "tabindex"), None);
    }

    #[test]
    fn resize_records_only_on_change() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = el(&mut doc, root, "div");
        let obs = doc.observe(a, ObserveOptions::size());
        assert!(doc.set_size(a, Size::new(10.0, 20.0)));
        assert!(!doc.set_size(a, Size::new(10.0, 20.0)));
        let records = doc.take_records_for(obs);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].kind,
            MutationKind::Resize {
                old: Size::ZERO,
                new: Size::new(10.0, 20.0)
            }
        );
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = el(&mut doc, root, "p");
        let t1 = doc.create_text("graph ");
        let t2 = doc.create_text("TD");
        doc.append_child(p, t1);
        let b = el(&mut doc, p, "b");
        doc.append_child(b, t2);
        assert_eq!(doc.text_content(p), "graph TD");
        assert!(doc.is_connected(t2));
        assert!(!doc.append_child(t1, b), "text nodes have no children");
    }
}
