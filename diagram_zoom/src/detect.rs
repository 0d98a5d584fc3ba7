// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detection of rendered diagrams.
//!
//! A root *matches* when it contains (or is) an element matching an enabled
//! descriptor selector, and that element holds a rendered `<svg>` or `<img>`.
//! Descriptors are tried in list order and the first one with a rendered
//! candidate wins.
//!
//! Rendering is asynchronous, so a root that does not match yet gets a
//! bounded [`DetectionWindow`]: a child-list observer on the root that is
//! re-checked on every batch of records. A window moves from
//! [`DetectionState::Watching`] to [`DetectionState::Matched`] on the first
//! match or to [`DetectionState::TimedOut`] once its deadline passes, and is
//! then disconnected by [`Detector::settle`]. Closing a leaf's windows
//! cancels them without a verdict.

use diagram_zoom_dom::{Document, NodeId, ObserveOptions, ObserverId};

use crate::factory::{CONTAINER_CLASS, CONTENT_CLASS};
use crate::host::LeafId;
use crate::settings::Matcher;

/// How long a detection window waits for a diagram to render.
pub const DETECTION_TIMEOUT_MS: u64 = 5000;

/// A rendered diagram element and the descriptor that matched it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Match {
    /// The element matching the descriptor selector.
    pub element: NodeId,
    /// Index of the descriptor in the settings list.
    pub descriptor: usize,
}

/// State of one detection window.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DetectionState {
    /// Waiting for mutations or the deadline.
    Watching,
    /// A diagram rendered.
    Matched(Match),
    /// Nothing rendered in time.
    TimedOut,
}

/// A bounded observation of one root.
#[derive(Clone, Debug)]
pub(crate) struct DetectionWindow {
    pub(crate) leaf: LeafId,
    pub(crate) root: NodeId,
    pub(crate) observer: ObserverId,
    pub(crate) deadline: u64,
    pub(crate) state: DetectionState,
}

/// Returns `true` if `node` is or contains a rendered `<svg>` or `<img>`.
fn has_payload(doc: &Document, node: NodeId) -> bool {
    payload(doc, node).is_some()
}

/// Returns the first rendered `<svg>` or `<img>` at or below `node`.
pub(crate) fn payload(doc: &Document, node: NodeId) -> Option<NodeId> {
    let is_payload = |n: NodeId| matches!(doc.tag(n), Some("svg" | "img"));
    if is_payload(node) {
        return Some(node);
    }
    doc.descendants(node).into_iter().find(|&n| is_payload(n))
}

/// Returns `true` if `element` is already the content of a container, or
/// sits anywhere inside one.
pub(crate) fn is_wrapped(doc: &Document, element: NodeId) -> bool {
    doc.has_class(element, CONTENT_CLASS)
        || doc.ancestors(element).any(|n| doc.has_class(n, CONTAINER_CLASS))
}

/// Returns `true` if `root` is, holds, or sits inside a wrapped diagram.
pub(crate) fn contains_wrapped(doc: &Document, root: NodeId) -> bool {
    is_wrapped(doc, root)
        || doc
            .descendants(root)
            .into_iter()
            .any(|n| doc.has_class(n, CONTENT_CLASS))
}

/// Finds the first unwrapped diagram inside `root`, root included.
pub(crate) fn find_match(doc: &Document, root: NodeId, matchers: &[Matcher]) -> Option<Match> {
    find_matches(doc, root, matchers).into_iter().next()
}

/// Finds every unwrapped diagram inside `root`, root included.
///
/// Each element takes the first descriptor that selects it. Elements nested
/// in or around an earlier match are skipped, so one diagram is never
/// wrapped twice.
pub(crate) fn find_matches(doc: &Document, root: NodeId, matchers: &[Matcher]) -> Vec<Match> {
    let mut out: Vec<Match> = Vec::new();
    if !doc.is_alive(root) {
        return out;
    }
    for m in matchers {
        let own = doc.matches(root, &m.selector).then_some(root);
        for element in own.into_iter().chain(doc.query_selector_all(root, &m.selector)) {
            let overlaps = out.iter().any(|prev| {
                doc.contains(prev.element, element) || doc.contains(element, prev.element)
            });
            if overlaps || is_wrapped(doc, element) || !has_payload(doc, element) {
                continue;
            }
            out.push(Match {
                element,
                descriptor: m.index,
            });
        }
    }
    out
}

/// Tracks every open detection window.
#[derive(Debug, Default)]
pub(crate) struct Detector {
    windows: Vec<DetectionWindow>,
}

impl Detector {
    /// Opens a window on `root`, or returns the one already watching it.
    pub(crate) fn open(
        &mut self,
        doc: &mut Document,
        leaf: LeafId,
        root: NodeId,
        now: u64,
    ) -> ObserverId {
        if let Some(w) = self
            .windows
            .iter()
            .find(|w| w.root == root && w.state == DetectionState::Watching)
        {
            return w.observer;
        }
        let observer = doc.observe(root, ObserveOptions::child_list_subtree());
        tracing::trace!(%leaf, ?root, "detection window opened");
        self.windows.push(DetectionWindow {
            leaf,
            root,
            observer,
            deadline: now.saturating_add(DETECTION_TIMEOUT_MS),
            state: DetectionState::Watching,
        });
        observer
    }

    pub(crate) fn owns(&self, observer: ObserverId) -> bool {
        self.windows.iter().any(|w| w.observer == observer)
    }

    /// Re-checks the root of `observer` after it saw mutations.
    pub(crate) fn on_records(&mut self, doc: &Document, observer: ObserverId, matchers: &[Matcher]) {
        if let Some(w) = self
            .windows
            .iter_mut()
            .find(|w| w.observer == observer && w.state == DetectionState::Watching)
            && let Some(m) = find_match(doc, w.root, matchers)
        {
            w.state = DetectionState::Matched(m);
        }
    }

    /// Times out every watching window whose deadline is at or before `now`.
    pub(crate) fn expire(&mut self, now: u64) {
        for w in &mut self.windows {
            if w.state == DetectionState::Watching && now >= w.deadline {
                w.state = DetectionState::TimedOut;
            }
        }
    }

    /// Disconnects settled windows and returns the matches among them, with
    /// the root each window watched.
    pub(crate) fn settle(&mut self, doc: &mut Document) -> Vec<(LeafId, NodeId, Match)> {
        let mut matches = Vec::new();
        self.windows.retain(|w| match w.state {
            DetectionState::Watching => true,
            DetectionState::Matched(m) => {
                doc.disconnect(w.observer);
                tracing::debug!(leaf = %w.leaf, element = ?m.element, "diagram detected");
                matches.push((w.leaf, w.root, m));
                false
            }
            DetectionState::TimedOut => {
                doc.disconnect(w.observer);
                tracing::debug!(leaf = %w.leaf, root = ?w.root, "detection timed out");
                false
            }
        });
        matches
    }

    /// Cancels the windows of one leaf.
    pub(crate) fn close_leaf(&mut self, doc: &mut Document, leaf: LeafId) {
        self.windows.retain(|w| {
            if w.leaf == leaf {
                doc.disconnect(w.observer);
                false
            } else {
                true
            }
        });
    }

    /// Cancels every window.
    pub(crate) fn close_all(&mut self, doc: &mut Document) {
        for w in self.windows.drain(..) {
            doc.disconnect(w.observer);
        }
    }

    /// Number of open windows.
    pub(crate) fn len(&self) -> usize {
        self.windows.len()
    }
}
