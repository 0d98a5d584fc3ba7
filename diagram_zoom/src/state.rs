// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-leaf, per-container interaction state.
//!
//! [`TransformState`] maps each tracked leaf to a [`LeafContext`], and each
//! leaf context maps container ids to [`ContainerState`]. One container at a
//! time is *active*: the one the user interacted with last. Field reads and
//! writes without an explicit container go to the active one; with no active
//! container, reads return defaults and writes are ignored.
//!
//! ```
//! use diagram_zoom::state::{Field, FieldValue, TransformState};
//!
//! let mut state = TransformState::new();
//! assert_eq!(state.get(Field::Scale), FieldValue::Number(1.0));
//! assert!(!state.set(Field::Dx, FieldValue::Number(10.0)));
//! assert_eq!(state.get(Field::Dx), FieldValue::Number(0.0));
//! ```

use hashbrown::HashMap;
use kurbo::{Size, Vec2};

use diagram_zoom_dom::{Document, NodeId, ObserverId, SubscriptionId};
use diagram_zoom_event_state::drag::DragState;
use diagram_zoom_event_state::pinch::PinchState;
use diagram_zoom_event_state::visibility::PanelVisibility;
use diagram_zoom_view::DiagramTransform;

use crate::host::{LeafId, ViewMode};
use crate::id::ContainerId;
use crate::panels::PanelKind;

/// Source text reported when no container is active.
pub const DEFAULT_SOURCE: &str = "No source available";

/// Panel elements attached to a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelHandles {
    /// Move panel.
    pub move_panel: Option<NodeId>,
    /// Zoom panel.
    pub zoom: Option<NodeId>,
    /// Fold panel.
    pub fold: Option<NodeId>,
    /// Service panel.
    pub service: Option<NodeId>,
}

impl PanelHandles {
    /// Returns the panel element of `kind`, if created.
    #[must_use]
    pub fn get(&self, kind: PanelKind) -> Option<NodeId> {
        match kind {
            PanelKind::Move => self.move_panel,
            PanelKind::Zoom => self.zoom,
            PanelKind::Fold => self.fold,
            PanelKind::Service => self.service,
        }
    }

    pub(crate) fn set(&mut self, kind: PanelKind, node: NodeId) {
        let slot = match kind {
            PanelKind::Move => &mut self.move_panel,
            PanelKind::Zoom => &mut self.zoom,
            PanelKind::Fold => &mut self.fold,
            PanelKind::Service => &mut self.service,
        };
        *slot = Some(node);
    }

    /// Iterates the created panels.
    pub fn iter(&self) -> impl Iterator<Item = (PanelKind, NodeId)> + '_ {
        PanelKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|node| (kind, node)))
    }
}

/// Names of the independently gettable and settable container fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Horizontal pan offset in pixels.
    Dx,
    /// Vertical pan offset in pixels.
    Dy,
    /// Zoom scale.
    Scale,
    /// Whether touches are left to the host.
    NativeTouch,
    /// Captured block source.
    Source,
    /// Fold state.
    Folded,
    /// Attached panel elements.
    Panels,
}

/// A typed field value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// `Dx`, `Dy` and `Scale`.
    Number(f64),
    /// `NativeTouch` and `Folded`.
    Flag(bool),
    /// `Source`.
    Text(String),
    /// `Panels`.
    Panels(PanelHandles),
}

impl FieldValue {
    /// Returns the number, if this is one.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag, if this is one.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl Field {
    /// Value read when no container is active.
    #[must_use]
    pub fn default_value(self) -> FieldValue {
        match self {
            Self::Dx | Self::Dy => FieldValue::Number(0.0),
            Self::Scale => FieldValue::Number(1.0),
            Self::NativeTouch => FieldValue::Flag(true),
            Self::Source => FieldValue::Text(DEFAULT_SOURCE.to_owned()),
            Self::Folded => FieldValue::Flag(false),
            Self::Panels => FieldValue::Panels(PanelHandles::default()),
        }
    }
}

/// Expanded and folded container sizes in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerSizes {
    /// Size while expanded.
    pub expanded: Size,
    /// Size while folded.
    pub folded: Size,
}

/// One wrapped diagram.
#[derive(Clone, Debug)]
pub struct ContainerState {
    pub(crate) id: ContainerId,
    pub(crate) leaf: LeafId,
    pub(crate) descriptor: String,
    pub(crate) mode: ViewMode,
    pub(crate) node: NodeId,
    pub(crate) content: NodeId,
    pub(crate) transform: DiagramTransform,
    pub(crate) native_touch: bool,
    pub(crate) source: String,
    pub(crate) folded: bool,
    pub(crate) panels: PanelHandles,
    pub(crate) sizes: ContainerSizes,
    pub(crate) fullscreen: bool,
    pub(crate) visibility: PanelVisibility,
    pub(crate) panels_visible: bool,
    pub(crate) drag: DragState,
    pub(crate) pinch: PinchState,
    pub(crate) fold_subscription: Option<SubscriptionId>,
}

impl ContainerState {
    pub(crate) fn new(
        id: ContainerId,
        leaf: LeafId,
        descriptor: String,
        mode: ViewMode,
        node: NodeId,
        content: NodeId,
        source: String,
        sizes: ContainerSizes,
        hide_on_mouse_out: bool,
    ) -> Self {
        let visibility = PanelVisibility::new(hide_on_mouse_out);
        Self {
            id,
            leaf,
            descriptor,
            mode,
            node,
            content,
            transform: DiagramTransform::IDENTITY,
            native_touch: false,
            source,
            folded: false,
            panels: PanelHandles::default(),
            sizes,
            fullscreen: false,
            panels_visible: visibility.visible(),
            visibility,
            drag: DragState::default(),
            pinch: PinchState::default(),
            fold_subscription: None,
        }
    }

    /// Container id.
    #[must_use]
    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    /// Owning leaf.
    #[must_use]
    pub fn leaf(&self) -> LeafId {
        self.leaf
    }

    /// Name of the descriptor that matched.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Rendering mode of the owning leaf when the container was created.
    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// The container element.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The wrapped diagram element.
    #[must_use]
    pub fn content(&self) -> NodeId {
        self.content
    }

    /// Current pan and zoom.
    #[must_use]
    pub fn transform(&self) -> DiagramTransform {
        self.transform
    }

    /// Whether touches are left to the host.
    #[must_use]
    pub fn native_touch(&self) -> bool {
        self.native_touch
    }

    /// Captured block source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Fold state as last synchronized from the container's class list.
    #[must_use]
    pub fn folded(&self) -> bool {
        self.folded
    }

    /// Attached panels.
    #[must_use]
    pub fn panels(&self) -> PanelHandles {
        self.panels
    }

    /// Expanded and folded sizes.
    #[must_use]
    pub fn sizes(&self) -> ContainerSizes {
        self.sizes
    }

    /// Whether the container is fullscreen.
    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Whether non-fold panels are currently shown.
    #[must_use]
    pub fn panels_visible(&self) -> bool {
        self.panels_visible
    }

    /// Whether a mouse or one-finger drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Reads a field.
    #[must_use]
    pub fn get(&self, field: Field) -> FieldValue {
        let t = self.transform;
        match field {
            Field::Dx => FieldValue::Number(t.translate().x),
            Field::Dy => FieldValue::Number(t.translate().y),
            Field::Scale => FieldValue::Number(t.scale()),
            Field::NativeTouch => FieldValue::Flag(self.native_touch),
            Field::Source => FieldValue::Text(self.source.clone()),
            Field::Folded => FieldValue::Flag(self.folded),
            Field::Panels => FieldValue::Panels(self.panels),
        }
    }

    /// Writes a field. Returns `false` if the value has the wrong type.
    ///
    /// Writes only touch state; applying the transform to the document is
    /// up to the caller. `Folded` is not writable here: fold state follows
    /// the container's class, so it is changed through
    /// [`DiagramZoom::set_field`](crate::DiagramZoom::set_field).
    pub fn set(&mut self, field: Field, value: FieldValue) -> bool {
        match (field, value) {
            (Field::Dx, FieldValue::Number(x)) => {
                let y = self.transform.translate().y;
                self.transform.set_translate(Vec2::new(x, y));
            }
            (Field::Dy, FieldValue::Number(y)) => {
                let x = self.transform.translate().x;
                self.transform.set_translate(Vec2::new(x, y));
            }
            (Field::Scale, FieldValue::Number(s)) => self.transform.set_scale(s),
            (Field::NativeTouch, FieldValue::Flag(b)) => self.native_touch = b,
            (Field::Source, FieldValue::Text(t)) => self.source = t,
            (Field::Panels, FieldValue::Panels(p)) => self.panels = p,
            _ => return false,
        }
        true
    }
}

/// One host document view and its containers.
#[derive(Clone, Debug)]
pub struct LeafContext {
    leaf: LeafId,
    pub(crate) mode: ViewMode,
    pub(crate) content_root: Option<NodeId>,
    pub(crate) live_observer: Option<ObserverId>,
    pub(crate) containers: HashMap<ContainerId, ContainerState>,
}

impl LeafContext {
    fn new(leaf: LeafId, mode: ViewMode) -> Self {
        Self {
            leaf,
            mode,
            content_root: None,
            live_observer: None,
            containers: HashMap::new(),
        }
    }

    /// Leaf id.
    #[must_use]
    pub fn leaf(&self) -> LeafId {
        self.leaf
    }

    /// Current rendering mode.
    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// The live-edit observer owned by this leaf.
    #[must_use]
    pub fn live_observer(&self) -> Option<ObserverId> {
        self.live_observer
    }

    /// Returns a container by id.
    #[must_use]
    pub fn container(&self, id: &ContainerId) -> Option<&ContainerState> {
        self.containers.get(id)
    }

    /// Iterates the containers in no particular order.
    pub fn containers(&self) -> impl Iterator<Item = &ContainerState> + '_ {
        self.containers.values()
    }

    /// Number of containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Returns `true` if the leaf has no containers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

/// All tracked leaves plus the active container pointer.
#[derive(Clone, Debug, Default)]
pub struct TransformState {
    leaves: HashMap<LeafId, LeafContext>,
    active: Option<(LeafId, ContainerId)>,
}

impl TransformState {
    /// Creates empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the context of `leaf`, creating it on first use.
    pub fn ensure_leaf(&mut self, leaf: LeafId, mode: ViewMode) -> &mut LeafContext {
        let ctx = self
            .leaves
            .entry(leaf)
            .or_insert_with(|| LeafContext::new(leaf, mode));
        ctx.mode = mode;
        ctx
    }

    /// Returns a leaf context.
    #[must_use]
    pub fn leaf(&self, leaf: LeafId) -> Option<&LeafContext> {
        self.leaves.get(&leaf)
    }

    pub(crate) fn leaf_mut(&mut self, leaf: LeafId) -> Option<&mut LeafContext> {
        self.leaves.get_mut(&leaf)
    }

    /// Returns the tracked leaf ids, sorted.
    #[must_use]
    pub fn leaf_ids(&self) -> Vec<LeafId> {
        let mut ids: Vec<LeafId> = self.leaves.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Total number of containers across leaves.
    #[must_use]
    pub fn container_count(&self) -> usize {
        self.leaves.values().map(LeafContext::len).sum()
    }

    /// Returns a container.
    #[must_use]
    pub fn container(&self, leaf: LeafId, id: &ContainerId) -> Option<&ContainerState> {
        self.leaves.get(&leaf)?.containers.get(id)
    }

    pub(crate) fn container_mut(
        &mut self,
        leaf: LeafId,
        id: &ContainerId,
    ) -> Option<&mut ContainerState> {
        self.leaves.get_mut(&leaf)?.containers.get_mut(id)
    }

    /// Finds the container whose element is `node`.
    #[must_use]
    pub fn find_by_node(&self, node: NodeId) -> Option<(LeafId, ContainerId)> {
        self.leaves.values().find_map(|ctx| {
            ctx.containers
                .values()
                .find(|c| c.node == node)
                .map(|c| (c.leaf, c.id.clone()))
        })
    }

    /// Registers a container, returning the one it replaces.
    ///
    /// The leaf must already be tracked; otherwise the container is handed
    /// back unchanged in `Err`.
    pub(crate) fn insert(
        &mut self,
        container: ContainerState,
    ) -> Result<Option<ContainerState>, ContainerState> {
        match self.leaves.get_mut(&container.leaf) {
            Some(ctx) => Ok(ctx.containers.insert(container.id.clone(), container)),
            None => Err(container),
        }
    }

    /// Makes a container the target of implicit reads and writes.
    ///
    /// Returns `false` (and leaves the pointer unchanged) if the container is
    /// not tracked.
    pub fn set_active(&mut self, leaf: LeafId, id: &ContainerId) -> bool {
        if self.container(leaf, id).is_none() {
            return false;
        }
        self.active = Some((leaf, id.clone()));
        true
    }

    /// Returns the active container's address.
    #[must_use]
    pub fn active_id(&self) -> Option<(LeafId, &ContainerId)> {
        self.active.as_ref().map(|(leaf, id)| (*leaf, id))
    }

    /// Returns the active container.
    #[must_use]
    pub fn active(&self) -> Option<&ContainerState> {
        let (leaf, id) = self.active.as_ref()?;
        self.container(*leaf, id)
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut ContainerState> {
        let (leaf, id) = self.active.clone()?;
        self.container_mut(leaf, &id)
    }

    /// Reads a field of the active container, or its default.
    #[must_use]
    pub fn get(&self, field: Field) -> FieldValue {
        self.active()
            .map_or_else(|| field.default_value(), |c| c.get(field))
    }

    /// Writes a field of the active container.
    ///
    /// Returns `false` if there is no active container, the value has the
    /// wrong type, or the field is `Folded`; nothing is written then. The
    /// document is not touched; [`DiagramZoom::set_field`](crate::DiagramZoom::set_field)
    /// writes and applies.
    pub fn set(&mut self, field: Field, value: FieldValue) -> bool {
        self.active_mut().is_some_and(|c| c.set(field, value))
    }

    /// Reads a field of an explicit container, or its default.
    #[must_use]
    pub fn get_in(&self, leaf: LeafId, id: &ContainerId, field: Field) -> FieldValue {
        self.container(leaf, id)
            .map_or_else(|| field.default_value(), |c| c.get(field))
    }

    /// Removes containers of `leaf` whose id encodes a creation time other
    /// than `ctime`.
    pub fn cleanup_containers(&mut self, leaf: LeafId, ctime: u64) -> Vec<ContainerState> {
        let Some(ctx) = self.leaves.get_mut(&leaf) else {
            return Vec::new();
        };
        let stale: Vec<ContainerId> = ctx
            .containers
            .keys()
            .filter(|id| id.ctime() != Some(ctime))
            .cloned()
            .collect();
        let removed: Vec<ContainerState> = stale
            .iter()
            .filter_map(|id| ctx.containers.remove(id))
            .collect();
        self.drop_active_if_gone();
        removed
    }

    /// Forgets a leaf: disconnects its live observer and drops its
    /// containers, which are returned so the caller can release what they
    /// hold.
    pub fn cleanup_data(&mut self, doc: &mut Document, leaf: LeafId) -> Option<LeafContext> {
        let mut ctx = self.leaves.remove(&leaf)?;
        if let Some(observer) = ctx.live_observer.take() {
            doc.disconnect(observer);
        }
        self.drop_active_if_gone();
        Some(ctx)
    }

    /// Removes one container.
    pub(crate) fn remove(&mut self, leaf: LeafId, id: &ContainerId) -> Option<ContainerState> {
        let removed = self.leaves.get_mut(&leaf)?.containers.remove(id);
        self.drop_active_if_gone();
        removed
    }

    /// Forgets everything, disconnecting every live observer.
    pub fn clear(&mut self, doc: &mut Document) -> Vec<LeafContext> {
        let ids = self.leaf_ids();
        ids.into_iter()
            .filter_map(|leaf| self.cleanup_data(doc, leaf))
            .collect()
    }

    fn drop_active_if_gone(&mut self) {
        if let Some((leaf, id)) = &self.active
            && self.container(*leaf, id).is_none()
        {
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(doc: &mut Document, leaf: LeafId, ctime: u64, line: usize) -> ContainerState {
        let node = doc.create_element("div");
        let content = doc.create_element("div");
        ContainerState::new(
            ContainerId::generate(ctime, "Default", line, line + 2),
            leaf,
            "Default".to_owned(),
            ViewMode::Preview,
            node,
            content,
            "graph".to_owned(),
            ContainerSizes {
                expanded: Size::new(400.0, 400.0),
                folded: Size::new(200.0, 200.0),
            },
            false,
        )
    }

    #[test]
    fn reads_default_without_active_container() {
        let state = TransformState::new();
        assert_eq!(state.get(Field::Dx), FieldValue::Number(0.0));
        assert_eq!(state.get(Field::Dy), FieldValue::Number(0.0));
        assert_eq!(state.get(Field::Scale), FieldValue::Number(1.0));
        assert_eq!(state.get(Field::NativeTouch), FieldValue::Flag(true));
        assert_eq!(
            state.get(Field::Source).as_text(),
            Some("No source available")
        );
        assert_eq!(
            state.get(Field::Panels),
            FieldValue::Panels(PanelHandles::default())
        );
    }

    #[test]
    fn writes_go_to_the_active_container() {
        let mut doc = Document::new();
        let mut state = TransformState::new();
        let leaf = LeafId(1);
        state.ensure_leaf(leaf, ViewMode::Preview);
        let a = container(&mut doc, leaf, 5, 0);
        let b = container(&mut doc, leaf, 5, 10);
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        state.insert(a).unwrap();
        state.insert(b).unwrap();

        assert!(state.set_active(leaf, &a_id));
        assert!(state.set(Field::Dx, FieldValue::Number(12.0)));
        assert!(state.set_active(leaf, &b_id));
        assert!(state.set(Field::Scale, FieldValue::Number(2.0)));

        assert_eq!(state.get_in(leaf, &a_id, Field::Dx), FieldValue::Number(12.0));
        assert_eq!(state.get_in(leaf, &a_id, Field::Scale), FieldValue::Number(1.0));
        assert_eq!(state.get(Field::Scale), FieldValue::Number(2.0));
        assert_eq!(state.get(Field::Dx), FieldValue::Number(0.0));
    }

    #[test]
    fn mistyped_writes_are_rejected() {
        let mut doc = Document::new();
        let mut state = TransformState::new();
        let leaf = LeafId(1);
        state.ensure_leaf(leaf, ViewMode::Preview);
        let a = container(&mut doc, leaf, 5, 0);
        let id = a.id.clone();
        state.insert(a).unwrap();
        state.set_active(leaf, &id);
        assert!(!state.set(Field::Scale, FieldValue::Flag(true)));
        assert_eq!(state.get(Field::Scale), FieldValue::Number(1.0));
    }

    #[test]
    fn fold_state_is_not_writable_directly() {
        let mut doc = Document::new();
        let mut state = TransformState::new();
        let leaf = LeafId(1);
        state.ensure_leaf(leaf, ViewMode::Preview);
        let a = container(&mut doc, leaf, 5, 0);
        let id = a.id.clone();
        state.insert(a).unwrap();
        state.set_active(leaf, &id);
        assert!(!state.set(Field::Folded, FieldValue::Flag(true)));
        assert_eq!(state.get(Field::Folded), FieldValue::Flag(false));
    }

    #[test]
    fn scale_writes_respect_the_floor() {
        let mut doc = Document::new();
        let mut state = TransformState::new();
        let leaf = LeafId(1);
        state.ensure_leaf(leaf, ViewMode::Preview);
        let a = container(&mut doc, leaf, 5, 0);
        let id = a.id.clone();
        state.insert(a).unwrap();
        state.set_active(leaf, &id);
        state.set(Field::Scale, FieldValue::Number(0.01));
        assert_eq!(state.get(Field::Scale), FieldValue::Number(0.125));
    }

    #[test]
    fn insert_requires_tracked_leaf() {
        let mut doc = Document::new();
        let mut state = TransformState::new();
        let c = container(&mut doc, LeafId(9), 5, 0);
        assert!(state.insert(c).is_err());
        assert!(!state.set_active(LeafId(9), &ContainerId::from_raw("id-5-x")));
    }

    #[test]
    fn cleanup_containers_prunes_stale_ctime() {
        let mut doc = Document::new();
        let mut state = TransformState::new();
        let leaf = LeafId(1);
        state.ensure_leaf(leaf, ViewMode::Preview);
        let old = container(&mut doc, leaf, 5, 0);
        let new = container(&mut doc, leaf, 6, 0);
        let old_id = old.id.clone();
        state.insert(old).unwrap();
        state.insert(new).unwrap();
        state.set_active(leaf, &old_id);

        let removed = state.cleanup_containers(leaf, 6);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, old_id);
        assert_eq!(state.container_count(), 1);
        assert!(state.active().is_none());
    }

    #[test]
    fn cleanup_data_disconnects_live_observer() {
        let mut doc = Document::new();
        let mut state = TransformState::new();
        let leaf = LeafId(3);
        let root = doc.root();
        let observer = doc.observe(
            root,
            diagram_zoom_dom::ObserveOptions::child_list_subtree(),
        );
        state.ensure_leaf(leaf, ViewMode::LiveEdit).live_observer = Some(observer);
        let c = container(&mut doc, leaf, 5, 0);
        state.insert(c).unwrap();

        let ctx = state.cleanup_data(&mut doc, leaf).unwrap();
        assert_eq!(ctx.len(), 1);
        assert!(!doc.is_observing(observer));
        assert!(state.leaf(leaf).is_none());
        assert!(state.cleanup_data(&mut doc, leaf).is_none());
    }
}
