// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine: lifecycle entry points and mutation delivery.

use kurbo::Vec2;

use diagram_zoom_dom::{Document, MutationRecord, MutationWatcher, NodeId, ObserveOptions, ObserverId};

use crate::actions;
use crate::detect::{self, Detector};
use crate::error::Error;
use crate::events::DiagramEvent;
use crate::fold;
use crate::factory::{CONTAINER_CLASS, PendingFit};
use crate::host::{Host, LeafId, ViewMode};
use crate::id::ContainerId;
use crate::listeners::Listeners;
use crate::panels;
use crate::settings::{Matcher, Settings};
use crate::state::{ContainerState, Field, FieldValue, TransformState};

/// Upper bound on delivery rounds per pump; each round drains every queue.
const MAX_PUMP_ROUNDS: usize = 64;

/// State reachable from mutation subscribers.
#[derive(Debug, Default)]
pub(crate) struct Core {
    pub(crate) doc: Document,
    pub(crate) state: TransformState,
    pub(crate) events: Vec<DiagramEvent>,
}

/// Zoom, pan and fold containers for the diagrams of every leaf.
///
/// The engine owns the [`Document`] mirror; the host adapter keeps it in
/// sync through [`DiagramZoom::document_mut`] and forwards lifecycle hooks,
/// clock ticks and input. Every entry point finishes by delivering pending
/// mutation records, so the document and state are settled when it returns.
pub struct DiagramZoom<H> {
    pub(crate) host: H,
    pub(crate) settings: Settings,
    pub(crate) matchers: Vec<Matcher>,
    pub(crate) core: Core,
    pub(crate) fold_watcher: MutationWatcher<Core, Error>,
    pub(crate) detector: Detector,
    pub(crate) fits: Vec<PendingFit>,
    pub(crate) listeners: Listeners,
    pub(crate) now: u64,
    unloaded: bool,
}

impl<H> core::fmt::Debug for DiagramZoom<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DiagramZoom")
            .field("doc", &self.core.doc)
            .field("containers", &self.core.state.container_count())
            .field("detections", &self.detector.len())
            .field("pending_fits", &self.fits.len())
            .field("listeners", &self.listeners.len())
            .field("now", &self.now)
            .field("unloaded", &self.unloaded)
            .finish_non_exhaustive()
    }
}

impl<H: Host> DiagramZoom<H> {
    /// Creates an engine over an empty document.
    ///
    /// Fails if the settings do not validate.
    pub fn new(settings: Settings, host: H) -> Result<Self, Error> {
        let matchers = settings.matchers()?;
        let mut doc = Document::new();
        let mut fold_watcher = MutationWatcher::new();
        let root = doc.root();
        fold_watcher.attach(
            &mut doc,
            root,
            ObserveOptions::class_attribute().with_subtree(),
        );
        Ok(Self {
            host,
            settings,
            matchers,
            core: Core {
                doc,
                state: TransformState::new(),
                events: Vec::new(),
            },
            fold_watcher,
            detector: Detector::default(),
            fits: Vec::new(),
            listeners: Listeners::default(),
            now: 0,
            unloaded: false,
        })
    }

    // --- Accessors --------------------------------------------------------

    /// The document mirror.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.core.doc
    }

    /// The document mirror, for the host adapter to keep in sync.
    ///
    /// Changes made here are delivered on the next entry point or
    /// [`DiagramZoom::pump`].
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.core.doc
    }

    /// Per-leaf container state.
    #[must_use]
    pub fn state(&self) -> &TransformState {
        &self.core.state
    }

    /// Mutable container state, for explicit field writes.
    pub fn state_mut(&mut self) -> &mut TransformState {
        &mut self.core.state
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Last clock value seen by [`DiagramZoom::tick`].
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of open detection windows.
    #[must_use]
    pub fn detection_count(&self) -> usize {
        self.detector.len()
    }

    /// Number of containers waiting for their initial fit.
    #[must_use]
    pub fn pending_fit_count(&self) -> usize {
        self.fits.len()
    }

    /// Number of containers registered for input.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of fold subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.fold_watcher.len()
    }

    /// Returns `true` after [`DiagramZoom::unload`].
    #[must_use]
    pub fn is_unloaded(&self) -> bool {
        self.unloaded
    }

    /// Returns the first rendered diagram at or below `root` that is not
    /// wrapped yet.
    ///
    /// Descriptors are tried in settings order; the first one with a
    /// rendered candidate wins.
    #[must_use]
    pub fn find_diagram(&self, root: NodeId) -> Option<detect::Match> {
        detect::find_match(&self.core.doc, root, &self.matchers)
    }

    /// Takes the published events, oldest first.
    pub fn drain_events(&mut self) -> Vec<DiagramEvent> {
        core::mem::take(&mut self.core.events)
    }

    // --- Lifecycle --------------------------------------------------------

    /// A leaf became active, showing `content_root` in `mode`.
    ///
    /// Forgets closed leaves, prunes containers from a replaced file, and in
    /// live-edit mode starts the leaf's content observer unless one runs.
    pub fn on_leaf_activated(&mut self, leaf: LeafId, mode: ViewMode, content_root: NodeId) {
        if self.unloaded {
            return;
        }
        self.prune_dead_leaves();
        let ctx = self.core.state.ensure_leaf(leaf, mode);
        ctx.content_root = Some(content_root);

        if let Some(ctime) = self.host.file_ctime(leaf) {
            for removed in self.core.state.cleanup_containers(leaf, ctime) {
                tracing::debug!(%leaf, id = %removed.id, "pruned container of replaced file");
                self.release_container(&removed);
            }
        }

        let doc = &mut self.core.doc;
        let mut started = false;
        if let Some(ctx) = self.core.state.leaf_mut(leaf) {
            match mode {
                ViewMode::LiveEdit if ctx.live_observer.is_none() => {
                    let observer = doc.observe(content_root, ObserveOptions::child_list_subtree());
                    ctx.live_observer = Some(observer);
                    started = true;
                    tracing::debug!(%leaf, "live observer started");
                }
                ViewMode::Preview => {
                    if let Some(observer) = ctx.live_observer.take() {
                        doc.disconnect(observer);
                    }
                }
                ViewMode::LiveEdit => {}
            }
        }
        // Blocks rendered before the observer started get no records.
        if started {
            let wrapped = self.wrap_all(leaf, content_root);
            tracing::trace!(%leaf, wrapped, "scanned existing live blocks");
        }
        self.release_detached();
        self.pump();
    }

    /// Preview hook: `section_root` of `leaf` was rendered.
    ///
    /// Wraps the diagram at once if it is already rendered; otherwise opens
    /// a detection window on the section.
    pub fn on_preview_rendered(&mut self, leaf: LeafId, section_root: NodeId) {
        if self.unloaded {
            return;
        }
        if self.core.state.leaf(leaf).is_none() {
            self.core.state.ensure_leaf(leaf, ViewMode::Preview);
        }
        self.pump();
        self.wrap_or_watch(leaf, section_root);
        self.pump();
    }

    /// Advances the clock: expires detection windows and fit fallbacks and
    /// forgets closed leaves.
    pub fn tick(&mut self, now_ms: u64) {
        if self.unloaded {
            return;
        }
        self.now = self.now.max(now_ms);
        // Records queued before the deadline still count.
        self.pump();
        self.detector.expire(self.now);
        self.settle_detections();
        self.expire_fits();
        self.prune_dead_leaves();
        self.release_detached();
        self.pump();
    }

    /// Delivers pending mutation records until no observer has any.
    pub fn pump(&mut self) {
        for _ in 0..MAX_PUMP_ROUNDS {
            let batches = self.core.doc.take_records();
            if batches.is_empty() {
                return;
            }
            for (observer, records) in batches {
                // An earlier batch may have closed this observer.
                if self.core.doc.is_observing(observer) {
                    self.route(observer, &records);
                }
            }
        }
        tracing::warn!("mutation delivery did not settle");
    }

    /// Validates and installs new settings.
    ///
    /// Existing containers keep their transform and fold state; the
    /// mouse-out rule is updated in place.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), Error> {
        self.matchers = settings.matchers()?;
        let hide = settings.hide_panels_on_mouse_out;
        self.settings = settings;
        for leaf in self.core.state.leaf_ids() {
            let Some(ctx) = self.core.state.leaf_mut(leaf) else {
                continue;
            };
            for container in ctx.containers.values_mut() {
                container.visibility.set_hide_on_mouse_out(hide);
                if let Some(visible) = panels::apply_visibility(&mut self.core.doc, container) {
                    self.core.events.push(DiagramEvent::PanelsVisibilityChanged {
                        leaf,
                        id: container.id.clone(),
                        visible,
                    });
                }
            }
        }
        self.pump();
        Ok(())
    }

    /// Releases every observer, subscription, registration, timer and all
    /// state. The engine ignores further input afterwards.
    pub fn unload(&mut self) {
        let doc = &mut self.core.doc;
        self.fold_watcher.teardown(doc);
        self.detector.close_all(doc);
        for fit in self.fits.drain(..) {
            fit.cancel(doc);
        }
        self.core.state.clear(doc);
        self.listeners.clear();
        self.core.events.clear();
        self.unloaded = true;
        tracing::debug!("unloaded");
    }

    // --- Commands ---------------------------------------------------------

    /// Shows or hides the panels of the active container.
    ///
    /// Returns the new visibility, or `None` without an active container.
    pub fn toggle_active_panels(&mut self) -> Option<bool> {
        let (leaf, id) = self.current_active()?;
        self.toggle_panels(leaf, &id)
    }

    /// Pans a container (the active one if `target` is `None`).
    pub fn move_element(
        &mut self,
        target: Option<(LeafId, &ContainerId)>,
        delta: Vec2,
        animate: bool,
    ) -> bool {
        self.with_container(target, |doc, c| actions::move_by(doc, c, delta, animate))
    }

    /// Zooms a container about its center (the active one if `target` is
    /// `None`).
    pub fn zoom_element(
        &mut self,
        target: Option<(LeafId, &ContainerId)>,
        factor: f64,
        animate: bool,
    ) -> bool {
        self.with_container(target, |doc, c| actions::zoom_by(doc, c, factor, animate))
    }

    /// Fits a container's diagram (the active one if `target` is `None`).
    pub fn fit_element(&mut self, target: Option<(LeafId, &ContainerId)>, animate: bool) -> bool {
        let mut fitted = false;
        self.with_container(target, |doc, c| fitted = actions::fit(doc, c, animate));
        fitted
    }

    /// Writes a field of a container (the active one if `target` is `None`)
    /// and brings the document in line with it.
    ///
    /// `Folded` goes through the fold class like every other fold change;
    /// `Dx`, `Dy` and `Scale` re-apply the transform. Returns `false` if
    /// there is no such container or the value has the wrong type.
    pub fn set_field(
        &mut self,
        target: Option<(LeafId, &ContainerId)>,
        field: Field,
        value: FieldValue,
    ) -> bool {
        if field != Field::Folded {
            let mut written = false;
            self.with_container(target, |doc, c| {
                written = c.set(field, value);
                if written && matches!(field, Field::Dx | Field::Dy | Field::Scale) {
                    actions::apply(doc, c, false);
                }
            });
            return written;
        }
        let Some(folded) = value.as_flag() else {
            return false;
        };
        let Some((leaf, id)) = self.resolve(target) else {
            return false;
        };
        let Some(node) = self.core.state.container(leaf, &id).map(ContainerState::node) else {
            return false;
        };
        if !self.core.doc.is_alive(node) {
            return false;
        }
        fold::set_folded(&mut self.core.doc, node, folded);
        self.pump();
        true
    }

    fn resolve(&self, target: Option<(LeafId, &ContainerId)>) -> Option<(LeafId, ContainerId)> {
        match target {
            Some((leaf, id)) => Some((leaf, id.clone())),
            None => self.current_active(),
        }
    }

    fn with_container(
        &mut self,
        target: Option<(LeafId, &ContainerId)>,
        f: impl FnOnce(&mut Document, &mut ContainerState),
    ) -> bool {
        let Some((leaf, id)) = self.resolve(target) else {
            return false;
        };
        let Some(container) = self.core.state.container_mut(leaf, &id) else {
            return false;
        };
        if !self.core.doc.is_alive(container.node) {
            return false;
        }
        f(&mut self.core.doc, container);
        self.pump();
        true
    }

    // --- Internals --------------------------------------------------------

    /// The active container, if it belongs to the leaf the host shows.
    fn current_active(&self) -> Option<(LeafId, ContainerId)> {
        let (leaf, id) = self.core.state.active_id()?;
        if self.host.active_leaf().is_some_and(|current| current != leaf) {
            return None;
        }
        Some((leaf, id.clone()))
    }

    fn route(&mut self, observer: ObserverId, records: &[MutationRecord]) {
        if self.fold_watcher.observer() == Some(observer) {
            let report = self.fold_watcher.dispatch(&mut self.core, records);
            tracing::trace!(delivered = report.delivered, failed = report.failed, "class records");
            return;
        }
        if let Some(leaf) = self.live_leaf(observer) {
            self.on_live_records(leaf, records);
            return;
        }
        if self.detector.owns(observer) {
            self.detector
                .on_records(&self.core.doc, observer, &self.matchers);
            self.settle_detections();
            return;
        }
        if let Some(index) = self.fits.iter().position(|f| f.owns(observer)) {
            self.try_fit(index, false);
        }
    }

    fn live_leaf(&self, observer: ObserverId) -> Option<LeafId> {
        self.core.state.leaf_ids().into_iter().find(|&leaf| {
            self.core
                .state
                .leaf(leaf)
                .is_some_and(|ctx| ctx.live_observer == Some(observer))
        })
    }

    /// Live-edit content changed: check every added block, and give blocks
    /// that are not rendered yet a window of their own.
    fn on_live_records(&mut self, leaf: LeafId, records: &[MutationRecord]) {
        for record in records {
            for &node in record.added_nodes() {
                if self.is_candidate_block(node) {
                    self.wrap_or_watch(leaf, node);
                }
            }
        }
        if records.iter().any(|r| !r.removed_nodes().is_empty()) {
            self.release_detached();
        }
    }

    fn is_candidate_block(&self, node: NodeId) -> bool {
        let doc = &self.core.doc;
        doc.tag(node) == Some("div")
            && doc.is_connected(node)
            && !core::iter::once(node)
                .chain(doc.ancestors(node))
                .any(|n| doc.has_class(n, CONTAINER_CLASS))
    }

    fn settle_detections(&mut self) {
        for (leaf, root, _) in self.detector.settle(&mut self.core.doc) {
            self.wrap_all(leaf, root);
        }
    }

    /// Wraps every unwrapped diagram under `root` and returns how many were
    /// wrapped. A failed creation is logged and the rest still run.
    fn wrap_all(&mut self, leaf: LeafId, root: NodeId) -> usize {
        let mut wrapped = 0;
        for m in detect::find_matches(&self.core.doc, root, &self.matchers) {
            match self.create_container(leaf, m) {
                Ok(Some(_)) => wrapped += 1,
                Ok(None) => {}
                Err(err) => tracing::warn!(%leaf, error = %err, "container creation aborted"),
            }
        }
        wrapped
    }

    /// Wraps what is rendered under `root`; if nothing is, watches `root`
    /// until something renders or the window times out.
    fn wrap_or_watch(&mut self, leaf: LeafId, root: NodeId) {
        if self.wrap_all(leaf, root) > 0 || detect::contains_wrapped(&self.core.doc, root) {
            return;
        }
        self.detector.open(&mut self.core.doc, leaf, root, self.now);
    }

    /// Releases what containers detached from the document still hold.
    ///
    /// The container state stays, so a re-render of the same block restores
    /// its view; only the subscription, input registration and pending fit
    /// go.
    fn release_detached(&mut self) {
        let doc = &self.core.doc;
        let mut detached = Vec::new();
        for leaf in self.core.state.leaf_ids() {
            let Some(ctx) = self.core.state.leaf(leaf) else {
                continue;
            };
            detached.extend(
                ctx.containers()
                    .filter(|c| c.fold_subscription.is_some() && !doc.is_connected(c.node))
                    .map(|c| (leaf, c.id.clone())),
            );
        }
        for (leaf, id) in detached {
            let Some(container) = self.core.state.container_mut(leaf, &id) else {
                continue;
            };
            let released = container.clone();
            container.fold_subscription = None;
            self.release_container(&released);
            tracing::debug!(%leaf, %id, "released detached container");
        }
    }

    fn prune_dead_leaves(&mut self) {
        for leaf in self.core.state.leaf_ids() {
            if !self.host.is_leaf_alive(leaf) {
                self.cleanup_leaf(leaf);
            }
        }
    }

    /// Forgets a leaf and everything its containers hold.
    pub(crate) fn cleanup_leaf(&mut self, leaf: LeafId) {
        self.detector.close_leaf(&mut self.core.doc, leaf);
        if let Some(ctx) = self.core.state.cleanup_data(&mut self.core.doc, leaf) {
            for container in ctx.containers() {
                self.release_container(container);
            }
            tracing::debug!(%leaf, containers = ctx.len(), "leaf cleaned up");
        }
    }

    /// Releases the subscription, input registration and pending fit of a
    /// container that is no longer tracked.
    pub(crate) fn release_container(&mut self, container: &ContainerState) {
        if let Some(sub) = container.fold_subscription {
            self.fold_watcher.unsubscribe(sub);
        }
        self.listeners.release(container.node);
        let doc = &mut self.core.doc;
        self.fits.retain(|f| {
            if f.is_for(container.leaf, &container.id) {
                f.cancel(doc);
                false
            } else {
                true
            }
        });
    }
}
