// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wrapping detected diagrams in interactive containers.

use kurbo::Size;

use diagram_zoom_dom::{Document, NodeId, ObserveOptions, ObserverId};

use crate::actions;
use crate::detect::{self, Match};
use crate::engine::DiagramZoom;
use crate::error::Error;
use crate::events::DiagramEvent;
use crate::fold;
use crate::host::{Host, LeafId, ViewMode};
use crate::id::ContainerId;
use crate::listeners::Listen;
use crate::panels::{self, PanelKind};
use crate::source::{self, SourceCapture};
use crate::state::{ContainerSizes, ContainerState};

/// Class of the wrapper element.
pub const CONTAINER_CLASS: &str = "diagram-container";

/// Class added to the wrapped diagram element.
pub const CONTENT_CLASS: &str = "diagram-content";

/// Classes of the host's raw code-block wrappers in live-edit mode.
pub const LIVE_BLOCK_CLASSES: [&str; 2] = ["cm-preview-code-block", "cm-embed-block"];

/// How long a new container waits for layout before the fallback fit.
pub const FIT_FALLBACK_MS: u64 = 5000;

/// An initial fit waiting for the container and diagram to be laid out.
#[derive(Clone, Debug)]
pub(crate) struct PendingFit {
    leaf: LeafId,
    id: ContainerId,
    observers: [ObserverId; 2],
    deadline: u64,
}

impl PendingFit {
    pub(crate) fn owns(&self, observer: ObserverId) -> bool {
        self.observers.contains(&observer)
    }

    pub(crate) fn is_for(&self, leaf: LeafId, id: &ContainerId) -> bool {
        self.leaf == leaf && self.id == *id
    }

    /// Stops both size observers. Safe to call more than once.
    pub(crate) fn cancel(&self, doc: &mut Document) {
        for observer in self.observers {
            doc.disconnect(observer);
        }
    }
}

fn is_laid_out(doc: &Document, container: &ContainerState) -> bool {
    let positive = |s: Size| s.width > 0.0 && s.height > 0.0;
    positive(doc.size(container.node)) && positive(doc.size(container.content))
}

impl<H: Host> DiagramZoom<H> {
    /// Wraps a detected diagram.
    ///
    /// Returns `Ok(None)` if the element is already wrapped or went away.
    /// Fails, without touching the document, if the host cannot say where
    /// the diagram came from.
    pub(crate) fn create_container(
        &mut self,
        leaf: LeafId,
        found: Match,
    ) -> Result<Option<ContainerId>, Error> {
        let element = found.element;
        let mode = self.core.state.leaf(leaf).ok_or(Error::UnknownLeaf)?.mode();
        let doc = &self.core.doc;
        if !doc.is_alive(element) || detect::is_wrapped(doc, element) {
            tracing::trace!(%leaf, ?element, "already wrapped");
            return Ok(None);
        }
        let Some(parent) = doc.parent(element) else {
            return Ok(None);
        };
        let Some(descriptor) = self.settings.diagrams.get(found.descriptor) else {
            return Ok(None);
        };

        let capture = self
            .capture_source(leaf, mode, element)
            .ok_or(Error::NoSourceContext { leaf })?;
        let ctime = self
            .host
            .file_ctime(leaf)
            .ok_or(Error::NoSourceContext { leaf })?;
        let id = ContainerId::generate(ctime, &descriptor.name, capture.line_start, capture.line_end);
        let name = descriptor.name.clone();
        let toggles = descriptor.panels;
        let sizes = self.initial_sizes(element);

        // A re-render of a known block keeps its pan, zoom and fold state.
        let previous = self.core.state.remove(leaf, &id);
        if let Some(previous) = &previous {
            self.release_container(previous);
        }

        let doc = &mut self.core.doc;
        let wrapper = doc.create_element("div");
        doc.add_class(wrapper, CONTAINER_CLASS);
        doc.set_attribute(wrapper, "id", id.as_str());
        doc.set_attribute(wrapper, "tabindex", "0");
        doc.set_attribute(wrapper, "data-diagram", &name);
        doc.insert_before(parent, wrapper, Some(element));
        doc.append_child(wrapper, element);
        doc.add_class(element, CONTENT_CLASS);

        let mut container = ContainerState::new(
            id.clone(),
            leaf,
            name,
            mode,
            wrapper,
            element,
            capture.text,
            sizes,
            self.settings.hide_panels_on_mouse_out,
        );
        let folded = match &previous {
            Some(p) => {
                container.transform = p.transform;
                container.native_touch = p.native_touch;
                p.folded
            }
            None => self.settings.fold_by_default,
        };
        container.folded = folded;
        container.visibility.set_folded(folded);
        fold::set_folded(doc, wrapper, folded);

        // Fold first: the other panels read fold state for their icons.
        let mobile = self.host.is_mobile();
        for kind in PanelKind::ALL {
            if toggles.enabled(kind) {
                let buttons = panels::buttons(kind, &container, mobile);
                let position = self.settings.panel_positions.get(kind);
                let panel = panels::build(doc, wrapper, kind, position, &buttons);
                container.panels.set(kind, panel);
            }
        }
        container.fold_subscription = Some(fold::subscribe(
            &mut self.fold_watcher,
            leaf,
            id.clone(),
            wrapper,
        ));
        let restored = previous.is_some();
        if restored {
            actions::apply(doc, &container, false);
        }
        if let Err(container) = self.core.state.insert(container) {
            // The leaf vanished under us; undo the registration.
            self.release_container(&container);
            return Err(Error::UnknownLeaf);
        }
        fold::sync(&mut self.core, leaf, &id)?;

        self.listeners.register(wrapper, leaf, &id, Listen::GESTURES);
        self.listeners.register(wrapper, leaf, &id, Listen::CONTEXT_MENU);

        if !restored {
            self.schedule_fit(leaf, &id, true);
        }
        tracing::debug!(%leaf, %id, restored, "container created");
        self.core
            .events
            .push(DiagramEvent::DiagramFound { leaf, id: id.clone() });
        Ok(Some(id))
    }

    fn capture_source(&self, leaf: LeafId, mode: ViewMode, element: NodeId) -> Option<SourceCapture> {
        match mode {
            ViewMode::Preview => self
                .host
                .section_info(leaf, element)
                .map(|info| source::from_section(&info)),
            ViewMode::LiveEdit => {
                let doc = &self.core.doc;
                let block = core::iter::once(element)
                    .chain(doc.ancestors(element))
                    .find(|&n| LIVE_BLOCK_CLASSES.iter().any(|c| doc.has_class(n, c)))?;
                let offset = self.host.editor_offset_at(leaf, block)?;
                let text = self.host.editor_text(leaf)?;
                source::from_editor(&text, offset)
            }
        }
    }

    fn initial_sizes(&self, element: NodeId) -> ContainerSizes {
        let s = &self.settings;
        let configured = ContainerSizes {
            expanded: Size::new(s.expanded_width, s.expanded_height),
            folded: Size::new(s.folded_width, s.folded_height),
        };
        if !s.apply_suitable_size {
            return configured;
        }
        let doc = &self.core.doc;
        let measured = match detect::payload(doc, element) {
            Some(img) if doc.tag(img) == Some("img") => doc.size(img),
            _ => doc.size(element),
        };
        if measured.width > 0.0 && measured.height > 0.0 {
            ContainerSizes {
                expanded: measured,
                folded: Size::new(measured.width / 2.0, measured.height / 2.0),
            }
        } else {
            configured
        }
    }

    /// Fits the container once it and its diagram have a layout size.
    ///
    /// With `check_now`, an already laid-out container is fitted at once, the
    /// way a resize observer reports the current size on registration.
    /// Otherwise the fit waits for the next size change, bounded by
    /// [`FIT_FALLBACK_MS`].
    pub(crate) fn schedule_fit(&mut self, leaf: LeafId, id: &ContainerId, check_now: bool) {
        let doc = &mut self.core.doc;
        self.fits.retain(|f| {
            let stale = f.is_for(leaf, id);
            if stale {
                f.cancel(doc);
            }
            !stale
        });
        let Some(container) = self.core.state.container_mut(leaf, id) else {
            return;
        };
        let doc = &mut self.core.doc;
        if check_now && is_laid_out(doc, container) {
            actions::fit(doc, container, false);
            return;
        }
        let observers = [
            doc.observe(container.node, ObserveOptions::size()),
            doc.observe(container.content, ObserveOptions::size()),
        ];
        self.fits.push(PendingFit {
            leaf,
            id: id.clone(),
            observers,
            deadline: self.now.saturating_add(FIT_FALLBACK_MS),
        });
    }

    /// Fits the container of pending fit `index` if it is laid out.
    ///
    /// The pending fit is dropped once it fitted, or unconditionally when
    /// `fallback` is set.
    pub(crate) fn try_fit(&mut self, index: usize, fallback: bool) {
        let Some(pending) = self.fits.get(index) else {
            return;
        };
        let (leaf, id) = (pending.leaf, pending.id.clone());
        let doc = &mut self.core.doc;
        let fitted = match self.core.state.container_mut(leaf, &id) {
            Some(container) if is_laid_out(doc, container) => actions::fit(doc, container, false),
            _ => false,
        };
        if fitted || fallback {
            let pending = self.fits.remove(index);
            pending.cancel(doc);
            tracing::trace!(%leaf, %id, fitted, "initial fit settled");
        }
    }

    /// Runs the fallback of every pending fit whose deadline has passed.
    pub(crate) fn expire_fits(&mut self) {
        let now = self.now;
        for index in (0..self.fits.len()).rev() {
            if self.fits[index].deadline <= now {
                self.try_fit(index, true);
            }
        }
    }
}
