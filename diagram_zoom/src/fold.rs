// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fold state, driven by the container's class list.
//!
//! Nothing toggles fold state directly. Call sites only add or remove
//! [`FOLDED_CLASS`] on the container element; a class-attribute
//! subscription then brings the size, panels, fold button and published
//! events in line. Any code path that touches the class, including the host
//! itself, gets the same result.

use diagram_zoom_dom::{Document, MutationWatcher, NodeId, SubscriptionId};

use crate::engine::Core;
use crate::error::Error;
use crate::events::DiagramEvent;
use crate::host::{LeafId, ViewMode};
use crate::id::ContainerId;
use crate::panels;
use crate::state::ContainerState;

/// Class marking a folded container.
pub const FOLDED_CLASS: &str = "folded";

/// Class marking a fullscreen container.
pub const FULLSCREEN_CLASS: &str = "is-fullscreen";

/// Folds or expands a container by editing its class list.
pub(crate) fn set_folded(doc: &mut Document, node: NodeId, folded: bool) {
    doc.toggle_class(node, FOLDED_CLASS, Some(folded));
}

/// Subscribes the container to class changes of its element.
pub(crate) fn subscribe(
    watcher: &mut MutationWatcher<Core, Error>,
    leaf: LeafId,
    id: ContainerId,
    node: NodeId,
) -> SubscriptionId {
    watcher.subscribe(
        move |record| record.target == node && record.attribute_name() == Some("class"),
        move |core, _| sync(core, leaf, &id),
    )
}

/// Writes the container's current size into its style.
pub(crate) fn apply_size(doc: &mut Document, container: &ContainerState) {
    let node = container.node;
    if container.fullscreen {
        doc.set_style(node, "width", "100%");
        doc.set_style(node, "height", "100%");
        return;
    }
    let size = if container.folded {
        container.sizes.folded
    } else {
        container.sizes.expanded
    };
    doc.set_style(node, "width", &format!("{}px", size.width));
    doc.set_style(node, "height", &format!("{}px", size.height));
}

/// Reconciles a container with the fold class on its element.
///
/// Idempotent: calling it without a class change re-applies the same
/// styles and publishes nothing.
pub(crate) fn sync(core: &mut Core, leaf: LeafId, id: &ContainerId) -> Result<(), Error> {
    let Core { doc, state, events } = core;
    let Some(ctx) = state.leaf_mut(leaf) else {
        return Err(Error::UnknownLeaf);
    };
    let Some(container) = ctx.containers.get_mut(id) else {
        return Ok(());
    };
    if !doc.is_alive(container.node) {
        return Ok(());
    }

    let folded = doc.has_class(container.node, FOLDED_CLASS);
    let changed = folded != container.folded;
    container.folded = folded;
    container.visibility.set_folded(folded);

    if container.mode == ViewMode::LiveEdit
        && let Some(parent) = doc.parent(container.node)
    {
        doc.toggle_class(parent, FOLDED_CLASS, Some(folded));
    }
    apply_size(doc, container);
    panels::refresh_button(doc, container.panels.fold, panels::fold_button(folded));
    if let Some(visible) = panels::apply_visibility(doc, container) {
        events.push(DiagramEvent::PanelsVisibilityChanged {
            leaf,
            id: id.clone(),
            visible,
        });
    }
    if changed {
        tracing::debug!(%leaf, %id, folded, "fold state changed");
        events.push(DiagramEvent::FoldChanged {
            leaf,
            id: id.clone(),
            folded,
        });
    }
    Ok(())
}
