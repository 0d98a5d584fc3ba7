// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::host::LeafId;
use crate::id::ContainerId;

/// Notifications published to other UI, drained with
/// [`DiagramZoom::drain_events`](crate::DiagramZoom::drain_events).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagramEvent {
    /// A rendered diagram was wrapped in a new container.
    DiagramFound {
        /// Owning leaf.
        leaf: LeafId,
        /// Container id.
        id: ContainerId,
    },
    /// Non-fold panels of a container were shown or hidden.
    PanelsVisibilityChanged {
        /// Owning leaf.
        leaf: LeafId,
        /// Container id.
        id: ContainerId,
        /// New visibility.
        visible: bool,
    },
    /// A container was folded or expanded.
    FoldChanged {
        /// Owning leaf.
        leaf: LeafId,
        /// Container id.
        id: ContainerId,
        /// New fold state.
        folded: bool,
    },
}
