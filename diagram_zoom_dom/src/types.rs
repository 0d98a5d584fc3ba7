// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handle types.

use core::fmt;

/// Identifier for an element or text node in a [`Document`](crate::Document).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - On [`Document::destroy`](crate::Document::destroy), the slot is freed and
///   any existing `NodeId` pointing at it becomes stale.
/// - On reuse of a freed slot its generation is incremented, so stale ids
///   never alias a different live node.
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check liveness.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.0, self.1)
    }
}

/// Identifier of a registered mutation observer.
///
/// Ids increase monotonically, so ordering by id is creation order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub(crate) u64);
