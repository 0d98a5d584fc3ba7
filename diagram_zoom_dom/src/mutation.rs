// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutation records and observation options.

use kurbo::Size;
use smallvec::SmallVec;

use crate::types::NodeId;

/// What changed.
#[derive(Clone, Debug, PartialEq)]
pub enum MutationKind {
    /// Children were added to and/or removed from the target.
    ChildList {
        /// Nodes inserted under the target.
        added: SmallVec<[NodeId; 2]>,
        /// Nodes detached from the target.
        removed: SmallVec<[NodeId; 2]>,
    },
    /// An attribute of the target changed (`class` and `style` included).
    Attribute {
        /// Attribute name.
        name: String,
        /// Value before the change, `None` if it was absent.
        old_value: Option<String>,
    },
    /// The host reported a new layout size for the target.
    Resize {
        /// Size before the change.
        old: Size,
        /// Size after the change.
        new: Size,
    },
}

/// One observed change.
#[derive(Clone, Debug, PartialEq)]
pub struct MutationRecord {
    /// The node the change happened on (the parent, for child list changes).
    pub target: NodeId,
    /// The change.
    pub kind: MutationKind,
}

impl MutationRecord {
    /// Returns the added nodes of a child list record, or an empty slice.
    #[must_use]
    pub fn added_nodes(&self) -> &[NodeId] {
        match &self.kind {
            MutationKind::ChildList { added, .. } => added.as_slice(),
            _ => &[],
        }
    }

    /// Returns the removed nodes of a child list record, or an empty slice.
    #[must_use]
    pub fn removed_nodes(&self) -> &[NodeId] {
        match &self.kind {
            MutationKind::ChildList { removed, .. } => removed.as_slice(),
            _ => &[],
        }
    }

    /// Returns the attribute name of an attribute record.
    #[must_use]
    pub fn attribute_name(&self) -> Option<&str> {
        match &self.kind {
            MutationKind::Attribute { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Which records an observer receives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObserveOptions {
    /// Child list changes.
    pub child_list: bool,
    /// Attribute changes.
    pub attributes: bool,
    /// Restricts attribute records to these names.
    pub attribute_filter: Option<Vec<String>>,
    /// Layout size changes.
    pub size: bool,
    /// Also observe the target's descendants.
    pub subtree: bool,
}

impl ObserveOptions {
    /// `{ childList: true, subtree: true }`.
    #[must_use]
    pub fn child_list_subtree() -> Self {
        Self {
            child_list: true,
            subtree: true,
            ..Self::default()
        }
    }

    /// `{ attributes: true, attributeFilter: ["class"] }` on the target only.
    #[must_use]
    pub fn class_attribute() -> Self {
        Self {
            attributes: true,
            attribute_filter: Some(vec!["class".to_owned()]),
            ..Self::default()
        }
    }

    /// Size changes of the target only, like a `ResizeObserver`.
    #[must_use]
    pub fn size() -> Self {
        Self {
            size: true,
            ..Self::default()
        }
    }

    /// Returns a copy that also observes descendants.
    #[must_use]
    pub fn with_subtree(mut self) -> Self {
        self.subtree = true;
        self
    }

    pub(crate) fn wants(&self, kind: &MutationKind) -> bool {
        match kind {
            MutationKind::ChildList { .. } => self.child_list,
            MutationKind::Attribute { name, .. } => {
                self.attributes
                    && self
                        .attribute_filter
                        .as_ref()
                        .is_none_or(|filter| filter.iter().any(|f| f == name))
            }
            MutationKind::Resize { .. } => self.size,
        }
    }
}
