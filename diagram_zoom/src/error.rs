// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::host::{HostError, LeafId};
use crate::id::ContainerId;
use crate::settings::SettingsError;

/// Errors surfaced by the engine.
///
/// Stale or detached elements are not errors: operations on them are
/// silently skipped. `Result` is reserved for settings, source capture and
/// host I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Settings failed validation.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// A host operation failed.
    #[error("host operation failed: {0}")]
    Host(#[from] HostError),
    /// The host could not tell where a rendered diagram came from.
    #[error("no source context for diagram in {leaf}")]
    NoSourceContext {
        /// Leaf the diagram was rendered in.
        leaf: LeafId,
    },
    /// The leaf is not tracked.
    #[error("unknown leaf")]
    UnknownLeaf,
    /// The container has no rendered `<svg>` or `<img>` left.
    #[error("container `{id}` has no rendered diagram")]
    NoDiagram {
        /// Container id.
        id: ContainerId,
    },
}

/// Convenience alias.
pub type Result<T, E = Error> = core::result::Result<T, E>;
