// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary to the embedding application.

use core::fmt;

use diagram_zoom_dom::NodeId;

/// Identifies one document view ("leaf") of the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId(pub u64);

impl fmt::Display for LeafId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leaf-{}", self.0)
    }
}

/// Rendering mode of a leaf.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ViewMode {
    /// Read-only rendered view; diagrams arrive through a post-processing hook.
    Preview,
    /// Editor with inline rendering; diagrams appear through DOM mutations.
    LiveEdit,
}

/// Section information for a rendered preview element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionInfo {
    /// Full text of the file.
    pub text: String,
    /// First line (zero-based) of the section.
    pub line_start: usize,
    /// Last line (zero-based, inclusive) of the section.
    pub line_end: usize,
}

/// A failed host operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    /// Creates an error carrying a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Services the engine consumes from the embedding application.
///
/// Queries take `&self`; operations with user-visible side effects take
/// `&mut self`. Every method must tolerate ids the host no longer knows
/// about by returning `None`, `false` or an error.
pub trait Host {
    /// Returns `true` while the leaf still exists.
    ///
    /// Hosts do not reliably announce closed leaves, so the engine polls this.
    fn is_leaf_alive(&self, leaf: LeafId) -> bool;

    /// Returns the leaf the user is currently working in.
    fn active_leaf(&self) -> Option<LeafId>;

    /// Returns the creation time of the file shown in `leaf`.
    fn file_ctime(&self, leaf: LeafId) -> Option<u64>;

    /// Returns section information for a preview element.
    fn section_info(&self, leaf: LeafId, element: NodeId) -> Option<SectionInfo>;

    /// Returns the full editor text of a live-edit leaf.
    fn editor_text(&self, leaf: LeafId) -> Option<String>;

    /// Returns the editor byte offset at which a rendered block starts.
    fn editor_offset_at(&self, leaf: LeafId, element: NodeId) -> Option<usize>;

    /// Returns `true` on touch-first platforms.
    fn is_mobile(&self) -> bool;

    /// Fetches a resource, such as a rendered `<img>` source.
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, HostError>;

    /// Saves a file chosen by the user under a suggested name.
    fn save_file(&mut self, name: &str, bytes: &[u8]) -> Result<(), HostError>;

    /// Writes text to the clipboard.
    fn write_clipboard_text(&mut self, text: &str) -> Result<(), HostError>;

    /// Writes an image to the clipboard.
    fn write_clipboard_image(&mut self, bytes: &[u8], mime: &str) -> Result<(), HostError>;

    /// Enters or leaves platform fullscreen for an element.
    fn set_fullscreen(&mut self, element: NodeId, on: bool) -> Result<(), HostError>;

    /// Shows a transient notice to the user.
    fn notice(&mut self, message: &str);
}
