// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagram Zoom: interactive zoom, pan and fold containers for diagrams
//! rendered in a note-taking host.
//!
//! The host renders diagrams (Mermaid, PlantUML, Graphviz, ...) into its
//! document. This crate finds them, wraps each in a container with control
//! panels, and turns mouse, wheel, touch, keyboard and focus input into pan,
//! zoom and fold changes. It keeps:
//! - A [`Document`](diagram_zoom_dom::Document) mirror the host adapter
//!   keeps in sync, with mutation observation.
//! - Bounded detection windows that wait for slow renderers.
//! - Per-leaf container state ([`state::TransformState`]) addressed by
//!   stable [`ContainerId`]s, so a re-rendered block keeps its view.
//! - A fold state machine driven only by the `folded` class.
//!
//! The host boundary is the [`Host`] trait. Time is explicit: deadlines fire
//! from [`DiagramZoom::tick`], and every entry point delivers pending
//! mutation records before it returns.
//!
//! ## Minimal example
//!
//! ```rust
//! use diagram_zoom::{DiagramZoom, Host, HostError, LeafId, SectionInfo, Settings, ViewMode};
//! use diagram_zoom_dom::NodeId;
//!
//! struct Preview;
//!
//! impl Host for Preview {
//!     fn is_leaf_alive(&self, _: LeafId) -> bool { true }
//!     fn active_leaf(&self) -> Option<LeafId> { Some(LeafId(1)) }
//!     fn file_ctime(&self, _: LeafId) -> Option<u64> { Some(1_700_000_000_000) }
//!     fn section_info(&self, _: LeafId, _: NodeId) -> Option<SectionInfo> {
//!         let text = "```mermaid\ngraph TD\n```".to_owned();
//!         Some(SectionInfo { text, line_start: 0, line_end: 2 })
//!     }
//!     fn editor_text(&self, _: LeafId) -> Option<String> { None }
//!     fn editor_offset_at(&self, _: LeafId, _: NodeId) -> Option<usize> { None }
//!     fn is_mobile(&self) -> bool { false }
//!     fn fetch(&mut self, _: &str) -> Result<Vec<u8>, HostError> { Err(HostError::new("offline")) }
//!     fn save_file(&mut self, _: &str, _: &[u8]) -> Result<(), HostError> { Ok(()) }
//!     fn write_clipboard_text(&mut self, _: &str) -> Result<(), HostError> { Ok(()) }
//!     fn write_clipboard_image(&mut self, _: &[u8], _: &str) -> Result<(), HostError> { Ok(()) }
//!     fn set_fullscreen(&mut self, _: NodeId, _: bool) -> Result<(), HostError> { Ok(()) }
//!     fn notice(&mut self, _: &str) {}
//! }
//!
//! let mut zoom = DiagramZoom::new(Settings::default(), Preview).unwrap();
//! let leaf = LeafId(1);
//! let doc = zoom.document_mut();
//! let root = doc.root();
//! let section = doc.create_element("div");
//! doc.append_child(root, section);
//! zoom.on_leaf_activated(leaf, ViewMode::Preview, root);
//!
//! // Nothing rendered yet: a detection window waits for the renderer.
//! zoom.on_preview_rendered(leaf, section);
//! assert_eq!(zoom.detection_count(), 1);
//!
//! let doc = zoom.document_mut();
//! let block = doc.create_element("div");
//! doc.add_class(block, "mermaid");
//! let svg = doc.create_element("svg");
//! doc.append_child(block, svg);
//! doc.append_child(section, block);
//! zoom.pump();
//!
//! assert_eq!(zoom.detection_count(), 0);
//! assert_eq!(zoom.state().container_count(), 1);
//! ```

mod actions;
mod detect;
mod engine;
mod error;
mod events;
mod factory;
mod fold;
mod gestures;
mod host;
mod id;
mod listeners;
mod menu;
mod panels;
mod settings;
mod source;
pub mod state;

pub use detect::{DETECTION_TIMEOUT_MS, Match};
pub use diagram_zoom_event_state::input::{Key, Modifiers, MouseButton};
pub use engine::DiagramZoom;
pub use error::{Error, Result};
pub use events::DiagramEvent;
pub use factory::{CONTAINER_CLASS, CONTENT_CLASS, FIT_FALLBACK_MS, LIVE_BLOCK_CLASSES};
pub use fold::{FOLDED_CLASS, FULLSCREEN_CLASS};
pub use gestures::{
    FocusChange, FocusInput, Handled, KeyInput, MouseEventKind, MouseInput, TouchInput,
    TouchPhase, WheelInput,
};
pub use host::{Host, HostError, LeafId, SectionInfo, ViewMode};
pub use id::ContainerId;
pub use menu::MenuItem;
pub use panels::{HIDDEN_CLASS, PANEL_CLASS, PanelAction, PanelButton, PanelKind, buttons, fold_button};
pub use settings::{
    DEFAULT_DIAGRAM_NAME, DiagramDescriptor, PanelPosition, PanelPositions, PanelToggles,
    Settings, SettingsError,
};
pub use source::{NO_SOURCE, SourceCapture};
