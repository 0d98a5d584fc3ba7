// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the engine integration tests.

#![allow(
    missing_docs,
    dead_code,
    reason = "Integration-test helper module; not every test file uses every helper."
)]

use std::collections::{HashMap, HashSet};

use diagram_zoom::{
    ContainerId, DiagramDescriptor, DiagramEvent, DiagramZoom, Host, HostError, LeafId,
    SectionInfo, Settings, ViewMode,
};
use diagram_zoom_dom::{Document, NodeId};

pub(crate) const CTIME: u64 = 1_700_000_000_000;
pub(crate) const LEAF: LeafId = LeafId(1);
pub(crate) const NOTE: &str = "# Note\n\n```test\ngraph TD\n  A --> B\n```\n";

/// A host that answers from fixed tables and records every side effect.
#[derive(Debug)]
pub(crate) struct FakeHost {
    pub(crate) dead: HashSet<LeafId>,
    pub(crate) ctime: Option<u64>,
    pub(crate) section: Option<SectionInfo>,
    pub(crate) editor_text: Option<String>,
    pub(crate) offsets: HashMap<NodeId, usize>,
    pub(crate) mobile: bool,
    pub(crate) fail_io: bool,
    pub(crate) image: Vec<u8>,
    pub(crate) fetched: Vec<String>,
    pub(crate) saved: Vec<(String, Vec<u8>)>,
    pub(crate) clipboard_text: Vec<String>,
    pub(crate) clipboard_images: Vec<(Vec<u8>, String)>,
    pub(crate) fullscreen: Vec<(NodeId, bool)>,
    pub(crate) notices: Vec<String>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            dead: HashSet::new(),
            ctime: Some(CTIME),
            section: Some(SectionInfo {
                text: NOTE.to_owned(),
                line_start: 2,
                line_end: 5,
            }),
            editor_text: None,
            offsets: HashMap::new(),
            mobile: false,
            fail_io: false,
            image: vec![0x89, b'P', b'N', b'G'],
            fetched: Vec::new(),
            saved: Vec::new(),
            clipboard_text: Vec::new(),
            clipboard_images: Vec::new(),
            fullscreen: Vec::new(),
            notices: Vec::new(),
        }
    }
}

impl FakeHost {
    fn io(&self) -> Result<(), HostError> {
        if self.fail_io {
            Err(HostError::new("permission denied"))
        } else {
            Ok(())
        }
    }
}

impl Host for FakeHost {
    fn is_leaf_alive(&self, leaf: LeafId) -> bool {
        !self.dead.contains(&leaf)
    }

    fn active_leaf(&self) -> Option<LeafId> {
        Some(LEAF)
    }

    fn file_ctime(&self, _leaf: LeafId) -> Option<u64> {
        self.ctime
    }

    fn section_info(&self, _leaf: LeafId, _element: NodeId) -> Option<SectionInfo> {
        self.section.clone()
    }

    fn editor_text(&self, _leaf: LeafId) -> Option<String> {
        self.editor_text.clone()
    }

    fn editor_offset_at(&self, _leaf: LeafId, element: NodeId) -> Option<usize> {
        self.offsets.get(&element).copied()
    }

    fn is_mobile(&self) -> bool {
        self.mobile
    }

    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, HostError> {
        self.io()?;
        self.fetched.push(url.to_owned());
        Ok(self.image.clone())
    }

    fn save_file(&mut self, name: &str, bytes: &[u8]) -> Result<(), HostError> {
        self.io()?;
        self.saved.push((name.to_owned(), bytes.to_vec()));
        Ok(())
    }

    fn write_clipboard_text(&mut self, text: &str) -> Result<(), HostError> {
        self.io()?;
        self.clipboard_text.push(text.to_owned());
        Ok(())
    }

    fn write_clipboard_image(&mut self, bytes: &[u8], mime: &str) -> Result<(), HostError> {
        self.io()?;
        self.clipboard_images.push((bytes.to_vec(), mime.to_owned()));
        Ok(())
    }

    fn set_fullscreen(&mut self, element: NodeId, on: bool) -> Result<(), HostError> {
        self.io()?;
        self.fullscreen.push((element, on));
        Ok(())
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_owned());
    }
}

/// Default settings plus a `Test` descriptor for `.test-diagram`.
pub(crate) fn settings() -> Settings {
    let mut settings = Settings::default();
    settings
        .diagrams
        .push(DiagramDescriptor::new("Test", ".test-diagram"));
    settings
}

pub(crate) fn engine_with(settings: Settings, host: FakeHost) -> DiagramZoom<FakeHost> {
    DiagramZoom::new(settings, host).expect("fixture settings are valid")
}

pub(crate) fn engine() -> DiagramZoom<FakeHost> {
    engine_with(settings(), FakeHost::default())
}

/// Activates [`LEAF`] in preview mode and returns an empty section element.
pub(crate) fn preview_section(zoom: &mut DiagramZoom<FakeHost>) -> NodeId {
    let doc = zoom.document_mut();
    let root = doc.root();
    let section = doc.create_element("div");
    doc.append_child(root, section);
    zoom.on_leaf_activated(LEAF, ViewMode::Preview, root);
    section
}

/// Builds `<div class="{class}"><svg/></div>` off-tree.
pub(crate) fn rendered_block(doc: &mut Document, class: &str) -> (NodeId, NodeId) {
    let block = doc.create_element("div");
    doc.add_class(block, class);
    let svg = doc.create_element("svg");
    doc.append_child(block, svg);
    (block, svg)
}

/// Wraps a `.test-diagram` block in a fresh preview section.
///
/// Returns the container id, its element and the `<svg>`.
pub(crate) fn wrapped(zoom: &mut DiagramZoom<FakeHost>) -> (ContainerId, NodeId, NodeId) {
    let section = preview_section(zoom);
    let doc = zoom.document_mut();
    let (block, svg) = rendered_block(doc, "test-diagram");
    doc.append_child(section, block);
    zoom.on_preview_rendered(LEAF, section);
    let id = found_ids(zoom)
        .pop()
        .expect("the rendered block is wrapped at once");
    let node = zoom
        .state()
        .container(LEAF, &id)
        .expect("container is tracked")
        .node();
    (id, node, svg)
}

/// Drains the events and returns the ids of newly found containers.
pub(crate) fn found_ids(zoom: &mut DiagramZoom<FakeHost>) -> Vec<ContainerId> {
    zoom.drain_events()
        .into_iter()
        .filter_map(|e| match e {
            DiagramEvent::DiagramFound { id, .. } => Some(id),
            _ => None,
        })
        .collect()
}

/// Returns the panel button for `action` inside `container`.
pub(crate) fn button(doc: &Document, container: NodeId, action: &str) -> NodeId {
    doc.descendants(container)
        .into_iter()
        .find(|&n| doc.attribute(n, "data-action").as_deref() == Some(action))
        .expect("panel button exists")
}
