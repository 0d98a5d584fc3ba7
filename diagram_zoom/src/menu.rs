// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context menu of a container: export, copy image, copy source.

use diagram_zoom_dom::NodeId;

use crate::detect;
use crate::engine::DiagramZoom;
use crate::error::Error;
use crate::host::Host;
use crate::id::ContainerId;
use crate::listeners::Listen;

/// An entry of the container context menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MenuItem {
    /// Save the diagram as a file.
    ExportImage,
    /// Put the diagram image on the clipboard.
    CopyImage,
    /// Put the diagram source on the clipboard.
    CopySource,
}

impl MenuItem {
    /// Menu title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::ExportImage => "Export diagram",
            Self::CopyImage => "Copy diagram",
            Self::CopySource => "Copy diagram source",
        }
    }
}

/// Image bytes of a diagram with their file extension and MIME type.
struct Image {
    bytes: Vec<u8>,
    extension: &'static str,
    mime: &'static str,
}

impl<H: Host> DiagramZoom<H> {
    /// Menu entries for a right click on `target`.
    ///
    /// Empty unless `target` is inside a container.
    #[must_use]
    pub fn context_menu(&self, target: NodeId) -> Vec<MenuItem> {
        if self.is_unloaded()
            || self
                .listeners
                .route(&self.core.doc, target, Listen::CONTEXT_MENU)
                .is_none()
        {
            return Vec::new();
        }
        vec![MenuItem::ExportImage, MenuItem::CopyImage, MenuItem::CopySource]
    }

    /// Runs a context menu entry for the container under `target`.
    ///
    /// The outcome is always reported to the user with a notice. Failures
    /// are also returned; a `target` outside any container is a no-op.
    pub fn run_menu_action(&mut self, target: NodeId, item: MenuItem) -> Result<(), Error> {
        let Some(route) = self
            .listeners
            .route(&self.core.doc, target, Listen::CONTEXT_MENU)
        else {
            return Ok(());
        };
        let Some(container) = self.core.state.container(route.leaf, &route.id) else {
            return Ok(());
        };
        let id = container.id.clone();
        let content = container.content;
        let source = container.source.clone();

        let result = match item {
            MenuItem::ExportImage => self.image(&id, content).and_then(|image| {
                let name = format!("{id}.{}", image.extension);
                self.host.save_file(&name, &image.bytes)?;
                Ok("Diagram exported")
            }),
            MenuItem::CopyImage => self.image(&id, content).and_then(|image| {
                self.host.write_clipboard_image(&image.bytes, image.mime)?;
                Ok("Diagram copied to clipboard")
            }),
            MenuItem::CopySource => self
                .host
                .write_clipboard_text(&source)
                .map(|()| "Diagram source copied to clipboard")
                .map_err(Error::from),
        };
        match result {
            Ok(message) => {
                self.host.notice(message);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%id, ?item, error = %err, "context menu action failed");
                self.host.notice(&format!("{} failed: {err}", item.title()));
                Err(err)
            }
        }
    }

    fn image(&mut self, id: &ContainerId, content: NodeId) -> Result<Image, Error> {
        let doc = &self.core.doc;
        let node = detect::payload(doc, content).ok_or_else(|| Error::NoDiagram { id: id.clone() })?;
        if doc.tag(node) == Some("svg") {
            return Ok(Image {
                bytes: doc.outer_html(node).into_bytes(),
                extension: "svg",
                mime: "image/svg+xml",
            });
        }
        let src = doc
            .attribute(node, "src")
            .map(|s| s.into_owned())
            .ok_or_else(|| Error::NoDiagram { id: id.clone() })?;
        let bytes = self.host.fetch(&src)?;
        Ok(Image {
            bytes,
            extension: "png",
            mime: "image/png",
        })
    }
}
