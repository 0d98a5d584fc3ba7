// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Markup serialization, used to export rendered SVG diagrams.

use crate::document::{Document, NodeKind};
use crate::types::NodeId;

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

impl Document {
    /// Serializes an element and its subtree as markup.
    ///
    /// Attributes are emitted as `id`, `class`, the remaining attributes in
    /// name order, then `style`. Returns an empty string for dead nodes.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            None => {}
            Some(NodeKind::Text) => escape_into(self.text(id).unwrap_or_default(), false, out),
            Some(NodeKind::Element) => {
                let tag = self.tag(id).unwrap_or("div");
                out.push('<');
                out.push_str(tag);
                let mut attrs: Vec<(String, String)> = Vec::new();
                if let Some(v) = self.attribute(id, "id") {
                    attrs.push(("id".to_owned(), v.into_owned()));
                }
                if let Some(v) = self.attribute(id, "class") {
                    attrs.push(("class".to_owned(), v.into_owned()));
                }
                attrs.extend(
                    self.attributes(id)
                        .filter(|(k, _)| *k != "id")
                        .map(|(k, v)| (k.to_owned(), v.to_owned())),
                );
                if let Some(v) = self.attribute(id, "style") {
                    attrs.push(("style".to_owned(), v.into_owned()));
                }
                for (k, v) in &attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    escape_into(v, true, out);
                    out.push('"');
                }
                if VOID_ELEMENTS.contains(&tag) {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
