// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use diagram_zoom::{DiagramZoom, Host, HostError, LeafId, SectionInfo, Settings, ViewMode};
use diagram_zoom_dom::NodeId;

const LEAF: LeafId = LeafId(1);

/// Answers every query; side effects are dropped.
#[derive(Default)]
struct QuietHost {
    sections: Cell<usize>,
}

impl Host for QuietHost {
    fn is_leaf_alive(&self, _: LeafId) -> bool {
        true
    }
    fn active_leaf(&self) -> Option<LeafId> {
        Some(LEAF)
    }
    fn file_ctime(&self, _: LeafId) -> Option<u64> {
        Some(1)
    }
    fn section_info(&self, _: LeafId, _: NodeId) -> Option<SectionInfo> {
        // Distinct ranges so every block gets its own id.
        let n = self.sections.get();
        self.sections.set(n + 1);
        let line = n * 4;
        Some(SectionInfo {
            text: String::new(),
            line_start: line,
            line_end: line + 3,
        })
    }
    fn editor_text(&self, _: LeafId) -> Option<String> {
        None
    }
    fn editor_offset_at(&self, _: LeafId, _: NodeId) -> Option<usize> {
        None
    }
    fn is_mobile(&self) -> bool {
        false
    }
    fn fetch(&mut self, _: &str) -> Result<Vec<u8>, HostError> {
        Ok(Vec::new())
    }
    fn save_file(&mut self, _: &str, _: &[u8]) -> Result<(), HostError> {
        Ok(())
    }
    fn write_clipboard_text(&mut self, _: &str) -> Result<(), HostError> {
        Ok(())
    }
    fn write_clipboard_image(&mut self, _: &[u8], _: &str) -> Result<(), HostError> {
        Ok(())
    }
    fn set_fullscreen(&mut self, _: NodeId, _: bool) -> Result<(), HostError> {
        Ok(())
    }
    fn notice(&mut self, _: &str) {}
}

/// An engine with `diagrams` sections waiting for their renderer.
fn pending(diagrams: usize) -> (DiagramZoom<QuietHost>, Vec<NodeId>) {
    let mut zoom = DiagramZoom::new(Settings::default(), QuietHost::default()).unwrap();
    let root = zoom.document().root();
    zoom.on_leaf_activated(LEAF, ViewMode::Preview, root);
    let mut blocks = Vec::with_capacity(diagrams);
    for _ in 0..diagrams {
        let doc = zoom.document_mut();
        let section = doc.create_element("div");
        let block = doc.create_element("div");
        doc.add_class(block, "mermaid");
        doc.append_child(section, block);
        doc.append_child(root, section);
        zoom.on_preview_rendered(LEAF, section);
        blocks.push(block);
    }
    (zoom, blocks)
}

fn bench_render_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("detection/render_burst");
    for diagrams in [8usize, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(diagrams), &diagrams, |b, &n| {
            b.iter_batched(
                || pending(n),
                |(mut zoom, blocks)| {
                    for block in blocks {
                        let doc = zoom.document_mut();
                        let svg = doc.create_element("svg");
                        doc.append_child(block, svg);
                    }
                    zoom.pump();
                    assert_eq!(zoom.state().container_count(), n);
                    zoom
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render_burst);
criterion_main!(benches);
