// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use diagram_zoom_dom::{Document, NodeId, SelectorList};

/// A note with `blocks` paragraphs, every eighth one a rendered diagram.
fn note(blocks: usize) -> (Document, NodeId) {
    let mut doc = Document::new();
    let root = doc.root();
    let section = doc.create_element("div");
    doc.append_child(root, section);
    for i in 0..blocks {
        let block = doc.create_element("div");
        if i % 8 == 0 {
            doc.add_class(block, "mermaid");
            let svg = doc.create_element("svg");
            doc.append_child(block, svg);
        } else {
            doc.add_class(block, "paragraph");
            let text = doc.create_text("lorem ipsum");
            doc.append_child(block, text);
        }
        doc.append_child(section, block);
    }
    (doc, section)
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector/query_selector_all");
    // The default descriptor list, as one comma list.
    let selectors = SelectorList::parse(
        ".diagram, .mermaid, .block-language-plantuml, .block-language-dot, \
         .block-language-kroki, .block-language-mehrmaid",
    )
    .unwrap();

    for blocks in [64usize, 512, 4_096] {
        let (doc, section) = note(blocks);
        group.throughput(Throughput::Elements(blocks as u64));
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &section, |b, &section| {
            b.iter(|| black_box(doc.query_selector_all(section, &selectors)));
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("selector/parse", |b| {
        b.iter(|| SelectorList::parse(black_box("div.block-language-mermaid > svg, img[src]")));
    });
}

criterion_group!(benches, bench_query, bench_parse);
criterion_main!(benches);
