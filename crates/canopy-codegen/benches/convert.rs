//! Conversion benchmarks.

use canopy_codegen::{convert, Backend, ConvertOptions};
use canopy_core::source::{LayoutMode, NodeType, SourceDocument, SourceNode};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn card(id: usize) -> SourceNode {
    SourceNode::new(format!("{id}:1"), format!("Card {id}"), NodeType::Frame)
        .with_auto_layout(LayoutMode::Vertical, 8.0)
        .with_child(SourceNode::text(format!("{id}:2"), "Title", "Heading"))
        .with_child(SourceNode::text(format!("{id}:3"), "Body", "Lorem ipsum dolor sit amet"))
}

fn list_document(cards: usize) -> SourceDocument {
    let mut list = SourceNode::new("0:2", "Card List", NodeType::Component).with_auto_layout(LayoutMode::Vertical, 16.0);
    for i in 0..cards {
        list = list.with_child(card(i + 10));
    }
    let page = SourceNode::new("0:1", "Page", NodeType::Canvas).with_child(list);
    SourceDocument::from_root(page)
}

fn convert_small(c: &mut Criterion) {
    let doc = list_document(3);
    c.bench_function("convert_small", |b| {
        b.iter(|| convert(black_box(&doc), ConvertOptions::default()))
    });
}

fn convert_backends(c: &mut Criterion) {
    let doc = list_document(50);
    for backend in Backend::ALL {
        let options = ConvertOptions { backend, ..ConvertOptions::default() };
        c.bench_function(&format!("convert_50_cards_{}", backend), |b| {
            b.iter(|| convert(black_box(&doc), options.clone()))
        });
    }
}

criterion_group!(benches, convert_small, convert_backends);
criterion_main!(benches);
