//! Benchmarks for document rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mdpage::app::{Message, Model, update};
use mdpage::render::{RenderOptions, Renderer, TerminalRenderer};

fn bench_render_guide(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/guide.md");
    let options = RenderOptions::default().with_width(80);
    c.bench_function("render_guide", |b| {
        b.iter(|| TerminalRenderer.render(black_box(md), &options).unwrap())
    });
}

fn bench_resize_rerender(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/guide.md");
    c.bench_function("resize_rerender", |b| {
        b.iter_with_setup(
            || {
                Model::new(
                    "guide.md",
                    md,
                    RenderOptions::default(),
                    Box::new(TerminalRenderer),
                    (100, 30),
                )
            },
            |model| update(model, black_box(Message::Resize(60, 30))),
        )
    });
}

criterion_group!(benches, bench_render_guide, bench_resize_rerender);
criterion_main!(benches);
