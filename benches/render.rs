// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dotlens::format::dot::parse_dot;
use dotlens::layout::layout_graph;
use dotlens::model::FileName;
use dotlens::render::render_graph_source;
use dotlens::store::DotFolder;
use dotlens::viewer::Viewer;

mod fixtures;
mod profiler;

const CASES: [fixtures::Case; 5] = [
    fixtures::Case::Small,
    fixtures::Case::MediumDense,
    fixtures::Case::LongChain,
    fixtures::Case::BackEdges,
    fixtures::Case::LongLabels,
];

// Benchmark identity (keep stable):
// - Group names: `render.parse`, `render.layout`, `render.full`, `render.select`
// - Case IDs after the `/` are the `fixtures::Case::id` strings.
fn benches_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render.parse");
    for case in CASES {
        let source = fixtures::source(case);
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let graph = parse_dot(black_box(source.as_str())).expect("parse_dot");
                black_box(graph.nodes().len())
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("render.layout");
    for case in CASES {
        let graph = parse_dot(fixtures::source(case).as_str()).expect("parse_dot");
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let layout = layout_graph(black_box(&graph)).expect("layout_graph");
                black_box(layout.dummy_count())
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("render.full");
    for case in CASES {
        let source = fixtures::source(case);
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let rendered = render_graph_source(black_box(&source)).expect("render");
                black_box(rendered.text.len())
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("render.select");
    let tmp = fixtures::folder(fixtures::Case::MediumDense, 50);
    let mut viewer = Viewer::new(DotFolder::new(tmp.path()));
    let files = viewer.refresh().expect("list").to_vec();
    let target = files.last().cloned().unwrap_or_else(|| FileName::new("graph_000.dot").expect("name"));
    group.bench_function("medium_dense_of_50", |b| {
        b.iter(|| {
            let state = viewer.select(black_box(&target));
            black_box(state.rendered().map(|rendered| rendered.text.len()))
        })
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_render
}
criterion_main!(benches);
