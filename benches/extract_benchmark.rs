//! Benchmarks for the encoding, labeling, and hierarchy stages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pdfoutline::{
    encode, hierarchy, BBox, HeuristicModel, Label, SequenceModel, TextLine,
};

/// Synthetic document: repeated chapter/section/body structure.
fn synthetic_lines(count: usize) -> Vec<TextLine> {
    (0..count)
        .map(|i| {
            let (text, font_size, bold) = match i % 20 {
                0 => ("Chapter on telemetry methods", 18.0, true),
                5 | 12 => ("2.1 Section on data collection", 14.0, true),
                _ => (
                    "Observations were logged nightly and cross-checked against weather data.",
                    11.0,
                    false,
                ),
            };
            let y0 = 72.0 + (i % 40) as f32 * 16.0;
            TextLine {
                page: (i / 40) as u32,
                text: text.to_string(),
                bbox: BBox::new(72.0, y0, 500.0, y0 + font_size),
                font_size,
                bold,
                italic: false,
                indent: 0.0,
                gap_before: if i % 20 == 0 { 28.0 } else { 14.0 },
                first_on_page: i % 40 == 0,
                page_width: 612.0,
                page_height: 792.0,
            }
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let lines = synthetic_lines(400);
    c.bench_function("encode_400_lines", |b| {
        b.iter(|| encode(black_box(&lines)))
    });
}

fn bench_label(c: &mut Criterion) {
    let lines = synthetic_lines(400);
    let features = encode(&lines);
    let model = HeuristicModel::new();
    c.bench_function("heuristic_label_400_lines", |b| {
        b.iter(|| model.predict(black_box(&features)).unwrap())
    });
}

fn bench_build(c: &mut Criterion) {
    let lines = synthetic_lines(400);
    let features = encode(&lines);
    let model = HeuristicModel::new();
    let labels = model.predict(&features).unwrap();
    let labeled: Vec<(TextLine, Label)> = lines.into_iter().zip(labels).collect();

    c.bench_function("build_outline_400_lines", |b| {
        b.iter(|| hierarchy::build(black_box(&labeled)))
    });
}

criterion_group!(benches, bench_encode, bench_label, bench_build);
criterion_main!(benches);
