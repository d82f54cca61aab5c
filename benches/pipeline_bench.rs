use criterion::{black_box, criterion_group, criterion_main, Criterion};

use charnet_core::{
    analysis::MetricsEngine,
    corpus::Chapter,
    graph::build,
    registry::DictionaryEntry,
    AnalysisPipeline, CharacterRegistry, CharnetConfig,
};

const NAMES: [&str; 12] = [
    "寶玉", "黛玉", "寶釵", "襲人", "鳳姐", "賈母", "探春", "湘雲", "晴雯", "平兒", "紫鵑", "李紈",
];

fn registry() -> CharacterRegistry {
    let entries = NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| DictionaryEntry::new(format!("c{i:02}"), [*name]))
        .collect();
    CharacterRegistry::new(entries, &CharnetConfig::default().registry).unwrap()
}

fn corpus(chapters: u32, sentences: usize) -> Vec<Chapter> {
    (1..=chapters)
        .map(|ch| {
            let mut text = String::new();
            for s in 0..sentences {
                let a = NAMES[(s * 7 + ch as usize) % NAMES.len()];
                let b = NAMES[(s * 3 + 1) % NAMES.len()];
                let verb = if s % 3 == 0 { "笑道" } else { "見了" };
                text.push_str(&format!("{a}{verb}{b}，說了幾句閒話。"));
            }
            Chapter::new(ch, text)
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let reg = registry();
    let chapters = corpus(40, 200);
    let pipeline = AnalysisPipeline::new(CharnetConfig::default(), &reg).unwrap();

    c.bench_function("full_pipeline_40_chapters", |b| {
        b.iter(|| {
            let out = pipeline
                .run(black_box(chapters.clone()).into_iter().map(Ok))
                .unwrap();
            black_box(out.report.summary.edge_count)
        })
    });

    let out = pipeline.run(chapters.into_iter().map(Ok)).unwrap();
    let engine = MetricsEngine::default();
    c.bench_function("build_and_analyze", |b| {
        b.iter(|| {
            let graph = build(&reg, black_box(&out.events)).unwrap();
            black_box(engine.analyze(&graph))
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
