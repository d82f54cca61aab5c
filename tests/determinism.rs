use charnet_core::{
    config::{SegmentUnit, SegmentationConfig},
    corpus::Chapter,
    graph::{build, EdgeRecord, InteractionGraph},
    registry::DictionaryEntry,
    AnalysisPipeline, CharacterRegistry, CharnetConfig,
};

fn registry() -> CharacterRegistry {
    let entries = vec![
        DictionaryEntry::new("baoyu", ["寶玉", "寶二爺"]),
        DictionaryEntry::new("daiyu", ["黛玉", "林妹妹", "顰兒"]),
        DictionaryEntry::new("baochai", ["寶釵", "寶姐姐"]),
        DictionaryEntry::new("xiren", ["襲人"]),
        DictionaryEntry::new("xifeng", ["鳳姐", "鳳丫頭"]),
        DictionaryEntry::new("jiamu", ["賈母", "老太太"]),
    ];
    CharacterRegistry::new(entries, &CharnetConfig::default().registry).unwrap()
}

fn corpus() -> Vec<Chapter> {
    vec![
        Chapter::new(3, "賈母見了黛玉，便叫寶玉來。寶玉笑道：「這個妹妹我見過的。」襲人在旁。"),
        Chapter::new(8, "寶玉去看寶姐姐。寶釵問道：「林妹妹可好？」黛玉走來，寶玉與寶釵都笑了。"),
        Chapter::new(27, "鳳姐送了老太太一盒點心。顰兒獨自葬花，寶二爺聽見了。"),
        Chapter::new(34, "襲人勸寶玉。寶釵送藥來。黛玉哭了。鳳丫頭與賈母說笑。"),
    ]
}

fn run(registry: &CharacterRegistry, config: CharnetConfig, chapters: Vec<Chapter>) -> String {
    let pipeline = AnalysisPipeline::new(config, registry).unwrap();
    let out = pipeline.run(chapters.into_iter().map(Ok)).unwrap();
    serde_json::to_string(&(
        out.edge_records(),
        out.event_records(registry),
        &out.report,
        &out.diagnostics,
        &out.chapters,
    ))
    .unwrap()
}

#[test]
fn repeated_runs_are_identical() {
    let reg = registry();
    let first = run(&reg, CharnetConfig::default(), corpus());
    for _ in 0..5 {
        assert_eq!(first, run(&reg, CharnetConfig::default(), corpus()));
    }
}

#[test]
fn chapter_input_order_does_not_matter() {
    let reg = registry();
    let mut reversed = corpus();
    reversed.reverse();
    assert_eq!(
        run(&reg, CharnetConfig::default(), corpus()),
        run(&reg, CharnetConfig::default(), reversed)
    );
}

#[test]
fn window_mode_is_deterministic_too() {
    let reg = registry();
    let mut config = CharnetConfig::default();
    config.segmentation = SegmentationConfig {
        unit: SegmentUnit::Window { size: 12, stride: 6 },
        ..SegmentationConfig::default()
    };
    let a = run(&reg, config.clone(), corpus());
    let b = run(&reg, config, corpus());
    assert_eq!(a, b);
}

/// Edge rows without context excerpts, which raw events do not carry.
fn without_contexts(graph: &InteractionGraph) -> Vec<EdgeRecord> {
    let mut records = graph.edge_records();
    records.iter_mut().for_each(|r| r.contexts.clear());
    records
}

#[test]
fn permuted_events_build_the_same_graph() {
    let reg = registry();
    let pipeline = AnalysisPipeline::new(CharnetConfig::default(), &reg).unwrap();
    let out = pipeline.run(corpus().into_iter().map(Ok)).unwrap();
    assert!(!out.events.is_empty());

    let mut events = out.events.clone();
    events.reverse();
    let reversed = build(&reg, &events).unwrap();

    let mut interleaved: Vec<_> = events.iter().step_by(2).copied().collect();
    interleaved.extend(events.iter().skip(1).step_by(2).copied());
    let shuffled = build(&reg, &interleaved).unwrap();

    let expected = without_contexts(&out.graph);
    assert!(out.edge_records().iter().all(|r| !r.contexts.is_empty()));
    assert_eq!(expected, without_contexts(&reversed));
    assert_eq!(expected, without_contexts(&shuffled));
    for (a, b) in expected.iter().zip(shuffled.edge_records()) {
        assert_eq!(a.weight.to_bits(), b.weight.to_bits());
    }
}

#[test]
fn no_self_loops_and_exact_sums() {
    let reg = registry();
    let pipeline = AnalysisPipeline::new(CharnetConfig::default(), &reg).unwrap();
    let out = pipeline.run(corpus().into_iter().map(Ok)).unwrap();

    for edge in out.edge_records() {
        assert_ne!(edge.character_a, edge.character_b);
        let contributing: Vec<_> = out
            .event_records(&reg)
            .into_iter()
            .filter(|e| e.character_a == edge.character_a && e.character_b == edge.character_b)
            .collect();
        assert_eq!(contributing.len(), edge.event_count);
        let sum: f64 = contributing.iter().map(|e| e.weight).sum();
        assert!((sum - edge.weight).abs() < 1e-12);
    }
}
