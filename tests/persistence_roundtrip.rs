use charnet_core::{
    corpus::Chapter,
    persistence::{self, ArtifactMetadata},
    registry::DictionaryEntry,
    AnalysisPipeline, CharacterRegistry, CharnetConfig,
};

fn analyzed() -> (CharnetConfig, CharacterRegistry, Vec<Chapter>) {
    let config = CharnetConfig::default();
    let registry = CharacterRegistry::new(
        vec![
            DictionaryEntry::new("A", ["Alice"]).with_name("Alice Liddell"),
            DictionaryEntry::new("B", ["Bob"]).with_affiliation("Builders"),
            DictionaryEntry::new("C", ["Carol"]),
        ],
        &config.registry,
    )
    .unwrap();
    let chapters = vec![
        Chapter::new(1, "Alice met Bob. Bob said hi to Carol."),
        Chapter::new(2, "Carol and Alice walked. Bob stayed."),
    ];
    (config, registry, chapters)
}

#[test]
fn artifacts_round_trip() {
    let (config, registry, chapters) = analyzed();
    let pipeline = AnalysisPipeline::new(config.clone(), &registry).unwrap();
    let output = pipeline.run(chapters.into_iter().map(Ok)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let metadata = ArtifactMetadata::new(&config, &registry, &output);
    persistence::save_artifacts(dir.path(), &metadata, &registry, &output, true).unwrap();

    for name in [
        "metadata.json",
        "interactions.json",
        "events.json",
        "metrics.json",
        "diagnostics.json",
        "chapters.json",
    ] {
        assert!(dir.path().join(name).exists(), "{name} missing");
    }

    assert_eq!(persistence::load_metrics(dir.path()).unwrap(), output.report);
    assert_eq!(persistence::load_interactions(dir.path()).unwrap(), output.edge_records());

    let loaded = persistence::load_metadata(dir.path()).unwrap();
    assert_eq!(loaded.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(loaded.config, config);
    assert_eq!(loaded.chapters, vec![1, 2]);
    assert_eq!(loaded.dictionary_characters, 3);
}

#[test]
fn events_file_is_optional() {
    let (config, registry, chapters) = analyzed();
    let pipeline = AnalysisPipeline::new(config.clone(), &registry).unwrap();
    let output = pipeline.run(chapters.into_iter().map(Ok)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("out");
    let metadata = ArtifactMetadata::new(&config, &registry, &output);
    persistence::save_artifacts(&out, &metadata, &registry, &output, false).unwrap();

    assert!(out.join("interactions.json").exists());
    assert!(!out.join("events.json").exists());
}

#[test]
fn loading_from_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = persistence::load_metrics(&dir.path().join("absent")).unwrap_err();
    assert!(err.to_string().contains("metrics.json"));
}
