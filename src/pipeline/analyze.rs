//! Orchestrates: chapters -> events -> InteractionGraph -> MetricsReport.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::{
    analysis::{MetricsEngine, MetricsReport},
    config::CharnetConfig,
    corpus::Chapter,
    errors::{CharnetError, Result},
    extract::{CueDetector, EventRecord, ExtractionDiagnostics, InteractionEvent, InteractionExtractor},
    graph::{EdgeRecord, InteractionGraph, InteractionGraphBuilder, PairAccumulator},
    pipeline::ChapterProfile,
    registry::CharacterRegistry,
};

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Events in chapter order.
    pub events: Vec<InteractionEvent>,
    /// Frozen interaction graph.
    pub graph: InteractionGraph,
    /// Metrics over the graph.
    pub report: MetricsReport,
    /// Extraction statistics and chapter failures.
    pub diagnostics: ExtractionDiagnostics,
    /// Profiles of the processed chapters, in chapter order.
    pub chapters: Vec<ChapterProfile>,
}

impl PipelineOutput {
    /// Rows for `interactions.json`.
    pub fn edge_records(&self) -> Vec<EdgeRecord> {
        self.graph.edge_records()
    }

    /// Rows for `events.json`.
    pub fn event_records(&self, registry: &CharacterRegistry) -> Vec<EventRecord> {
        self.events.iter().map(|e| e.to_record(registry)).collect()
    }
}

/// High-level pipeline: chapters -> events -> graph -> metrics.
#[derive(Debug)]
pub struct AnalysisPipeline<'r> {
    config: CharnetConfig,
    extractor: InteractionExtractor<'r>,
    engine: MetricsEngine,
}

impl<'r> AnalysisPipeline<'r> {
    /// Validate the configuration and set up every stage.
    pub fn new(config: CharnetConfig, registry: &'r CharacterRegistry) -> Result<Self> {
        config.validate()?;
        let extractor = InteractionExtractor::new(
            registry,
            config.segmentation.clone(),
            config.extraction.clone(),
        )?;
        let engine = MetricsEngine::new(config.metrics.clone())?;
        Ok(Self {
            config,
            extractor,
            engine,
        })
    }

    /// Replace the cue policy.
    pub fn with_detector(mut self, detector: impl CueDetector + 'static) -> Self {
        self.extractor = self.extractor.with_detector(detector);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &CharnetConfig {
        &self.config
    }

    /// The registry all stages share.
    pub fn registry(&self) -> &'r CharacterRegistry {
        self.extractor.registry()
    }

    /// Run every stage. Chapters that fail to load, or repeat an earlier
    /// chapter number, are recorded in the diagnostics and skipped.
    pub fn run(&self, chapters: impl IntoIterator<Item = Result<Chapter>>) -> Result<PipelineOutput> {
        let mut diagnostics = ExtractionDiagnostics::default();
        let mut seen = BTreeSet::new();
        let mut accepted = Vec::new();

        for item in chapters {
            match item {
                Ok(chapter) => {
                    if seen.insert(chapter.number) {
                        accepted.push(chapter);
                    } else {
                        tracing::warn!("duplicate chapter {} skipped", chapter.number);
                        diagnostics.record_failure(Some(chapter.number), "duplicate chapter number");
                    }
                }
                Err(CharnetError::Chapter { chapter, reason }) => {
                    tracing::warn!("chapter {} failed: {}", chapter, reason);
                    diagnostics.record_failure(Some(chapter), reason);
                }
                Err(e) => {
                    tracing::warn!("chapter input failed: {}", e);
                    diagnostics.record_failure(None, e.to_string());
                }
            }
        }
        accepted.sort_by_key(|c| c.number);

        tracing::info!("extracting interactions from {} chapters", accepted.len());
        let registry = self.registry();
        let per_chapter: Vec<_> = accepted
            .par_iter()
            .map(|chapter| {
                let extraction = self.extractor.extract_chapter(chapter.number, &chapter.text);
                let stats = PairAccumulator::from_chapter(&extraction);
                let profile = ChapterProfile::new(
                    chapter.number,
                    &chapter.text,
                    extraction.diagnostics.segments,
                    registry,
                );
                (extraction, stats, profile)
            })
            .collect();

        let mut events = Vec::new();
        let mut profiles = Vec::with_capacity(per_chapter.len());
        let mut builder = InteractionGraphBuilder::new(registry);
        for (extraction, stats, profile) in per_chapter {
            events.extend(extraction.events);
            diagnostics.merge(extraction.diagnostics);
            builder.ingest_stats(stats);
            profiles.push(profile);
        }

        let graph = builder.finalize()?;
        let report = self.engine.analyze(&graph);

        tracing::info!(
            "pipeline done: {} events, {} crowd scenes, {} failures",
            events.len(),
            diagnostics.crowd_scene_count(),
            diagnostics.failures.len()
        );

        Ok(PipelineOutput {
            events,
            graph,
            report,
            diagnostics,
            chapters: profiles,
        })
    }
}
