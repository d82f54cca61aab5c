//! Segments → pairwise interaction events.

use std::collections::BTreeMap;

use crate::{
    config::{ExtractionConfig, SegmentationConfig},
    errors::Result,
    extract::{
        CrowdScene, CueDetector, ExtractionDiagnostics, InteractionEvent, SpeechCueDetector,
    },
    registry::CharacterRegistry,
    segment::{Segment, Segmenter},
    types::{CharacterPair, InteractionKind},
};

/// Events and statistics for one chapter.
#[derive(Debug, Clone, Default)]
pub struct ChapterExtraction {
    /// Chapter number.
    pub chapter: u32,
    /// Events in segment order, pairs in canonical order within a segment.
    pub events: Vec<InteractionEvent>,
    /// Per-chapter statistics.
    pub diagnostics: ExtractionDiagnostics,
    /// Trimmed text of every segment that produced events, by segment index.
    pub excerpts: BTreeMap<usize, String>,
}

/// Turns chapter text into interaction events.
#[derive(Debug)]
pub struct InteractionExtractor<'r> {
    segmenter: Segmenter<'r>,
    config: ExtractionConfig,
    detector: Box<dyn CueDetector>,
}

impl<'r> InteractionExtractor<'r> {
    /// Create an extractor with the default [`SpeechCueDetector`].
    pub fn new(
        registry: &'r CharacterRegistry,
        segmentation: SegmentationConfig,
        extraction: ExtractionConfig,
    ) -> Result<Self> {
        extraction.validate()?;
        let detector = Box::new(SpeechCueDetector::new(&extraction.cues));
        Ok(Self {
            segmenter: Segmenter::new(registry, segmentation)?,
            config: extraction,
            detector,
        })
    }

    /// Replace the cue policy.
    pub fn with_detector(mut self, detector: impl CueDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// The segmenter in use.
    pub fn segmenter(&self) -> &Segmenter<'r> {
        &self.segmenter
    }

    /// The registry events are keyed against.
    pub fn registry(&self) -> &'r CharacterRegistry {
        self.segmenter.registry()
    }

    /// Segment and extract one chapter.
    pub fn extract_chapter(&self, chapter: u32, text: &str) -> ChapterExtraction {
        let mut events = Vec::new();
        let mut excerpts = BTreeMap::new();
        let mut diagnostics = ExtractionDiagnostics {
            chapters_processed: 1,
            ..ExtractionDiagnostics::default()
        };

        for segment in self.segmenter.segments(chapter, text) {
            if self.extract_segment(&segment, &mut events, &mut diagnostics) {
                excerpts.insert(segment.index, segment.text.trim().to_string());
            }
        }

        diagnostics.events = events.len();
        tracing::debug!(
            "chapter {}: {} segments, {} events, {} crowd scenes",
            chapter,
            diagnostics.segments,
            events.len(),
            diagnostics.crowd_scene_count()
        );

        ChapterExtraction {
            chapter,
            events,
            diagnostics,
            excerpts,
        }
    }

    /// Returns whether the segment emitted events.
    fn extract_segment(
        &self,
        segment: &Segment<'_>,
        events: &mut Vec<InteractionEvent>,
        diagnostics: &mut ExtractionDiagnostics,
    ) -> bool {
        diagnostics.segments += 1;
        diagnostics.mentions += segment.mentions.len();
        if segment.characters.is_empty() {
            return false;
        }
        diagnostics.segments_with_characters += 1;

        let cues = self.detector.detect(segment);
        diagnostics.unresolved_speakers += cues.unresolved_speakers;

        if segment.characters.len() < 2 {
            return false;
        }

        let mut present = segment.characters.clone();
        present.sort_unstable();

        if present.len() > self.config.max_characters_per_segment {
            let registry = self.registry();
            diagnostics.crowd_scenes.push(CrowdScene {
                chapter: segment.chapter,
                segment_index: segment.index,
                characters: present.iter().map(|&k| registry.id(k).to_string()).collect(),
            });
            return false;
        }

        let weight = self.config.base_weight * self.multiplier(cues.kind);
        let location = segment.location();
        for (i, &a) in present.iter().enumerate() {
            for &b in &present[i + 1..] {
                if let Some(pair) = CharacterPair::new(a, b) {
                    events.push(InteractionEvent {
                        pair,
                        segment: location,
                        weight,
                        kind: cues.kind,
                    });
                }
            }
        }
        diagnostics.interacting_segments += 1;
        true
    }

    fn multiplier(&self, kind: InteractionKind) -> f64 {
        match kind {
            InteractionKind::Dialogue => self.config.dialogue_multiplier,
            InteractionKind::Action => self.config.action_multiplier,
            InteractionKind::CoOccurrence => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use crate::extract::SegmentCues;
    use crate::registry::DictionaryEntry;
    use crate::types::SegmentRef;

    fn registry(n: usize) -> CharacterRegistry {
        let entries = (0..n)
            .map(|i| DictionaryEntry::new(format!("c{i:02}"), [format!("Name{i:02}")]))
            .collect();
        CharacterRegistry::new(entries, &RegistryConfig::default()).unwrap()
    }

    fn extractor(reg: &CharacterRegistry) -> InteractionExtractor<'_> {
        InteractionExtractor::new(reg, SegmentationConfig::default(), ExtractionConfig::default())
            .unwrap()
    }

    #[test]
    fn three_characters_give_three_pairs() {
        let reg = registry(3);
        let out = extractor(&reg).extract_chapter(1, "Name02 and Name00 with Name01.");
        let pairs: Vec<_> = out
            .events
            .iter()
            .map(|e| (reg.id(e.pair.low()), reg.id(e.pair.high())))
            .collect();
        assert_eq!(pairs, vec![("c00", "c01"), ("c00", "c02"), ("c01", "c02")]);
        assert!(out.events.iter().all(|e| e.weight == 1.0));
        assert!(out.events.iter().all(|e| e.segment == SegmentRef { chapter: 1, index: 0 }));
        assert_eq!(out.diagnostics.events, 3);
        assert_eq!(out.diagnostics.interacting_segments, 1);
    }

    #[test]
    fn dialogue_cue_doubles_weight() {
        let reg = registry(2);
        let out = extractor(&reg).extract_chapter(1, "Name00 said hi to Name01.");
        assert_eq!(out.events.len(), 1);
        assert_eq!(out.events[0].kind, InteractionKind::Dialogue);
        assert_eq!(out.events[0].weight, 2.0);
    }

    #[test]
    fn crowd_scene_is_skipped_and_listed() {
        let reg = registry(10);
        let text: Vec<String> = (0..9).map(|i| format!("Name{i:02}")).collect();
        let text = format!("{}.", text.join(" "));
        let out = extractor(&reg).extract_chapter(4, &text);
        assert!(out.events.is_empty());
        assert_eq!(out.diagnostics.crowd_scene_count(), 1);
        let scene = &out.diagnostics.crowd_scenes[0];
        assert_eq!(scene.chapter, 4);
        assert_eq!(scene.characters.len(), 9);
        assert_eq!(scene.characters[0], "c00");
    }

    #[test]
    fn segment_cap_is_inclusive() {
        let reg = registry(8);
        let names: Vec<String> = (0..8).map(|i| format!("Name{i:02}")).collect();
        let text = format!("{} gathered.", names.join(", "));
        let out = extractor(&reg).extract_chapter(1, &text);
        assert_eq!(out.events.len(), 28);
        assert_eq!(out.diagnostics.crowd_scene_count(), 0);
        assert_eq!(out.diagnostics.interacting_segments, 1);
    }

    #[test]
    fn abbreviated_alias_interacts_like_full_name() {
        let reg = CharacterRegistry::new(
            vec![
                DictionaryEntry::new("A", ["Alice", "A."]),
                DictionaryEntry::new("B", ["Bob"]),
            ],
            &RegistryConfig::default(),
        )
        .unwrap();
        let ex = extractor(&reg);
        let short = ex.extract_chapter(1, "A. met Bob.");
        let long = ex.extract_chapter(1, "Alice met Bob.");
        assert_eq!(short.events.len(), 1);
        assert_eq!(short.events, long.events);
        assert_eq!(short.events[0].kind, InteractionKind::Action);
        assert_eq!(short.excerpts[&0], "A. met Bob.");
    }

    #[test]
    fn word_gaps_do_not_create_mentions() {
        let reg = CharacterRegistry::new(
            vec![DictionaryEntry::new("A", ["Ada"]), DictionaryEntry::new("B", ["Bob"])],
            &RegistryConfig::default(),
        )
        .unwrap();
        let out = extractor(&reg).extract_chapter(1, "Bob ate bread and jam.");
        assert!(out.events.is_empty());
        assert!(out.excerpts.is_empty());
        assert_eq!(out.diagnostics.mentions, 1);
    }

    #[test]
    fn excerpts_cover_interacting_segments_only() {
        let reg = registry(3);
        let out = extractor(&reg)
            .extract_chapter(2, "Name00 walked.  Name01 met Name02. Name00 and Name02 smiled.");
        let keys: Vec<_> = out.excerpts.keys().copied().collect();
        assert_eq!(keys, vec![1, 2]);
        assert_eq!(out.excerpts[&1], "Name01 met Name02.");
    }

    #[test]
    fn single_character_and_empty_segments_emit_nothing() {
        let reg = registry(2);
        let out = extractor(&reg).extract_chapter(1, "Name00 walked. Nobody came. Name00 left.");
        assert!(out.events.is_empty());
        assert_eq!(out.diagnostics.segments, 3);
        assert_eq!(out.diagnostics.segments_with_characters, 2);
        assert_eq!(out.diagnostics.mentions, 2);
    }

    #[test]
    fn extraction_is_repeatable() {
        let reg = registry(4);
        let ex = extractor(&reg);
        let text = "Name03 met Name01. Name00 said to Name02 and Name01. Name02 and Name03.";
        let a = ex.extract_chapter(7, text);
        let b = ex.extract_chapter(7, text);
        assert_eq!(a.events, b.events);
        assert_eq!(a.diagnostics, b.diagnostics);
    }

    #[derive(Debug)]
    struct AlwaysAction;

    impl CueDetector for AlwaysAction {
        fn detect(&self, _segment: &Segment<'_>) -> SegmentCues {
            SegmentCues {
                kind: InteractionKind::Action,
                unresolved_speakers: 0,
            }
        }
    }

    #[test]
    fn custom_detector_drives_weights() {
        let reg = registry(2);
        let config = ExtractionConfig {
            action_multiplier: 1.5,
            ..ExtractionConfig::default()
        };
        let ex = InteractionExtractor::new(&reg, SegmentationConfig::default(), config)
            .unwrap()
            .with_detector(AlwaysAction);
        let out = ex.extract_chapter(1, "Name00 said hi to Name01.");
        assert_eq!(out.events[0].kind, InteractionKind::Action);
        assert_eq!(out.events[0].weight, 1.5);
    }
}
