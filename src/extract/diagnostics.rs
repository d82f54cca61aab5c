use serde::{Deserialize, Serialize};

/// Segment skipped for having too many characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrowdScene {
    /// Chapter number.
    pub chapter: u32,
    /// Segment index within the chapter.
    pub segment_index: usize,
    /// Canonical ids present, in id order.
    pub characters: Vec<String>,
}

/// Chapter that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterFailure {
    /// Chapter number, when it was known.
    pub chapter: Option<u32>,
    /// Human-readable cause.
    pub reason: String,
}

/// Non-fatal extraction statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionDiagnostics {
    /// Chapters that were segmented.
    pub chapters_processed: usize,
    /// Segments produced.
    pub segments: usize,
    /// Segments mentioning at least one character.
    pub segments_with_characters: usize,
    /// Segments that produced events.
    pub interacting_segments: usize,
    /// Resolved alias occurrences.
    pub mentions: usize,
    /// Speech cues with no speaker in range.
    pub unresolved_speakers: usize,
    /// Events emitted.
    pub events: usize,
    /// Segments over the character cap.
    pub crowd_scenes: Vec<CrowdScene>,
    /// Chapters that failed to load or were rejected.
    pub failures: Vec<ChapterFailure>,
}

impl ExtractionDiagnostics {
    /// Fold another chapter's statistics into this one.
    pub fn merge(&mut self, other: ExtractionDiagnostics) {
        self.chapters_processed += other.chapters_processed;
        self.segments += other.segments;
        self.segments_with_characters += other.segments_with_characters;
        self.interacting_segments += other.interacting_segments;
        self.mentions += other.mentions;
        self.unresolved_speakers += other.unresolved_speakers;
        self.events += other.events;
        self.crowd_scenes.extend(other.crowd_scenes);
        self.failures.extend(other.failures);
    }

    /// Record a chapter failure.
    pub fn record_failure(&mut self, chapter: Option<u32>, reason: impl Into<String>) {
        self.failures.push(ChapterFailure {
            chapter,
            reason: reason.into(),
        });
    }

    /// Number of crowd scenes.
    pub fn crowd_scene_count(&self) -> usize {
        self.crowd_scenes.len()
    }
}
