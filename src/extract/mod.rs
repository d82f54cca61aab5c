//! Interaction extraction: segments → character-pair events.

pub mod cues;
/// Extraction statistics and non-fatal anomalies.
pub mod diagnostics;
/// Event types.
pub mod event;
pub mod extractor;

pub use cues::{CueDetector, SegmentCues, SpeechCueDetector};
pub use diagnostics::{ChapterFailure, CrowdScene, ExtractionDiagnostics};
pub use event::{EventRecord, InteractionEvent};
pub use extractor::{ChapterExtraction, InteractionExtractor};
