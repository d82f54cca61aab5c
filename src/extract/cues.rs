//! Dialogue / action cue detection.

use std::fmt;
use std::ops::Range;

use crate::{config::CueConfig, segment::Segment, types::InteractionKind};

/// Cue classification of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentCues {
    /// Kind applied to every event of the segment.
    pub kind: InteractionKind,
    /// Speech verbs with no character mention close enough to be the speaker.
    pub unresolved_speakers: usize,
}

impl Default for SegmentCues {
    fn default() -> Self {
        Self {
            kind: InteractionKind::CoOccurrence,
            unresolved_speakers: 0,
        }
    }
}

/// Policy deciding how a segment's co-presence should be weighted.
pub trait CueDetector: Send + Sync + fmt::Debug {
    /// Classify a segment.
    fn detect(&self, segment: &Segment<'_>) -> SegmentCues;
}

/// Verb-proximity heuristic.
///
/// A speech verb within `max_speaker_gap` non-space characters of a mention
/// (either side) makes the segment dialogue; otherwise any action verb makes
/// it an action; otherwise it is plain co-occurrence. ASCII verbs are matched
/// case-insensitively on word boundaries, other verbs anywhere outside a
/// mention.
#[derive(Debug, Clone)]
pub struct SpeechCueDetector {
    speech_verbs: Vec<String>,
    action_verbs: Vec<String>,
    max_gap: usize,
}

impl SpeechCueDetector {
    /// Build from a cue vocabulary.
    pub fn new(config: &CueConfig) -> Self {
        let lower = |verbs: &[String]| -> Vec<String> {
            let mut out: Vec<String> = verbs.iter().map(|v| v.to_ascii_lowercase()).collect();
            out.sort();
            out.dedup();
            out
        };
        Self {
            speech_verbs: lower(&config.speech_verbs),
            action_verbs: lower(&config.action_verbs),
            max_gap: config.max_speaker_gap,
        }
    }

    fn gap(&self, text: &str, from: usize, to: usize) -> bool {
        from <= to && text[from..to].chars().filter(|c| !c.is_whitespace()).count() <= self.max_gap
    }
}

impl CueDetector for SpeechCueDetector {
    fn detect(&self, segment: &Segment<'_>) -> SegmentCues {
        let haystack = segment.text.to_ascii_lowercase();
        let mut attributed = false;
        let mut unresolved = 0;

        for verb in occurrences(&self.speech_verbs, &haystack, segment) {
            let has_speaker = segment.mentions.iter().any(|m| {
                self.gap(segment.text, m.end, verb.start) || self.gap(segment.text, verb.end, m.start)
            });
            if has_speaker {
                attributed = true;
            } else {
                unresolved += 1;
            }
        }

        let kind = if attributed {
            InteractionKind::Dialogue
        } else if !occurrences(&self.action_verbs, &haystack, segment).is_empty() {
            InteractionKind::Action
        } else {
            InteractionKind::CoOccurrence
        };

        SegmentCues {
            kind,
            unresolved_speakers: unresolved,
        }
    }
}

/// Verb occurrences in `haystack` that do not overlap a mention.
fn occurrences(verbs: &[String], haystack: &str, segment: &Segment<'_>) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    for verb in verbs {
        for (i, v) in haystack.match_indices(verb.as_str()) {
            let span = i..i + v.len();
            if verb.is_ascii() && !on_word_boundary(haystack, &span) {
                continue;
            }
            if segment
                .mentions
                .iter()
                .any(|m| m.start < span.end && span.start < m.end)
            {
                continue;
            }
            out.push(span);
        }
    }
    out
}

fn on_word_boundary(text: &str, span: &Range<usize>) -> bool {
    let before = text[..span.start].chars().next_back();
    let after = text[span.end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}
