use serde::{Deserialize, Serialize};

use crate::{
    registry::CharacterRegistry,
    types::{CharacterPair, InteractionKind, SegmentRef},
};

/// One co-presence of two characters in one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionEvent {
    /// The two characters.
    pub pair: CharacterPair,
    /// Where the interaction happened.
    pub segment: SegmentRef,
    /// Weight contribution.
    pub weight: f64,
    /// Cue label the weight was derived from.
    pub kind: InteractionKind,
}

impl InteractionEvent {
    /// Serializable form with canonical ids.
    pub fn to_record(&self, registry: &CharacterRegistry) -> EventRecord {
        EventRecord {
            character_a: registry.id(self.pair.low()).to_string(),
            character_b: registry.id(self.pair.high()).to_string(),
            chapter: self.segment.chapter,
            segment_index: self.segment.index,
            weight: self.weight,
            kind: self.kind,
        }
    }
}

/// Row of `events.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Endpoint with the smaller id.
    pub character_a: String,
    /// Endpoint with the larger id.
    pub character_b: String,
    /// Chapter number.
    pub chapter: u32,
    /// Segment index within the chapter.
    pub segment_index: usize,
    /// Weight contribution.
    pub weight: f64,
    /// Cue label.
    pub kind: InteractionKind,
}
