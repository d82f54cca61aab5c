use std::collections::BTreeMap;

use crate::{
    extract::{ChapterExtraction, InteractionEvent},
    graph::InteractionEdge,
    types::{CharacterPair, InteractionKind, SegmentRef},
};

/// Context excerpts kept per edge.
pub const MAX_EDGE_CONTEXTS: usize = 3;

#[derive(Debug, Clone, Copy)]
struct Contribution {
    segment: SegmentRef,
    weight: f64,
    kind: InteractionKind,
}

/// Per-pair event contributions, aggregated on demand.
///
/// Contributions are kept unsummed until [`into_edges`](Self::into_edges) so
/// that the floating-point sum can be taken in a canonical order. Context
/// excerpts are the [`MAX_EDGE_CONTEXTS`] earliest segments of each pair, so
/// merge order never changes the result either.
#[derive(Debug, Clone, Default)]
pub struct PairAccumulator {
    pairs: BTreeMap<CharacterPair, Vec<Contribution>>,
    contexts: BTreeMap<CharacterPair, BTreeMap<SegmentRef, String>>,
}

impl PairAccumulator {
    /// Create a new empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one chapter: its events plus the excerpts of their segments.
    pub fn from_chapter(extraction: &ChapterExtraction) -> Self {
        let mut acc = Self::new();
        for event in &extraction.events {
            acc.add_event(event);
            if let Some(text) = extraction.excerpts.get(&event.segment.index) {
                acc.add_context(event.pair, event.segment, text);
            }
        }
        acc
    }

    /// Record one event.
    pub fn add_event(&mut self, event: &InteractionEvent) {
        self.pairs.entry(event.pair).or_default().push(Contribution {
            segment: event.segment,
            weight: event.weight,
            kind: event.kind,
        });
    }

    /// Offer a context excerpt for a pair; only the earliest segments are kept.
    pub fn add_context(&mut self, pair: CharacterPair, segment: SegmentRef, text: &str) {
        let kept = self.contexts.entry(pair).or_default();
        if kept.len() >= MAX_EDGE_CONTEXTS
            && kept.last_key_value().is_some_and(|(last, _)| segment >= *last)
        {
            return;
        }
        kept.entry(segment).or_insert_with(|| text.to_string());
        if kept.len() > MAX_EDGE_CONTEXTS {
            kept.pop_last();
        }
    }

    /// Merge another accumulator into this one.
    pub fn merge(&mut self, other: PairAccumulator) {
        for (pair, contributions) in other.pairs {
            self.pairs.entry(pair).or_default().extend(contributions);
        }
        for (pair, kept) in other.contexts {
            for (segment, text) in kept {
                self.add_context(pair, segment, &text);
            }
        }
    }

    /// Number of distinct pairs seen.
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Aggregate into edges, in canonical pair order.
    pub fn into_edges(self) -> Vec<(CharacterPair, InteractionEdge)> {
        let mut contexts = self.contexts;
        self.pairs
            .into_iter()
            .map(|(pair, mut contributions)| {
                contributions.sort_by(|a, b| {
                    a.segment
                        .cmp(&b.segment)
                        .then(a.weight.total_cmp(&b.weight))
                        .then(a.kind.cmp(&b.kind))
                });

                let mut weight = 0.0;
                let mut segment_count = 0;
                let (mut dialogue_events, mut action_events, mut co_occurrence_events) = (0, 0, 0);
                let mut chapters: Vec<u32> = Vec::new();
                let mut last_segment = None;

                for c in &contributions {
                    weight += c.weight;
                    if last_segment != Some(c.segment) {
                        segment_count += 1;
                        last_segment = Some(c.segment);
                    }
                    if chapters.last() != Some(&c.segment.chapter) {
                        chapters.push(c.segment.chapter);
                    }
                    match c.kind {
                        InteractionKind::Dialogue => dialogue_events += 1,
                        InteractionKind::Action => action_events += 1,
                        InteractionKind::CoOccurrence => co_occurrence_events += 1,
                    }
                }

                let edge = InteractionEdge {
                    weight,
                    segment_count,
                    event_count: contributions.len(),
                    dialogue_events,
                    action_events,
                    co_occurrence_events,
                    chapters,
                    contexts: contexts
                        .remove(&pair)
                        .map(|kept| kept.into_values().collect())
                        .unwrap_or_default(),
                };
                (pair, edge)
            })
            .collect()
    }
}
