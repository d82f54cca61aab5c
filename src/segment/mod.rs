//! Text segmentation: chapter text → ordered analysis units with resolved mentions.

use std::ops::Range;

use crate::{
    config::{SegmentUnit, SegmentationConfig},
    errors::Result,
    registry::{CharacterRegistry, Mention},
    types::{CharacterKey, SegmentRef},
};

mod spans;

use spans::{SentenceSpans, SpanIter, WindowSpans};

/// One analysis unit of a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'t> {
    /// Chapter number.
    pub chapter: u32,
    /// Sequential index within the chapter, starting at 0.
    pub index: usize,
    /// Byte range of the unit in the chapter text.
    pub span: Range<usize>,
    /// The unit's text.
    pub text: &'t str,
    /// Alias occurrences, with offsets relative to `text`.
    pub mentions: Vec<Mention>,
    /// Distinct characters in first-appearance order.
    pub characters: Vec<CharacterKey>,
}

impl Segment<'_> {
    /// Location of this segment.
    pub fn location(&self) -> SegmentRef {
        SegmentRef {
            chapter: self.chapter,
            index: self.index,
        }
    }
}

/// Cuts chapter text into [`Segment`]s and resolves their mentions.
#[derive(Debug, Clone)]
pub struct Segmenter<'r> {
    registry: &'r CharacterRegistry,
    config: SegmentationConfig,
}

impl<'r> Segmenter<'r> {
    /// Create a segmenter; fails on invalid unit parameters.
    pub fn new(registry: &'r CharacterRegistry, config: SegmentationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// The registry mentions are resolved against.
    pub fn registry(&self) -> &'r CharacterRegistry {
        self.registry
    }

    /// Segmentation parameters in use.
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Lazily segment one chapter. Calling again restarts from the beginning.
    ///
    /// Sentence mode scans the whole chapter up front so that a terminator
    /// inside an alias occurrence never ends a sentence.
    pub fn segments<'a>(&'a self, chapter: u32, text: &'a str) -> Segments<'a> {
        let (spans, chapter_mentions) = match self.config.unit {
            SegmentUnit::Sentence => {
                let mentions = self.registry.scan(text);
                let protected = mentions.iter().map(|m| m.start..m.end).collect();
                let spans = SpanIter::Sentence(SentenceSpans::protecting(
                    text,
                    &self.config.sentence_terminators,
                    &self.config.closing_marks,
                    protected,
                ));
                (spans, Some(mentions))
            }
            SegmentUnit::Window { size, stride } => {
                (SpanIter::Window(WindowSpans::new(text, size, stride)), None)
            }
        };
        Segments {
            registry: self.registry,
            chapter,
            text,
            spans,
            chapter_mentions,
            mention_cursor: 0,
            next_index: 0,
        }
    }
}

/// Iterator over the segments of one chapter.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    registry: &'a CharacterRegistry,
    chapter: u32,
    text: &'a str,
    spans: SpanIter<'a>,
    /// Whole-chapter mentions in sentence mode; windows overlap and scan
    /// their own text.
    chapter_mentions: Option<Vec<Mention>>,
    mention_cursor: usize,
    next_index: usize,
}

impl Segments<'_> {
    /// Mentions lying inside `span`, relative to its start.
    fn mentions_in(&mut self, span: &Range<usize>, text: &str) -> Vec<Mention> {
        let Some(all) = &self.chapter_mentions else {
            return self.registry.scan(text);
        };
        let mut out = Vec::new();
        while let Some(m) = all.get(self.mention_cursor) {
            if m.start >= span.end {
                break;
            }
            self.mention_cursor += 1;
            if m.start >= span.start && m.end <= span.end {
                out.push(Mention {
                    key: m.key,
                    start: m.start - span.start,
                    end: m.end - span.start,
                });
            }
        }
        out
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let span = self.spans.next()?;
            let chapter_text = self.text;
            let text = &chapter_text[span.clone()];
            let mentions = self.mentions_in(&span, text);
            if text.trim().is_empty() {
                continue;
            }

            let mut characters: Vec<CharacterKey> = Vec::new();
            for m in &mentions {
                if !characters.contains(&m.key) {
                    characters.push(m.key);
                }
            }

            let index = self.next_index;
            self.next_index += 1;
            return Some(Segment {
                chapter: self.chapter,
                index,
                span,
                text,
                mentions,
                characters,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use crate::registry::DictionaryEntry;

    fn registry() -> CharacterRegistry {
        CharacterRegistry::new(
            vec![
                DictionaryEntry::new("baoyu", ["寶玉"]),
                DictionaryEntry::new("daiyu", ["黛玉", "林妹妹"]),
                DictionaryEntry::new("xifeng", ["鳳姐"]),
            ],
            &RegistryConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn sentences_keep_closing_quotes() {
        let reg = registry();
        let seg = Segmenter::new(&reg, SegmentationConfig::default()).unwrap();
        let text = "寶玉笑道：「林妹妹來了。」黛玉不答。鳳姐走了";
        let segments: Vec<_> = seg.segments(3, text).collect();

        let texts: Vec<_> = segments.iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["寶玉笑道：「林妹妹來了。」", "黛玉不答。", "鳳姐走了"]);
        assert_eq!(segments[0].location(), SegmentRef { chapter: 3, index: 0 });
        assert_eq!(&text[segments[1].span.clone()], "黛玉不答。");

        let first: Vec<_> = segments[0].characters.iter().map(|&k| reg.id(k)).collect();
        assert_eq!(first, vec!["baoyu", "daiyu"]);
    }

    #[test]
    fn consecutive_terminators_and_blank_spans() {
        let reg = registry();
        let seg = Segmenter::new(&reg, SegmentationConfig::default()).unwrap();
        let segments: Vec<_> = seg.segments(1, "什麼？！\n\n  \n寶玉來了。").collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "什麼？！\n\n");
        assert!(segments[0].characters.is_empty());
        assert_eq!(segments[1].index, 1);
        assert_eq!(segments[1].text.trim(), "寶玉來了。");
    }

    #[test]
    fn windows_overlap_and_reach_the_end() {
        let reg = registry();
        let config = SegmentationConfig {
            unit: SegmentUnit::Window { size: 4, stride: 2 },
            ..SegmentationConfig::default()
        };
        let seg = Segmenter::new(&reg, config).unwrap();
        let texts: Vec<_> = seg.segments(1, "寶玉見了黛玉").map(|s| s.text).collect();
        assert_eq!(texts, vec!["寶玉見了", "見了黛玉"]);

        let texts: Vec<_> = seg.segments(1, "寶玉見了黛玉哭").map(|s| s.text).collect();
        assert_eq!(texts, vec!["寶玉見了", "見了黛玉", "黛玉哭"]);
    }

    #[test]
    fn repeated_mentions_count_once() {
        let reg = registry();
        let seg = Segmenter::new(&reg, SegmentationConfig::default()).unwrap();
        let s = seg.segments(1, "黛玉哭，寶玉勸黛玉。").next().unwrap();
        assert_eq!(s.mentions.len(), 3);
        let ids: Vec<_> = s.characters.iter().map(|&k| reg.id(k)).collect();
        assert_eq!(ids, vec!["daiyu", "baoyu"]);
    }

    #[test]
    fn restarting_yields_identical_segments() {
        let reg = registry();
        let seg = Segmenter::new(&reg, SegmentationConfig::default()).unwrap();
        let text = "寶玉來了。黛玉來了。";
        let a: Vec<_> = seg.segments(2, text).collect();
        let b: Vec<_> = seg.segments(2, text).collect();
        assert_eq!(a, b);

        let iter = seg.segments(2, text);
        let cloned: Vec<_> = iter.clone().collect();
        assert_eq!(cloned, iter.collect::<Vec<_>>());
    }

    #[test]
    fn abbreviated_alias_keeps_its_sentence() {
        let reg = CharacterRegistry::new(
            vec![
                DictionaryEntry::new("A", ["Alice", "A."]),
                DictionaryEntry::new("B", ["Bob"]),
            ],
            &RegistryConfig::default(),
        )
        .unwrap();
        let seg = Segmenter::new(&reg, SegmentationConfig::default()).unwrap();
        let segments: Vec<_> = seg.segments(1, "A. met Bob. Bob left.").collect();

        let texts: Vec<_> = segments.iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["A. met Bob.", " Bob left."]);
        let ids: Vec<_> = segments[0].characters.iter().map(|&k| reg.id(k)).collect();
        assert_eq!(ids, vec!["A", "B"]);
        let m = &segments[1].mentions[0];
        assert_eq!(&segments[1].text[m.start..m.end], "Bob");
    }

    #[test]
    fn rejects_invalid_window() {
        let reg = registry();
        let config = SegmentationConfig {
            unit: SegmentUnit::Window { size: 0, stride: 1 },
            ..SegmentationConfig::default()
        };
        assert!(Segmenter::new(&reg, config).is_err());
    }

    #[test]
    fn empty_text_has_no_segments() {
        let reg = registry();
        let seg = Segmenter::new(&reg, SegmentationConfig::default()).unwrap();
        assert_eq!(seg.segments(1, "").count(), 0);
    }
}
