//! Byte-span iterators for the two segmentation units.

use std::ops::Range;

#[derive(Debug, Clone)]
pub(super) enum SpanIter<'a> {
    Sentence(SentenceSpans<'a>),
    Window(WindowSpans),
}

impl Iterator for SpanIter<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SpanIter::Sentence(it) => it.next(),
            SpanIter::Window(it) => it.next(),
        }
    }
}

/// Sentence spans: each ends after a terminator run plus any closing marks.
///
/// Terminators inside a protected byte range (an alias occurrence such as
/// `"A."`) never end a sentence.
#[derive(Debug, Clone)]
pub(super) struct SentenceSpans<'a> {
    text: &'a str,
    pos: usize,
    terminators: &'a [char],
    closing: &'a [char],
    /// Sorted, non-overlapping.
    protected: Vec<Range<usize>>,
    cursor: usize,
}

impl<'a> SentenceSpans<'a> {
    pub(super) fn new(text: &'a str, terminators: &'a [char], closing: &'a [char]) -> Self {
        Self::protecting(text, terminators, closing, Vec::new())
    }

    pub(super) fn protecting(
        text: &'a str,
        terminators: &'a [char],
        closing: &'a [char],
        protected: Vec<Range<usize>>,
    ) -> Self {
        Self {
            text,
            pos: 0,
            terminators,
            closing,
            protected,
            cursor: 0,
        }
    }

    /// Whether absolute byte `at` lies in a protected range. `at` must not
    /// decrease between calls.
    fn is_protected(&mut self, at: usize) -> bool {
        while self.cursor < self.protected.len() && self.protected[self.cursor].end <= at {
            self.cursor += 1;
        }
        self.protected
            .get(self.cursor)
            .is_some_and(|r| r.start <= at)
    }
}

impl Iterator for SentenceSpans<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let text = self.text;
        let base = self.pos;
        let rest = &text[base..];
        let mut end = rest.len();
        let mut chars = rest.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if !self.terminators.contains(&c) || self.is_protected(base + i) {
                continue;
            }
            end = i + c.len_utf8();
            while let Some(&(j, d)) = chars.peek() {
                let trailing = self.terminators.contains(&d) || self.closing.contains(&d);
                if trailing && !self.is_protected(base + j) {
                    end = j + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            break;
        }

        let start = self.pos;
        self.pos += end;
        Some(start..self.pos)
    }
}

/// Fixed-size char windows; the last one ends at the text end.
#[derive(Debug, Clone)]
pub(super) struct WindowSpans {
    /// Byte offset of every char, plus the text length.
    bounds: Vec<usize>,
    size: usize,
    stride: usize,
    next_start: usize,
    done: bool,
}

impl WindowSpans {
    pub(super) fn new(text: &str, size: usize, stride: usize) -> Self {
        let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        bounds.push(text.len());
        Self {
            done: bounds.len() == 1,
            bounds,
            size,
            stride,
            next_start: 0,
        }
    }
}

impl Iterator for WindowSpans {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let n = self.bounds.len() - 1;
        let start = self.next_start;
        let end = (start + self.size).min(n);
        if end == n {
            self.done = true;
        } else {
            self.next_start += self.stride;
        }
        Some(self.bounds[start]..self.bounds[end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_text_without_terminator_is_a_span() {
        let terms = ['.', '!'];
        let spans: Vec<_> = SentenceSpans::new("Hi. Bob!! Bye", &terms, &['"']).collect();
        assert_eq!(spans, vec![0..3, 3..9, 9..13]);
    }

    #[test]
    fn protected_terminators_do_not_split() {
        let terms = ['.'];
        let text = "A. met Bob. Then Dr. No left.";
        let spans: Vec<_> =
            SentenceSpans::protecting(text, &terms, &[], vec![0..2, 17..20]).collect();
        assert_eq!(spans, vec![0..11, 11..29]);
    }

    #[test]
    fn stride_equal_to_size_tiles_the_text() {
        let spans: Vec<_> = WindowSpans::new("abcdefg", 3, 3).collect();
        assert_eq!(spans, vec![0..3, 3..6, 6..7]);
    }
}
