//! Alias normalization: lowercase, whitespace runs folded to one space.

/// Normalize an alias or mention for comparison.
///
/// Leading and trailing whitespace is dropped and every inner whitespace run
/// becomes a single space, so `"Lin  Daiyu"` and `"lin\nDaiyu"` compare equal
/// while word gaps still separate words.
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

/// Normalized view of a text that remembers where each normalized char came from.
#[derive(Debug, Clone)]
pub(crate) struct NormalizedText {
    chars: Vec<char>,
    /// Byte range in the source text of the char that produced `chars[i]`.
    sources: Vec<(usize, usize)>,
}

impl NormalizedText {
    /// Fold `text` the same way [`normalize`] folds aliases. Offsets stay
    /// relative to `text`; a whitespace run maps to its first char.
    pub(crate) fn new(text: &str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut sources = Vec::with_capacity(text.len());
        let mut in_gap = false;
        for (start, c) in text.char_indices() {
            let end = start + c.len_utf8();
            if c.is_whitespace() {
                if !in_gap {
                    chars.push(' ');
                    sources.push((start, end));
                    in_gap = true;
                }
                continue;
            }
            in_gap = false;
            for lower in c.to_lowercase() {
                chars.push(lower);
                sources.push((start, end));
            }
        }
        Self { chars, sources }
    }

    pub(crate) fn chars(&self) -> &[char] {
        &self.chars
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Source byte range covering normalized chars `[from, from + len)`.
    pub(crate) fn source_span(&self, from: usize, len: usize) -> (usize, usize) {
        (self.sources[from].0, self.sources[from + len - 1].1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_whitespace_runs() {
        assert_eq!(normalize("  Lin  Daiyu "), "lin daiyu");
        assert_eq!(normalize("Lin\n\tDaiyu"), "lin daiyu");
        assert_eq!(normalize("寶釵"), "寶釵");
        assert_eq!(normalize("A."), "a.");
        assert_eq!(normalize(" \n "), "");
    }

    #[test]
    fn word_gaps_survive_in_text() {
        let text = "bread  and";
        let norm = NormalizedText::new(text);
        let folded: String = norm.chars().iter().collect();
        assert_eq!(folded, "bread and");
    }

    #[test]
    fn maps_back_to_source_bytes() {
        let text = "Ab 寶玉";
        let norm = NormalizedText::new(text);
        assert_eq!(norm.chars(), &['a', 'b', ' ', '寶', '玉']);
        let (start, end) = norm.source_span(3, 2);
        assert_eq!(&text[start..end], "寶玉");
    }
}
