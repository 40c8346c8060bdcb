use crate::corpus::Corpus;

/// Collapse every whitespace run to one space and trim the ends.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical title form: whitespace collapsed, trimmed, lowercased. Matches how
/// `BookRecord::title` is stored. Idempotent.
pub fn normalize_title(raw: &str) -> String {
    collapse_whitespace(raw).to_lowercase()
}

impl Corpus {
    /// Position of the first book whose stored title equals the normalized `raw_title`.
    /// Exact equality only.
    pub fn find(&self, raw_title: &str) -> Option<usize> {
        let wanted = normalize_title(raw_title);
        self.books().iter().position(|book| book.title == wanted)
    }
}
