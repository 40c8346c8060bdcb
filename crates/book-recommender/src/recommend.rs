use std::cmp::Ordering;

use books_common::api::RecommendedBook;

use crate::corpus::Corpus;

pub const MAX_RECOMMENDATIONS: usize = 5;

/// Indices of `scores` from highest to lowest. Equal scores keep their original order;
/// NaN sorts last.
pub fn rank_descending(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&x, &y| compare_desc(scores[x], scores[y]));
    order
}

fn compare_desc(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
    }
}

impl Corpus {
    /// Neighbours of a known book, read from its similarity row.
    ///
    /// The top-ranked entry is the book itself and is skipped; the next five are
    /// returned. Corpora with fewer than six books yield `len() - 1` results.
    pub fn recommend_by_index(&self, index: usize) -> Vec<RecommendedBook> {
        let Some(row) = self.similarities().row(index) else {
            return Vec::new();
        };
        rank_descending(row)
            .into_iter()
            .skip(1)
            .take(MAX_RECOMMENDATIONS)
            .map(|i| self.books()[i].to_recommendation())
            .collect()
    }

    /// Cold start: score a description that is not in the corpus against every book's
    /// TF-IDF row and return the five closest. Blank descriptions return nothing.
    pub fn recommend_for_description(&self, description: &str) -> Vec<RecommendedBook> {
        let description = description.trim();
        if description.is_empty() {
            return Vec::new();
        }

        let query = self.vectorizer().transform(description);
        let scores = self.tfidf().cosine_scores(&query);
        rank_descending(&scores)
            .into_iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|i| self.books()[i].to_recommendation())
            .collect()
    }
}
