use serde::{Deserialize, Serialize};

use books_common::api::RecommendedBook;

/// One row of the book table (`books.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Stored lowercased and trimmed, the form titles are matched against.
    pub title: String,
    /// Display string of author names, e.g. "Frank Herbert".
    #[serde(default)]
    pub authors: String,
    /// Cover image URL.
    #[serde(default)]
    pub thumbnail: String,
}

impl BookRecord {
    pub fn to_recommendation(&self) -> RecommendedBook {
        RecommendedBook {
            title: self.title.clone(),
            authors: self.authors.clone(),
            thumbnail: self.thumbnail.clone(),
        }
    }
}
