//! Shared fixtures for unit tests.
use std::collections::HashMap;
use std::time::Duration;

use books_common::google_books::{GoogleBooksClient, GoogleBooksConfig};
use books_common::redis::RedisStore;

use crate::cache::LookupCache;
use crate::corpus::Corpus;
use crate::matrix::{CsrArtifact, DenseArtifact, SimilarityMatrix, TfidfMatrix};
use crate::model::BookRecord;
use crate::service::Recommender;
use crate::tfidf::{TfidfVectorizer, VectorizerArtifact};

/// Shares desert, spice, sandworm and empire with "dune" and three of them with
/// "dune messiah".
pub const DUNE_LIKE_DESCRIPTION: &str =
    "A desert planet, the spice, a sandworm and a galactic empire.";

const TERMS: [&str; 12] = [
    "hobbit", "dragon", "ring", "empire", "galaxy", "desert", "spice", "sandworm",
    "cyberspace", "hacker", "pilgrim", "winter",
];

fn book(title: &str, authors: &str) -> BookRecord {
    BookRecord {
        title: title.to_string(),
        authors: authors.to_string(),
        thumbnail: format!("http://books.example/{}.jpg", title.replace(' ', "-")),
    }
}

/// Seven books; "dune" sits at index 2 with similarity row
/// `[0.1, 0.3, 1.0, 0.9, 0.2, 0.5, 0.05]`.
pub fn corpus() -> Corpus {
    let books = vec![
        book("the hobbit", "J.R.R. Tolkien"),
        book("foundation", "Isaac Asimov"),
        book("dune", "Frank Herbert"),
        book("dune messiah", "Frank Herbert"),
        book("neuromancer", "William Gibson"),
        book("hyperion", "Dan Simmons"),
        book("the left hand of darkness", "Ursula K. Le Guin"),
    ];

    let similarities = dense(vec![
        vec![1.0, 0.2, 0.1, 0.15, 0.05, 0.1, 0.3],
        vec![0.2, 1.0, 0.3, 0.25, 0.4, 0.35, 0.1],
        vec![0.1, 0.3, 1.0, 0.9, 0.2, 0.5, 0.05],
        vec![0.15, 0.25, 0.9, 1.0, 0.1, 0.45, 0.05],
        vec![0.05, 0.4, 0.2, 0.1, 1.0, 0.3, 0.2],
        vec![0.1, 0.35, 0.5, 0.45, 0.3, 1.0, 0.1],
        vec![0.3, 0.1, 0.05, 0.05, 0.2, 0.1, 1.0],
    ]);

    let vocabulary: HashMap<String, usize> = TERMS
        .iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), i))
        .collect();
    let vectorizer =
        TfidfVectorizer::from_artifact(vectorizer_artifact(vocabulary, vec![1.0; TERMS.len()]))
            .unwrap();

    let col = |term: &str| TERMS.iter().position(|t| *t == term).unwrap();
    let rows: [&[&str]; 7] = [
        &["hobbit", "dragon", "ring"],
        &["empire", "galaxy"],
        &["empire", "desert", "spice", "sandworm"],
        &["empire", "desert", "spice"],
        &["cyberspace", "hacker"],
        &["galaxy", "pilgrim"],
        &["winter"],
    ];
    let tfidf = TfidfMatrix::from_artifact(csr(
        TERMS.len(),
        rows.iter()
            .map(|terms| terms.iter().map(|t| (col(t), 1.0)).collect())
            .collect(),
    ))
    .unwrap();

    Corpus::new(books, similarities, vectorizer, tfidf).unwrap()
}

/// Corpus of the given titles with uniform off-diagonal similarity and an empty
/// vocabulary.
pub fn corpus_with_titles(titles: &[&str]) -> Corpus {
    let n = titles.len();
    let books = titles.iter().map(|t| book(t, "Unknown")).collect();
    let similarities = dense(
        (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.5 }).collect())
            .collect(),
    );
    let vectorizer =
        TfidfVectorizer::from_artifact(vectorizer_artifact(HashMap::new(), Vec::new())).unwrap();
    let tfidf = TfidfMatrix::from_artifact(csr(0, vec![Vec::new(); n])).unwrap();
    Corpus::new(books, similarities, vectorizer, tfidf).unwrap()
}

/// Vectorizer artifact with scikit-learn's default analyzer settings.
pub fn vectorizer_artifact(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> VectorizerArtifact {
    serde_json::from_value(serde_json::json!({ "vocabulary": vocabulary, "idf": idf })).unwrap()
}

fn dense(rows: Vec<Vec<f64>>) -> SimilarityMatrix {
    let n = rows.len();
    SimilarityMatrix::from_artifact(DenseArtifact {
        shape: (n, n),
        data: rows.into_iter().flatten().collect(),
    })
    .unwrap()
}

fn csr(cols: usize, rows: Vec<Vec<(usize, f64)>>) -> CsrArtifact {
    let mut indptr = vec![0];
    let mut indices = Vec::new();
    let mut data = Vec::new();
    for row in &rows {
        for &(c, v) in row {
            indices.push(c);
            data.push(v);
        }
        indptr.push(indices.len());
    }
    CsrArtifact {
        shape: (rows.len(), cols),
        indptr,
        indices,
        data,
    }
}

/// Recommender over [`corpus`] whose Books API lives at `base_url`, without Redis.
pub fn recommender(base_url: &str) -> Recommender {
    let client = GoogleBooksClient::new(GoogleBooksConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_millis(500),
        api_key: None,
    })
    .unwrap();
    Recommender::new(
        std::sync::Arc::new(corpus()),
        client,
        LookupCache::new(RedisStore::disabled()),
    )
}
