/// Corpus store: the book table plus every artifact derived from it.
///
/// Loaded once at startup and shared read-only behind an `Arc`. Row `i` of the
/// similarity matrix and of the TF-IDF matrix both describe `books[i]`; `Corpus::new`
/// refuses artifacts that disagree on N or on the vocabulary width.
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::AppError;
use crate::matrix::{CsrArtifact, DenseArtifact, SimilarityMatrix, TfidfMatrix};
use crate::model::BookRecord;
use crate::tfidf::{TfidfVectorizer, VectorizerArtifact};

pub const BOOKS_FILE: &str = "books.json";
pub const SIMILARITIES_FILE: &str = "similarities.json";
pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
pub const TFIDF_MATRIX_FILE: &str = "tfidf_matrix.json";

pub const ARTIFACT_FILES: [&str; 4] = [
    BOOKS_FILE,
    SIMILARITIES_FILE,
    VECTORIZER_FILE,
    TFIDF_MATRIX_FILE,
];

#[derive(Debug)]
pub struct Corpus {
    books: Vec<BookRecord>,
    similarities: SimilarityMatrix,
    vectorizer: TfidfVectorizer,
    tfidf: TfidfMatrix,
}

impl Corpus {
    /// Read and validate all four artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let books: Vec<BookRecord> = read_artifact(&dir.join(BOOKS_FILE))?;

        let path = dir.join(SIMILARITIES_FILE);
        let similarities = SimilarityMatrix::from_artifact(read_artifact::<DenseArtifact>(&path)?)
            .map_err(|e| AppError::artifact(path.display().to_string(), e))?;

        let path = dir.join(VECTORIZER_FILE);
        let vectorizer =
            TfidfVectorizer::from_artifact(read_artifact::<VectorizerArtifact>(&path)?)
                .map_err(|e| AppError::artifact(path.display().to_string(), e))?;

        let path = dir.join(TFIDF_MATRIX_FILE);
        let tfidf = TfidfMatrix::from_artifact(read_artifact::<CsrArtifact>(&path)?)
            .map_err(|e| AppError::artifact(path.display().to_string(), e))?;

        let corpus = Self::new(books, similarities, vectorizer, tfidf)?;
        info!(
            dir = %dir.display(),
            books = corpus.len(),
            terms = corpus.vectorizer.dimensions(),
            "corpus loaded"
        );
        Ok(corpus)
    }

    /// Assemble a corpus from in-memory artifacts, checking that they line up.
    pub fn new(
        books: Vec<BookRecord>,
        similarities: SimilarityMatrix,
        vectorizer: TfidfVectorizer,
        tfidf: TfidfMatrix,
    ) -> Result<Self, AppError> {
        let n = books.len();
        if similarities.len() != n {
            return Err(AppError::artifact(
                SIMILARITIES_FILE,
                format!("covers {} books, book table has {n}", similarities.len()),
            ));
        }
        if tfidf.rows() != n {
            return Err(AppError::artifact(
                TFIDF_MATRIX_FILE,
                format!("has {} rows, book table has {n}", tfidf.rows()),
            ));
        }
        if tfidf.cols() != vectorizer.dimensions() {
            return Err(AppError::artifact(
                TFIDF_MATRIX_FILE,
                format!(
                    "has {} columns, vectorizer has {} terms",
                    tfidf.cols(),
                    vectorizer.dimensions()
                ),
            ));
        }

        Ok(Self {
            books,
            similarities,
            vectorizer,
            tfidf,
        })
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn similarities(&self) -> &SimilarityMatrix {
        &self.similarities
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn tfidf(&self) -> &TfidfMatrix {
        &self.tfidf
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::artifact(path.display().to_string(), e.to_string()))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::artifact(path.display().to_string(), e.to_string()))
}
