/// Inference side of a fitted TF-IDF vectorizer.
///
/// The vocabulary, IDF weights and analyzer settings come from the offline pipeline.
/// `transform` reproduces scikit-learn's `TfidfVectorizer.transform` for the word
/// analyzer: regex tokenization, stop-word removal, n-grams, term counting restricted
/// to the fitted vocabulary, optional sublinear/binary TF, IDF scaling, then L1/L2
/// normalization.
use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk form of the fitted vectorizer (`tfidf_vectorizer.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    /// Term to column index.
    pub vocabulary: HashMap<String, usize>,
    /// One weight per column. May be empty when `use_idf` is false.
    #[serde(default)]
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub binary: bool,
    #[serde(default = "default_true")]
    pub use_idf: bool,
    /// `null` disables normalization.
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Sparse vector with strictly increasing column indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    token_pattern: Regex,
    lowercase: bool,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    sublinear_tf: bool,
    binary: bool,
    use_idf: bool,
    norm: Option<Norm>,
    dimensions: usize,
}

impl TfidfVectorizer {
    /// Validate an artifact and compile its token pattern.
    pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self, String> {
        let dimensions = artifact.vocabulary.len();

        if let Some((term, &col)) = artifact.vocabulary.iter().find(|(_, c)| **c >= dimensions) {
            return Err(format!(
                "vocabulary term {term:?} maps to column {col}, outside 0..{dimensions}"
            ));
        }
        let distinct: HashSet<usize> = artifact.vocabulary.values().copied().collect();
        if distinct.len() != dimensions {
            return Err("vocabulary maps several terms to the same column".to_string());
        }
        if artifact.use_idf && artifact.idf.len() != dimensions {
            return Err(format!(
                "idf has {} weights, vocabulary has {dimensions} terms",
                artifact.idf.len()
            ));
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }

        let token_pattern = Regex::new(&artifact.token_pattern)
            .map_err(|e| format!("token_pattern does not compile: {e}"))?;
        if token_pattern.captures_len() > 2 {
            return Err("token_pattern has more than one capturing group".to_string());
        }

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            token_pattern,
            lowercase: artifact.lowercase,
            ngram_range: artifact.ngram_range,
            stop_words: artifact.stop_words.into_iter().collect(),
            sublinear_tf: artifact.sublinear_tf,
            binary: artifact.binary,
            use_idf: artifact.use_idf,
            norm: artifact.norm,
            dimensions,
        })
    }

    /// Width of every vector this vectorizer produces.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Split `text` into the terms the vocabulary was fitted on.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        // With a single capturing group, the group is the token.
        let tokens: Vec<String> = if self.token_pattern.captures_len() == 2 {
            self.token_pattern
                .captures_iter(&text)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .collect()
        } else {
            self.token_pattern
                .find_iter(&text)
                .map(|m| m.as_str().to_string())
                .collect()
        };

        let tokens: Vec<String> = tokens
            .into_iter()
            .filter(|t| !self.stop_words.contains(t))
            .collect();

        self.word_ngrams(tokens)
    }

    fn word_ngrams(&self, tokens: Vec<String>) -> Vec<String> {
        let (mut min_n, max_n) = self.ngram_range;
        if max_n == 1 {
            return tokens;
        }

        let mut out = Vec::new();
        if min_n == 1 {
            out.extend(tokens.iter().cloned());
            min_n += 1;
        }
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                out.push(window.join(" "));
            }
        }
        out
    }

    /// Map `text` to its TF-IDF vector. Terms outside the vocabulary are dropped.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(text) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut vector = SparseVector {
            indices: Vec::with_capacity(counts.len()),
            values: Vec::with_capacity(counts.len()),
        };
        for (col, count) in counts {
            let mut tf = if self.binary { 1.0 } else { count };
            if self.sublinear_tf {
                tf = 1.0 + tf.ln();
            }
            let weight = if self.use_idf { tf * self.idf[col] } else { tf };
            vector.indices.push(col);
            vector.values.push(weight);
        }

        let scale = match self.norm {
            Some(Norm::L2) => vector.norm(),
            Some(Norm::L1) => vector.values.iter().map(|v| v.abs()).sum(),
            None => 1.0,
        };
        if scale > 0.0 && scale != 1.0 {
            vector.values.iter_mut().for_each(|v| *v /= scale);
        }
        vector
    }
}
