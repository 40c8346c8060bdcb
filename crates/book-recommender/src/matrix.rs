/// Precomputed matrices: the dense book-to-book similarity matrix and the sparse
/// TF-IDF term-document matrix. Both are validated once at load and never mutated.
use serde::{Deserialize, Serialize};

use crate::tfidf::SparseVector;

/// On-disk form of a dense matrix (`similarities.json`), row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseArtifact {
    pub shape: (usize, usize),
    pub data: Vec<f64>,
}

/// N×N pairwise similarity scores. Row i, column j is the similarity of book i to book j.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn from_artifact(artifact: DenseArtifact) -> Result<Self, String> {
        let (rows, cols) = artifact.shape;
        if rows != cols {
            return Err(format!("similarity matrix must be square, got {rows}x{cols}"));
        }
        if artifact.data.len() != rows * cols {
            return Err(format!(
                "similarity matrix {rows}x{cols} has {} values",
                artifact.data.len()
            ));
        }
        Ok(Self {
            n: rows,
            data: artifact.data,
        })
    }

    /// Number of books covered (rows == columns).
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.n).then(|| &self.data[i * self.n..(i + 1) * self.n])
    }
}

/// On-disk form of a CSR matrix (`tfidf_matrix.json`), the layout scipy uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrArtifact {
    pub shape: (usize, usize),
    pub indptr: Vec<usize>,
    pub indices: Vec<usize>,
    pub data: Vec<f64>,
}

/// N×D sparse TF-IDF matrix, one row per book, with row norms cached for cosine scoring.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    shape: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
    row_norms: Vec<f64>,
}

impl TfidfMatrix {
    pub fn from_artifact(artifact: CsrArtifact) -> Result<Self, String> {
        let CsrArtifact {
            shape,
            indptr,
            indices,
            data,
        } = artifact;
        let (rows, cols) = shape;

        if indptr.len() != rows + 1 {
            return Err(format!(
                "indptr has {} entries, expected {}",
                indptr.len(),
                rows + 1
            ));
        }
        if indices.len() != data.len() {
            return Err(format!(
                "indices ({}) and data ({}) differ in length",
                indices.len(),
                data.len()
            ));
        }
        if indptr.first() != Some(&0) || indptr.last() != Some(&indices.len()) {
            return Err("indptr must start at 0 and end at nnz".to_string());
        }
        if indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err("indptr is not non-decreasing".to_string());
        }
        if let Some(&col) = indices.iter().find(|&&c| c >= cols) {
            return Err(format!("column index {col} outside 0..{cols}"));
        }

        let row_norms = indptr
            .windows(2)
            .map(|w| data[w[0]..w[1]].iter().map(|v| v * v).sum::<f64>().sqrt())
            .collect();

        Ok(Self {
            shape,
            indptr,
            indices,
            data,
            row_norms,
        })
    }

    pub fn rows(&self) -> usize {
        self.shape.0
    }

    pub fn cols(&self) -> usize {
        self.shape.1
    }

    /// Cosine similarity of `query` against every row. Rows or queries with zero norm
    /// score 0.
    pub fn cosine_scores(&self, query: &SparseVector) -> Vec<f64> {
        let query_norm = query.norm();
        if query.is_empty() || query_norm == 0.0 {
            return vec![0.0; self.rows()];
        }

        let mut dense = vec![0.0; self.cols()];
        for (&col, &value) in query.indices.iter().zip(&query.values) {
            if let Some(slot) = dense.get_mut(col) {
                *slot = value;
            }
        }

        self.indptr
            .windows(2)
            .zip(&self.row_norms)
            .map(|(w, &row_norm)| {
                if row_norm == 0.0 {
                    return 0.0;
                }
                let dot: f64 = self.indices[w[0]..w[1]]
                    .iter()
                    .zip(&self.data[w[0]..w[1]])
                    .map(|(&col, &v)| v * dense[col])
                    .sum();
                dot / (query_norm * row_norm)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{CsrArtifact, DenseArtifact, SimilarityMatrix, TfidfMatrix};
    use crate::tfidf::SparseVector;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn dense_rows_are_row_major() {
        let m = SimilarityMatrix::from_artifact(DenseArtifact {
            shape: (2, 2),
            data: vec![1.0, 0.4, 0.4, 1.0],
        })
        .unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.row(1), Some(&[0.4, 1.0][..]));
        assert_eq!(m.row(2), None);
    }

    #[test]
    fn dense_rejects_bad_shapes() {
        assert!(SimilarityMatrix::from_artifact(DenseArtifact {
            shape: (2, 3),
            data: vec![0.0; 6],
        })
        .is_err());
        assert!(SimilarityMatrix::from_artifact(DenseArtifact {
            shape: (2, 2),
            data: vec![0.0; 3],
        })
        .is_err());
    }

    fn sample_csr() -> TfidfMatrix {
        // row 0: [1, 1, 0], row 1: [0, 0, 0], row 2: [0, 3, 4]
        TfidfMatrix::from_artifact(CsrArtifact {
            shape: (3, 3),
            indptr: vec![0, 2, 2, 4],
            indices: vec![0, 1, 2, 1],
            data: vec![1.0, 1.0, 4.0, 3.0],
        })
        .unwrap()
    }

    #[test]
    fn cosine_scores_every_row() {
        let m = sample_csr();
        let query = SparseVector {
            indices: vec![1],
            values: vec![2.0],
        };
        let scores = m.cosine_scores(&query);
        assert_eq!(scores.len(), 3);
        assert!(approx(scores[0], 1.0 / 2f64.sqrt()));
        assert_eq!(scores[1], 0.0);
        assert!(approx(scores[2], 3.0 / 5.0));
    }

    #[test]
    fn zero_query_scores_zero() {
        let m = sample_csr();
        assert_eq!(m.cosine_scores(&SparseVector::default()), vec![0.0; 3]);
    }

    #[test]
    fn csr_rejects_malformed_layouts() {
        let bad_indptr = CsrArtifact {
            shape: (2, 2),
            indptr: vec![0, 2, 1],
            indices: vec![0],
            data: vec![1.0],
        };
        assert!(TfidfMatrix::from_artifact(bad_indptr).is_err());

        let bad_column = CsrArtifact {
            shape: (1, 2),
            indptr: vec![0, 1],
            indices: vec![5],
            data: vec![1.0],
        };
        assert!(TfidfMatrix::from_artifact(bad_column).is_err());

        let length_mismatch = CsrArtifact {
            shape: (1, 2),
            indptr: vec![0, 1],
            indices: vec![0],
            data: vec![1.0, 2.0],
        };
        assert!(TfidfMatrix::from_artifact(length_mismatch).is_err());
    }
}
