//! Nearest-neighbour search over the reference embedding matrix.
//!
//! [`SimilarityIndex`] is the seam for swapping the search strategy. The
//! only implementation is [`ExhaustiveIndex`], a linear scan that scores
//! every reference row; an approximate index can replace it without
//! changing what the matcher consumes.

use super::similarity::cosine_with_norms;
use crate::embedding::{l2_norm, EmbeddingMatrix};
use crate::error::{MapperError, Result};

/// The best-scoring reference row for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Row position in the reference table
    pub index: usize,
    /// Cosine similarity in `[-1, 1]`
    pub score: f64,
}

/// Finds the reference row most similar to a query vector.
pub trait SimilarityIndex: Send + Sync {
    /// Number of indexed reference rows.
    fn len(&self) -> usize;

    /// Returns true if nothing is indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension every query must have.
    fn dimension(&self) -> usize;

    /// Best match for `query`. Among equal scores the lowest index wins.
    fn nearest(&self, query: &[f32]) -> Result<Nearest>;
}

/// Exact search by scoring every row, O(R) per query.
#[derive(Debug, Clone)]
pub struct ExhaustiveIndex {
    table: String,
    matrix: EmbeddingMatrix,
}

impl ExhaustiveIndex {
    /// Index a matrix built from reference table `table`.
    pub fn new(table: impl Into<String>, matrix: EmbeddingMatrix) -> Result<Self> {
        let table = table.into();
        if matrix.is_empty() {
            return Err(MapperError::EmptyReferenceTable { table });
        }
        Ok(Self { table, matrix })
    }
}

impl SimilarityIndex for ExhaustiveIndex {
    fn len(&self) -> usize {
        self.matrix.len()
    }

    fn dimension(&self) -> usize {
        self.matrix.dimension()
    }

    fn nearest(&self, query: &[f32]) -> Result<Nearest> {
        if query.len() != self.matrix.dimension() {
            return Err(MapperError::dimension_mismatch(
                format!("query against '{}'", self.table),
                self.matrix.dimension(),
                query.len(),
            ));
        }
        let query_norm = l2_norm(query);

        let mut best: Option<Nearest> = None;
        for (index, (row, norm)) in self.matrix.iter().enumerate() {
            let score = cosine_with_norms(query, query_norm, row, norm);
            // strict: first maximum is kept
            if best.map_or(true, |b| score > b.score) {
                best = Some(Nearest { index, score });
            }
        }
        best.ok_or_else(|| MapperError::EmptyReferenceTable {
            table: self.table.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(rows: Vec<Vec<f32>>) -> ExhaustiveIndex {
        let dim = rows.first().map_or(2, Vec::len);
        let matrix = EmbeddingMatrix::new(dim, rows, |i| format!("reference #{i}")).unwrap();
        ExhaustiveIndex::new("ICD-11", matrix).unwrap()
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let matrix = EmbeddingMatrix::new(3, Vec::new(), |i| i.to_string()).unwrap();
        let err = ExhaustiveIndex::new("ICD-11", matrix).unwrap_err();
        assert!(matches!(err, MapperError::EmptyReferenceTable { ref table } if table == "ICD-11"));
    }

    #[test]
    fn test_picks_highest_score() {
        let idx = index(vec![vec![0.0, 1.0], vec![1.0, 0.1], vec![-1.0, 0.0]]);
        let nearest = idx.nearest(&[1.0, 0.0]).unwrap();
        assert_eq!(nearest.index, 1);
        assert!(nearest.score > 0.99);
    }

    #[test]
    fn test_ties_resolve_to_lowest_index() {
        let idx = index(vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![2.0, 0.0], vec![1.0, 0.0]]);
        for _ in 0..5 {
            assert_eq!(idx.nearest(&[3.0, 0.0]).unwrap().index, 1);
        }
    }

    #[test]
    fn test_all_negative_scores_still_match() {
        let idx = index(vec![vec![-1.0, 0.0], vec![-1.0, -1.0]]);
        let nearest = idx.nearest(&[1.0, 0.0]).unwrap();
        assert_eq!(nearest.index, 1);
        assert!(nearest.score < 0.0);
    }

    #[test]
    fn test_zero_reference_row_scores_zero() {
        let idx = index(vec![vec![0.0, 0.0], vec![-1.0, 0.0]]);
        let nearest = idx.nearest(&[1.0, 0.0]).unwrap();
        assert_eq!(nearest, Nearest { index: 0, score: 0.0 });
    }

    #[test]
    fn test_zero_query_matches_first_row() {
        let idx = index(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(idx.nearest(&[0.0, 0.0]).unwrap(), Nearest { index: 0, score: 0.0 });
    }

    #[test]
    fn test_query_dimension_checked() {
        let idx = index(vec![vec![1.0, 0.0]]);
        assert!(matches!(
            idx.nearest(&[1.0, 0.0, 0.0]),
            Err(MapperError::DimensionMismatch { expected: 2, actual: 3, .. })
        ));
    }
}
