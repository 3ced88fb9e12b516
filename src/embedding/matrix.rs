//! Read-only matrix of reference embeddings.

use super::{validate_vector, Embedding};
use crate::error::{MapperError, Result};

/// Row-major embedding matrix with precomputed L2 norms.
///
/// Built once per run from the reference table and shared read-only by
/// every matching operation.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    dimension: usize,
    rows: Vec<Embedding>,
    norms: Vec<f64>,
}

impl EmbeddingMatrix {
    /// Build a matrix; every row must have length `dimension`.
    ///
    /// `label` names a row for error messages.
    pub fn new<F>(dimension: usize, rows: Vec<Embedding>, label: F) -> Result<Self>
    where
        F: Fn(usize) -> String,
    {
        if dimension == 0 {
            return Err(MapperError::config("embedding dimension must be positive"));
        }
        for (i, row) in rows.iter().enumerate() {
            validate_vector(row, dimension, || label(i))?;
        }
        let norms = rows.iter().map(|r| l2_norm(r)).collect();
        Ok(Self {
            dimension,
            rows,
            norms,
        })
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows paired with their L2 norms, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&[f32], f64)> + '_ {
        self.rows
            .iter()
            .map(Vec::as_slice)
            .zip(self.norms.iter().copied())
    }
}

/// Euclidean norm accumulated in f64.
#[must_use]
pub fn l2_norm(v: &[f32]) -> f64 {
    v.iter()
        .map(|&x| {
            let x = f64::from(x);
            x * x
        })
        .sum::<f64>()
        .sqrt()
}
