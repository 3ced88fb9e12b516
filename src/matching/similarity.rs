//! Cosine similarity over f32 embeddings, accumulated in f64.

use crate::embedding::l2_norm;

/// Cosine similarity of two equal-length vectors.
///
/// A zero-norm operand yields `0.0`. The result is clamped to `[-1, 1]`.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    cosine_with_norms(a, l2_norm(a), b, l2_norm(b))
}

/// Cosine similarity with precomputed norms.
#[must_use]
pub fn cosine_with_norms(a: &[f32], a_norm: f64, b: &[f32], b_norm: f64) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum();
    (dot / (a_norm * b_norm)).clamp(-1.0, 1.0)
}
