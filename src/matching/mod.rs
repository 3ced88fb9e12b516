//! Similarity matching of source entries against the reference table.
//!
//! - [`TextNormalizer`]: row -> canonical text
//! - [`cosine_similarity`]: the score, with zero-norm vectors scoring 0
//! - [`SimilarityIndex`] / [`ExhaustiveIndex`]: nearest reference row
//! - [`SimilarityMatcher`]: one [`MatchResult`] per source entry, in order
//!
//! Ties on the maximum score always resolve to the lowest reference row.

mod index;
mod matcher;
mod normalize;
mod similarity;

pub use index::{ExhaustiveIndex, Nearest, SimilarityIndex};
pub use matcher::{MatchResult, SimilarityMatcher};
pub use normalize::{join_fields, TextNormalizer};
pub use similarity::{cosine_similarity, cosine_with_norms};
