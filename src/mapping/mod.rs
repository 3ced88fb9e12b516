//! Output records for a mapping run.
//!
//! [`MappingAssembler`] turns each [`MatchResult`] into one
//! [`OutputRecord`], in source order, with the score rounded to three
//! decimals. [`MappingSummary`] aggregates the records for the run log and
//! the optional summary file without altering them.

mod summary;

pub use summary::{ConfidenceBand, MappingSummary};

use crate::matching::MatchResult;
use crate::model::Module;
use serde::{Deserialize, Serialize};

/// Output columns, in order.
pub const OUTPUT_COLUMNS: [&str; 6] = [
    "namaste_code",
    "namaste_display",
    "icd_code",
    "icd_title",
    "module",
    "confidence",
];

/// Decimal places kept in `confidence`.
pub const CONFIDENCE_DECIMALS: i32 = 3;

/// One row of the mapping output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub namaste_code: String,
    pub namaste_display: String,
    pub icd_code: String,
    pub icd_title: String,
    pub module: Module,
    pub confidence: f64,
}

impl From<&MatchResult<'_>> for OutputRecord {
    fn from(result: &MatchResult<'_>) -> Self {
        Self {
            namaste_code: result.source.code.clone(),
            namaste_display: result.source.display_name.clone(),
            icd_code: result.best_reference.code.clone(),
            icd_title: result.best_reference.title.clone(),
            module: result.best_reference.module,
            confidence: round_confidence(result.score),
        }
    }
}

/// Round to three decimals, halves away from zero.
///
/// Scaling by 1000 before rounding means binary representation decides
/// values such as `0.0005`, which is not exactly representable.
#[must_use]
pub fn round_confidence(score: f64) -> f64 {
    let scale = 10f64.powi(CONFIDENCE_DECIMALS);
    let rounded = (score * scale).round() / scale;
    // avoid "-0.000" in output
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Packages match results into output records.
#[derive(Debug, Default, Clone, Copy)]
pub struct MappingAssembler;

impl MappingAssembler {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// One record per result, same order.
    #[must_use]
    pub fn assemble(&self, results: &[MatchResult<'_>]) -> Vec<OutputRecord> {
        results.iter().map(OutputRecord::from).collect()
    }
}
