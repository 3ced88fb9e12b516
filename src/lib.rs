//! **Semantic mapping of NAMASTE terminology onto ICD-11.**
//!
//! `namaste-map` pairs every entry of the NAMASTE traditional-medicine
//! terminology with its single most similar ICD-11 entry, drawn from the MMS
//! and Traditional Medicine 2 (TM2) modules, and reports the cosine
//! similarity of the pair as a confidence score.
//!
//! ## How a run works
//!
//! 1. **[`reference`]**: the MMS and TM2 tables are aligned into one
//!    reference table. Each row is tagged with its module and missing
//!    columns are filled with empty strings.
//! 2. **[`matching::TextNormalizer`]**: each row is reduced to one
//!    canonical text (display name and synonyms, or title).
//! 3. **[`embedding`]**: an [`EmbeddingProvider`] turns the texts into
//!    fixed-dimension vectors. The reference table is encoded once per run.
//! 4. **[`matching`]**: every source vector is scored against every
//!    reference vector and the arg-max is kept. Ties go to the lowest row.
//! 5. **[`mapping`]**: results become [`OutputRecord`]s in source order,
//!    with the confidence rounded to three decimals.
//!
//! [`pipeline`] wires the stages together and [`reports`] writes the result.
//!
//! ## Example
//!
//! ```no_run
//! use namaste_map::config::{AppConfig, MapPaths, ReferenceInput};
//! use namaste_map::pipeline::{run_mapping, RunContext};
//!
//! fn main() -> anyhow::Result<()> {
//!     let ctx = RunContext::new(AppConfig::default())?;
//!     let paths = MapPaths {
//!         source: "namaste.csv".into(),
//!         reference: ReferenceInput::Split {
//!             mms: "icd11_mms.csv".into(),
//!             tm2: "icd11_tm2.csv".into(),
//!         },
//!         output: "mapping.csv".into(),
//!         summary: None,
//!     };
//!     let outcome = run_mapping(&ctx, &paths)?;
//!     println!("{} mappings", outcome.records.len());
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // usize <-> f64 casts in statistics and hashing are bounded in practice
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod mapping;
pub mod matching;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod reference;
pub mod reports;

// Re-export main types for convenience
pub use config::{AppConfig, ConfigError, Validatable};
pub use embedding::{EmbeddingProvider, HashingEmbedder};
pub use error::{MapperError, Result};
pub use mapping::{MappingAssembler, MappingSummary, OutputRecord};
pub use matching::{
    cosine_similarity, ExhaustiveIndex, MatchResult, SimilarityIndex, SimilarityMatcher,
    TextNormalizer,
};
pub use model::{Module, ReferenceEntry, SourceEntry, Table};
pub use parsers::{parse_table_str, read_table};
pub use reference::{ReferenceTable, ReferenceTableBuilder};
pub use reports::{ReportFormat, ReportGenerator};
