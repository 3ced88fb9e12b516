//! Configuration types for namaste-map operations.
//!
//! Provides structured configuration for column layout, text derivation,
//! embedding, matching and output.

use super::defaults::{
    DEFAULT_BATCH_SIZE, DEFAULT_FASTEMBED_MODEL, DEFAULT_HASHING_DIMENSION,
};
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI flags override values loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Input column names
    pub columns: ColumnsConfig,
    /// Which fields are joined into the text that gets embedded
    pub text: TextConfig,
    /// Embedding provider selection
    pub embedding: EmbeddingConfig,
    /// Matching behaviour
    pub matching: MatchingConfig,
    /// Output settings
    pub output: OutputConfig,
}

// ============================================================================
// Columns
// ============================================================================

/// Column names of the input tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ColumnsConfig {
    pub source: SourceColumns,
    pub reference: ReferenceColumns,
}

/// Column names in the NAMASTE source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SourceColumns {
    /// Unique NAMASTE code
    pub code: String,
    /// Display name
    pub display: String,
    /// Free-text synonyms (column may be absent)
    pub synonyms: String,
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self {
            code: "code".to_string(),
            display: "display".to_string(),
            synonyms: "synonyms".to_string(),
        }
    }
}

/// Column names in the ICD-11 reference tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReferenceColumns {
    /// ICD-11 code
    pub code: String,
    /// Entity title
    pub title: String,
    /// Module tag column written by the reference builder
    pub module: String,
}

impl Default for ReferenceColumns {
    fn default() -> Self {
        Self {
            code: "code".to_string(),
            title: "title".to_string(),
            module: "module".to_string(),
        }
    }
}

// ============================================================================
// Text derivation
// ============================================================================

/// Ordered column headers joined (space-separated) into each row's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TextConfig {
    pub source_fields: Vec<String>,
    pub reference_fields: Vec<String>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            source_fields: vec!["display".to_string(), "synonyms".to_string()],
            reference_fields: vec!["title".to_string()],
        }
    }
}

// ============================================================================
// Embedding
// ============================================================================

/// Available embedding providers.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    clap::ValueEnum,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Built-in deterministic feature-hashing model
    #[default]
    Hashing,
    /// Sentence-transformer model via fastembed (requires the `fastembed` feature)
    Fastembed,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hashing => write!(f, "hashing"),
            Self::Fastembed => write!(f, "fastembed"),
        }
    }
}

/// Embedding provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider to load for the run
    pub provider: ProviderKind,
    /// Vector dimension of the hashing provider
    #[schemars(range(min = 1, max = 65536))]
    pub dimension: usize,
    /// Model name for the fastembed provider
    pub model: String,
    /// Number of texts sent to the provider per call
    #[schemars(range(min = 1))]
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            dimension: DEFAULT_HASHING_DIMENSION,
            model: DEFAULT_FASTEMBED_MODEL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

// ============================================================================
// Matching & output
// ============================================================================

/// Matching behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingConfig {
    /// Score source entries on the rayon thread pool
    pub parallel: bool,
    /// Treat an empty source table as a header-only result instead of an error
    pub allow_empty_source: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            allow_empty_source: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    pub format: ReportFormat,
}

// ============================================================================
// Command-specific paths
// ============================================================================

/// Where the reference terminology comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceInput {
    /// A single table already carrying a module column
    Merged(PathBuf),
    /// MMS and TM2 tables merged at run start
    Split { mms: PathBuf, tm2: PathBuf },
}

/// File locations for the `map` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapPaths {
    pub source: PathBuf,
    pub reference: ReferenceInput,
    pub output: PathBuf,
    /// Optional JSON confidence summary
    pub summary: Option<PathBuf>,
}

/// File locations for the `merge` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePaths {
    pub mms: PathBuf,
    pub tm2: PathBuf,
    pub output: PathBuf,
}
