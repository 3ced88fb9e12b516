//! Configuration module for namaste-map.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//!
//! # Configuration File
//!
//! Place a `.namaste-map.yaml` file in the working directory or
//! `~/.config/namaste-map/`:
//!
//! ```yaml
//! embedding:
//!   provider: hashing
//!   dimension: 512
//! output:
//!   format: json
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    CONFIG_FILE_NAMES, DEFAULT_BATCH_SIZE, DEFAULT_FASTEMBED_MODEL, DEFAULT_HASHING_DIMENSION,
    MAX_HASHING_DIMENSION,
};
pub use file::{
    ConfigFileError, discover_config_file, generate_example_config, load_config_file,
    load_or_default, search_dirs,
};
pub use types::{
    AppConfig, ColumnsConfig, EmbeddingConfig, MapPaths, MatchingConfig, MergePaths,
    OutputConfig, ProviderKind, ReferenceColumns, ReferenceInput, SourceColumns, TextConfig,
};
pub use validation::{ConfigError, Validatable};

/// JSON Schema of the config file format.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}
