//! Configuration validation for namaste-map.
//!
//! Provides validation traits and implementations for all configuration types.

use super::defaults::MAX_HASHING_DIMENSION;
use super::types::{
    AppConfig, ColumnsConfig, EmbeddingConfig, ProviderKind, ReferenceColumns, SourceColumns,
    TextConfig,
};
use crate::error::{MapperError, Result};

// ============================================================================
// Configuration Error
// ============================================================================

/// A single failed check on a configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl AppConfig {
    /// Validate and fold every problem into one configuration error.
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(MapperError::config(joined))
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.columns.validate());
        errors.extend(self.text.validate());
        errors.extend(self.embedding.validate());
        errors
    }
}

impl Validatable for ColumnsConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.source.validate();
        errors.extend(self.reference.validate());
        errors
    }
}

impl Validatable for SourceColumns {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        check_distinct_names(
            "columns.source",
            &[
                ("code", &self.code),
                ("display", &self.display),
                ("synonyms", &self.synonyms),
            ],
            &mut errors,
        );
        errors
    }
}

impl Validatable for ReferenceColumns {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        check_distinct_names(
            "columns.reference",
            &[
                ("code", &self.code),
                ("title", &self.title),
                ("module", &self.module),
            ],
            &mut errors,
        );
        errors
    }
}

impl Validatable for TextConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (field, list) in [
            ("text.source_fields", &self.source_fields),
            ("text.reference_fields", &self.reference_fields),
        ] {
            if list.is_empty() {
                errors.push(ConfigError::new(field, "at least one field is required"));
            }
            if list.iter().any(|f| f.trim().is_empty()) {
                errors.push(ConfigError::new(field, "field names must not be blank"));
            }
        }
        errors
    }
}

impl Validatable for EmbeddingConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.batch_size == 0 {
            errors.push(ConfigError::new(
                "embedding.batch_size",
                "batch size must be at least 1",
            ));
        }

        match self.provider {
            ProviderKind::Hashing => {
                if !(1..=MAX_HASHING_DIMENSION).contains(&self.dimension) {
                    errors.push(ConfigError::new(
                        "embedding.dimension",
                        format!(
                            "dimension must be between 1 and {MAX_HASHING_DIMENSION}, got {}",
                            self.dimension
                        ),
                    ));
                }
            }
            ProviderKind::Fastembed => {
                if self.model.trim().is_empty() {
                    errors.push(ConfigError::new(
                        "embedding.model",
                        "a model name is required for the fastembed provider",
                    ));
                }
            }
        }

        errors
    }
}

fn check_distinct_names(prefix: &str, names: &[(&str, &String)], errors: &mut Vec<ConfigError>) {
    for (role, name) in names {
        if name.trim().is_empty() {
            errors.push(ConfigError::new(
                format!("{prefix}.{role}"),
                "column name must not be blank",
            ));
        }
    }
    for (i, (role_a, a)) in names.iter().enumerate() {
        for (role_b, b) in &names[i + 1..] {
            if a == b {
                errors.push(ConfigError::new(
                    format!("{prefix}.{role_b}"),
                    format!("column '{b}' is already used for '{role_a}'"),
                ));
            }
        }
    }
}
