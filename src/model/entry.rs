//! Typed terminology entries.

use super::Table;
use crate::config::{ReferenceColumns, SourceColumns};
use crate::error::{MapperError, Result};
use crate::matching::TextNormalizer;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// ICD-11 sub-module an entry originates from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum Module {
    /// Mortality and Morbidity Statistics
    #[serde(rename = "MMS")]
    Mms,
    /// Traditional Medicine chapter 2
    #[serde(rename = "TM2")]
    Tm2,
}

impl Module {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mms => "MMS",
            Self::Tm2 => "TM2",
        }
    }

    /// Both modules in reference-table order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Mms, Self::Tm2]
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MMS" => Ok(Self::Mms),
            "TM2" => Ok(Self::Tm2),
            other => Err(format!("unknown module '{other}', expected MMS or TM2")),
        }
    }
}

/// A NAMASTE terminology entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    pub code: String,
    pub display_name: String,
    /// Possibly empty
    pub synonyms: String,
    /// Text handed to the embedding provider
    pub canonical_text: String,
}

impl SourceEntry {
    /// Extract entries from a source table in row order.
    ///
    /// `code` and `display` columns are required, and so is every text
    /// field; only the synonyms column may be absent. Duplicate codes are
    /// kept but logged.
    pub fn collect(
        table: &Table,
        columns: &SourceColumns,
        normalizer: &TextNormalizer,
    ) -> Result<Vec<Self>> {
        require_columns(table, &[&columns.code, &columns.display])?;
        require_text_fields(table, normalizer, Some(&columns.synonyms))?;

        let entries: Vec<Self> = (0..table.len())
            .map(|row| Self {
                code: table.value(row, &columns.code).unwrap_or_default().to_string(),
                display_name: table
                    .value(row, &columns.display)
                    .unwrap_or_default()
                    .to_string(),
                synonyms: table
                    .value(row, &columns.synonyms)
                    .unwrap_or_default()
                    .to_string(),
                canonical_text: normalizer.normalize_row(table, row),
            })
            .collect();

        warn_duplicate_codes(table.name(), &entries);
        Ok(entries)
    }
}

/// An ICD-11 entry from the unified reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEntry {
    pub code: String,
    /// Possibly empty
    pub title: String,
    pub module: Module,
}

impl ReferenceEntry {
    /// Extract entries and their canonical texts from a unified reference table.
    pub fn collect(
        table: &Table,
        columns: &ReferenceColumns,
        normalizer: &TextNormalizer,
    ) -> Result<Vec<(Self, String)>> {
        require_columns(table, &[&columns.code, &columns.title, &columns.module])?;
        require_text_fields(table, normalizer, None)?;

        (0..table.len())
            .map(|row| {
                let raw_module = table.value(row, &columns.module).unwrap_or_default();
                let module = raw_module.parse::<Module>().map_err(|e| {
                    MapperError::config(format!(
                        "table '{}' row {}: {e}",
                        table.name(),
                        row + 1
                    ))
                })?;
                let entry = Self {
                    code: table.value(row, &columns.code).unwrap_or_default().to_string(),
                    title: table.value(row, &columns.title).unwrap_or_default().to_string(),
                    module,
                };
                Ok((entry, normalizer.normalize_row(table, row)))
            })
            .collect()
    }
}

fn require_columns(table: &Table, required: &[&String]) -> Result<()> {
    let missing: Vec<&str> = required
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.as_str())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MapperError::config(format!(
            "table '{}' is missing required column(s): {}",
            table.name(),
            missing.join(", ")
        )))
    }
}

fn warn_duplicate_codes(table: &str, entries: &[SourceEntry]) {
    let mut seen = HashSet::with_capacity(entries.len());
    for (row, entry) in entries.iter().enumerate() {
        if !seen.insert(entry.code.as_str()) {
            tracing::warn!(
                "table '{}' row {}: duplicate code '{}'",
                table,
                row + 1,
                entry.code
            );
        }
    }
}

/// Every text field must name a column of `table`; `optional` may be absent.
fn require_text_fields(
    table: &Table,
    normalizer: &TextNormalizer,
    optional: Option<&String>,
) -> Result<()> {
    let missing: Vec<&str> = normalizer
        .fields()
        .iter()
        .filter(|f| Some(*f) != optional && !table.has_column(f))
        .map(String::as_str)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MapperError::config(format!(
            "table '{}' has no column for text field(s): {}",
            table.name(),
            missing.join(", ")
        )))
    }
}
