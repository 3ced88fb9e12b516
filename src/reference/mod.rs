//! Unified ICD-11 reference table.
//!
//! [`ReferenceTableBuilder`] aligns the MMS and TM2 tables into one table:
//! every row is tagged with its module first, the column sets are then
//! unioned (absent columns filled with `""`), and the rows are concatenated
//! MMS first, each in original order. [`ReferenceTable`] is the typed view
//! of the result that the matcher consumes.

use crate::config::ReferenceColumns;
use crate::error::{MapperError, Result};
use crate::matching::TextNormalizer;
use crate::model::{Module, ReferenceEntry, Table};
use indexmap::{IndexMap, IndexSet};

/// Name given to the unified table in logs and errors.
pub const UNIFIED_TABLE_NAME: &str = "ICD-11";

/// Builds the unified reference table from the two module tables.
#[derive(Debug, Clone)]
pub struct ReferenceTableBuilder {
    module_column: String,
}

impl Default for ReferenceTableBuilder {
    fn default() -> Self {
        Self::new("module")
    }
}

impl ReferenceTableBuilder {
    pub fn new(module_column: impl Into<String>) -> Self {
        Self {
            module_column: module_column.into(),
        }
    }

    /// Merge `mms` and `tm2`.
    ///
    /// Fails with `EmptyReferenceTable` if either input has no rows, and
    /// with a configuration error if two column names differ only by case.
    pub fn build(&self, mut mms: Table, mut tm2: Table) -> Result<Table> {
        for table in [&mms, &tm2] {
            if table.is_empty() {
                return Err(MapperError::EmptyReferenceTable {
                    table: table.name().to_string(),
                });
            }
        }

        self.tag(&mut mms, Module::Mms);
        self.tag(&mut tm2, Module::Tm2);
        check_case_collisions(&[&mms, &tm2])?;

        let union: IndexSet<String> = mms
            .headers()
            .iter()
            .chain(tm2.headers().iter())
            .cloned()
            .collect();

        for table in [&mut mms, &mut tm2] {
            let added: Vec<&String> = union
                .iter()
                .filter(|column| table.ensure_column(column))
                .collect();
            if !added.is_empty() {
                tracing::debug!(
                    "Filled {} column(s) absent from {}: {:?}",
                    added.len(),
                    table.name(),
                    added
                );
            }
            table.reorder(&union)?;
        }

        let (mms_rows, tm2_rows) = (mms.len(), tm2.len());
        let mut unified = mms.with_name(UNIFIED_TABLE_NAME);
        unified.extend(tm2)?;
        tracing::info!(
            "Built reference table: {} MMS + {} TM2 = {} entries, {} columns",
            mms_rows,
            tm2_rows,
            unified.len(),
            unified.headers().len()
        );
        Ok(unified)
    }

    fn tag(&self, table: &mut Table, module: Module) {
        if table.has_column(&self.module_column) {
            tracing::warn!(
                "Table {} already has a '{}' column; overwriting with {}",
                table.name(),
                self.module_column,
                module
            );
        }
        table.set_column(&self.module_column, module.as_str());
    }
}

/// Reject column names that collide case-insensitively but not exactly.
fn check_case_collisions(tables: &[&Table]) -> Result<()> {
    let mut seen: IndexMap<String, (&str, &str)> = IndexMap::new();
    for table in tables {
        for header in table.headers() {
            let key = header.to_lowercase();
            match seen.get(&key) {
                Some((spelling, owner)) if *spelling != header.as_str() => {
                    return Err(MapperError::config(format!(
                        "column '{header}' in table '{}' collides with '{spelling}' in table '{owner}'",
                        table.name()
                    )));
                }
                Some(_) => {}
                None => {
                    seen.insert(key, (header.as_str(), table.name()));
                }
            }
        }
    }
    Ok(())
}

/// Typed, read-only view of the unified reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    name: String,
    entries: Vec<ReferenceEntry>,
    texts: Vec<String>,
}

impl ReferenceTable {
    /// Extract entries and canonical texts from a unified table.
    pub fn from_table(
        table: &Table,
        columns: &ReferenceColumns,
        normalizer: &TextNormalizer,
    ) -> Result<Self> {
        if table.is_empty() {
            return Err(MapperError::EmptyReferenceTable {
                table: table.name().to_string(),
            });
        }
        let (entries, texts) = ReferenceEntry::collect(table, columns, normalizer)?
            .into_iter()
            .unzip();
        Ok(Self {
            name: table.name().to_string(),
            entries,
            texts,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    /// Canonical texts, parallel to [`Self::entries`].
    #[must_use]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries per module.
    #[must_use]
    pub fn module_counts(&self) -> IndexMap<Module, usize> {
        let mut counts: IndexMap<Module, usize> =
            Module::all().into_iter().map(|m| (m, 0)).collect();
        for entry in &self.entries {
            *counts.entry(entry.module).or_default() += 1;
        }
        counts
    }
}
