//! Schema-agnostic tabular data.

use crate::error::{MapperError, Result};
use indexmap::IndexSet;

/// An ordered table of string cells with a named, duplicate-free header.
///
/// Missing cells are always stored as the empty string, so no consumer
/// ever sees a null sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    headers: IndexSet<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table. Duplicate header names are rejected.
    pub fn new<I, S>(name: impl Into<String>, headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let mut set = IndexSet::new();
        for header in headers {
            let header = header.into();
            if !set.insert(header.clone()) {
                return Err(MapperError::config(format!(
                    "table '{name}' declares column '{header}' more than once"
                )));
            }
        }
        Ok(Self {
            name,
            headers: set,
            rows: Vec::new(),
        })
    }

    /// Build a table from literal rows.
    pub fn from_rows<S: AsRef<str>>(
        name: impl Into<String>,
        headers: &[S],
        rows: Vec<Vec<&str>>,
    ) -> Result<Self> {
        let mut table = Self::new(name, headers.iter().map(|h| h.as_ref().to_string()))?;
        for row in rows {
            table.push_row(row.into_iter().map(str::to_string).collect())?;
        }
        Ok(table)
    }

    /// Append a row. Short rows are padded with empty cells; rows wider
    /// than the header are a parse error.
    pub fn push_row(&mut self, mut row: Vec<String>) -> Result<()> {
        if row.len() > self.headers.len() {
            return Err(MapperError::parse(
                self.name.clone(),
                Some(self.rows.len() + 1),
                format!(
                    "row has {} fields but the header has {}",
                    row.len(),
                    self.headers.len()
                ),
            ));
        }
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn headers(&self) -> &IndexSet<String> {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact (case-sensitive) name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.get_index_of(name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    /// Cell value, or `None` if the row or column does not exist.
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Set `column` to `value` on every row, adding the column if needed.
    pub fn set_column(&mut self, column: &str, value: &str) {
        match self.column(column) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.to_string();
                }
            }
            None => {
                self.headers.insert(column.to_string());
                for row in &mut self.rows {
                    row.push(value.to_string());
                }
            }
        }
    }

    /// Add `column` filled with empty strings if it is absent.
    ///
    /// Returns `true` when the column was added.
    pub fn ensure_column(&mut self, column: &str) -> bool {
        if self.has_column(column) {
            return false;
        }
        self.set_column(column, "");
        true
    }

    /// Rearrange columns into `order`, which must name exactly this table's columns.
    pub fn reorder(&mut self, order: &IndexSet<String>) -> Result<()> {
        if order.len() != self.headers.len() || !order.iter().all(|h| self.headers.contains(h)) {
            return Err(MapperError::config(format!(
                "cannot reorder table '{}': column sets differ",
                self.name
            )));
        }
        let positions: Vec<usize> = order
            .iter()
            .filter_map(|h| self.headers.get_index_of(h))
            .collect();
        for row in &mut self.rows {
            let mut old = std::mem::take(row);
            *row = positions
                .iter()
                .map(|&p| std::mem::take(&mut old[p]))
                .collect();
        }
        self.headers = order.clone();
        Ok(())
    }

    /// Append all rows of `other`, which must have the same column order.
    pub fn extend(&mut self, other: Self) -> Result<()> {
        if !self.headers.iter().eq(other.headers.iter()) {
            return Err(MapperError::config(format!(
                "cannot append table '{}' to '{}': column layouts differ",
                other.name, self.name
            )));
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Rename the table.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            "MMS",
            &["code", "title"],
            vec![vec!["1A00", "Cholera"], vec!["1A01", "Typhoid"]],
        )
        .expect("valid table")
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = Table::new("MMS", ["code", "code"]).unwrap_err();
        assert!(matches!(err, MapperError::Configuration(_)));
    }

    #[test]
    fn test_short_rows_padded_with_empty_cells() {
        let mut table = Table::new("T", ["code", "title", "synonyms"]).unwrap();
        table.push_row(vec!["X1".into(), "fever".into()]).unwrap();
        assert_eq!(table.value(0, "synonyms"), Some(""));
    }

    #[test]
    fn test_wide_row_is_parse_error_with_row_number() {
        let mut table = sample();
        let err = table
            .push_row(vec!["a".into(), "b".into(), "c".into()])
            .unwrap_err();
        match err {
            MapperError::Parse { table, row, .. } => {
                assert_eq!(table, "MMS");
                assert_eq!(row, Some(3));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_set_column_adds_and_overwrites() {
        let mut table = sample();
        table.set_column("module", "MMS");
        assert_eq!(table.value(1, "module"), Some("MMS"));
        table.set_column("module", "TM2");
        assert_eq!(table.value(0, "module"), Some("TM2"));
        assert_eq!(table.headers().len(), 3);
    }

    #[test]
    fn test_ensure_column_only_adds_once() {
        let mut table = sample();
        assert!(table.ensure_column("parent"));
        assert!(!table.ensure_column("parent"));
        assert_eq!(table.value(0, "parent"), Some(""));
    }

    #[test]
    fn test_reorder_moves_cells_with_headers() {
        let mut table = sample();
        let order: IndexSet<String> = ["title", "code"].into_iter().map(String::from).collect();
        table.reorder(&order).unwrap();
        assert_eq!(table.rows()[0], vec!["Cholera", "1A00"]);
        assert_eq!(table.column("code"), Some(1));
    }

    #[test]
    fn test_reorder_rejects_different_column_set() {
        let mut table = sample();
        let order: IndexSet<String> = ["title", "parent"].into_iter().map(String::from).collect();
        assert!(table.reorder(&order).is_err());
    }

    #[test]
    fn test_extend_requires_same_layout() {
        let mut a = sample();
        let b = Table::from_rows("TM2", &["title", "code"], vec![vec!["x", "y"]]).unwrap();
        assert!(a.extend(b).is_err());

        let c = Table::from_rows("TM2", &["code", "title"], vec![vec!["SK00", "Vata"]]).unwrap();
        a.extend(c).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a.value(2, "code"), Some("SK00"));
    }
}
