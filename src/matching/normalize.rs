//! Canonical text derivation for embedding.
//!
//! Each row is reduced to one string: the configured fields, in order,
//! joined by a single space. Absent columns contribute an empty string.

use crate::model::Table;

/// Joins a fixed, ordered list of named fields into one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNormalizer {
    fields: Vec<String>,
}

impl TextNormalizer {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Canonical text of `row`, looking fields up by column header.
    #[must_use]
    pub fn normalize_row(&self, table: &Table, row: usize) -> String {
        self.normalize_with(|field| table.value(row, field))
    }

    /// Canonical text given a field lookup.
    pub fn normalize_with<'a, F>(&self, mut lookup: F) -> String
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        join_fields(self.fields.iter().map(|f| lookup(f)))
    }
}

/// Join optional parts with a single space; `None` counts as `""`.
pub fn join_fields<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    parts
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_synonyms_joined_with_space() {
        let table = Table::from_rows(
            "NAMASTE",
            &["code", "display", "synonyms"],
            vec![vec!["N1", "Jwara", "fever pyrexia"]],
        )
        .unwrap();
        let normalizer = TextNormalizer::new(["display", "synonyms"]);
        assert_eq!(normalizer.normalize_row(&table, 0), "Jwara fever pyrexia");
    }

    #[test]
    fn test_empty_synonyms_leave_trailing_separator_only() {
        let table = Table::from_rows(
            "NAMASTE",
            &["code", "display", "synonyms"],
            vec![vec!["N1", "fever", ""]],
        )
        .unwrap();
        let text = TextNormalizer::new(["display", "synonyms"]).normalize_row(&table, 0);
        assert_eq!(text, "fever ");
        assert_eq!(text.trim(), "fever");
    }

    #[test]
    fn test_absent_column_contributes_empty_string() {
        let table = Table::from_rows("NAMASTE", &["code", "display"], vec![vec!["N1", "fever"]])
            .unwrap();
        let text = TextNormalizer::new(["display", "synonyms"]).normalize_row(&table, 0);
        assert_eq!(text, "fever ");
        assert!(!text.contains("None"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_field_order_is_preserved() {
        let normalizer = TextNormalizer::new(["b", "a"]);
        let text = normalizer.normalize_with(|f| match f {
            "a" => Some("first"),
            "b" => Some("second"),
            _ => None,
        });
        assert_eq!(text, "second first");
    }

    #[test]
    fn test_renormalizing_same_fields_is_stable() {
        let table = Table::from_rows("T", &["title"], vec![vec!["Cholera"]]).unwrap();
        let normalizer = TextNormalizer::new(["title"]);
        assert_eq!(
            normalizer.normalize_row(&table, 0),
            normalizer.normalize_row(&table, 0)
        );
        assert_eq!(normalizer.normalize_row(&table, 0), "Cholera");
    }

    #[test]
    fn test_join_fields_all_missing() {
        assert_eq!(join_fields([None, None]), " ");
        assert_eq!(join_fields(std::iter::empty()), "");
    }
}
