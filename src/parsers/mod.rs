//! Input table parsers.
//!
//! Terminology tables arrive as CSV with a header row. Parsing produces a
//! schema-agnostic [`Table`](crate::model::Table); column roles are bound
//! later from configuration.

mod csv;

pub use self::csv::{parse_table_str, read_table};
