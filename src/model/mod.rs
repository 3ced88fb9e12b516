//! Core data model for terminology alignment.
//!
//! Input files are read into schema-agnostic [`Table`]s. Typed entries
//! ([`SourceEntry`], [`ReferenceEntry`]) are extracted from them once the
//! column layout is known, and are never mutated afterwards.

mod entry;
mod table;

pub use entry::{Module, ReferenceEntry, SourceEntry};
pub use table::Table;
