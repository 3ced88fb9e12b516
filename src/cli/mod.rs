//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler receives a fully resolved configuration (file values with CLI
//! overrides applied) and runs one workflow.

mod map;
mod merge;

pub use map::run_map;
pub use merge::run_merge;

use crate::config::{load_or_default, AppConfig};
use crate::error::MapperError;
use std::path::{Path, PathBuf};

/// Load the effective configuration for a command.
///
/// A config file that exists but cannot be parsed is a configuration error.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<(AppConfig, Option<PathBuf>)> {
    let loaded = load_or_default(explicit).map_err(|e| MapperError::config(e.to_string()))?;
    if let Some(path) = &loaded.1 {
        tracing::debug!("Using config file {}", path.display());
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::exit_code_for;

    #[test]
    fn test_bad_explicit_config_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "embedding: [not, a, map]\n").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert_eq!(exit_code_for(&err), crate::error::exit_codes::INPUT_ERROR);
    }
}
