//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::defaults::CONFIG_FILE_NAMES;
use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Directories searched for a config file when no explicit path is given.
#[must_use]
pub fn search_dirs() -> Vec<PathBuf> {
    let mut dirs_found = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs_found.push(cwd);
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_found.push(config_dir.join("namaste-map"));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_found.push(home);
    }
    dirs_found
}

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/namaste-map/)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }
    search_dirs().iter().find_map(|dir| find_config_in_dir(dir))
}

fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load the discovered config, or defaults if none is found.
///
/// An explicitly named file that fails to load is an error; a discovered
/// file that fails to load is logged and skipped.
pub fn load_or_default(
    explicit_path: Option<&Path>,
) -> Result<(AppConfig, Option<PathBuf>), ConfigFileError> {
    if let Some(path) = explicit_path {
        let config = load_config_file(path)?;
        return Ok((config, Some(path.to_path_buf())));
    }
    match discover_config_file(None) {
        Some(path) => match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                Ok((config, Some(path)))
            }
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Ok((AppConfig::default(), None))
            }
        },
        None => Ok((AppConfig::default(), None)),
    }
}

/// Example configuration written by `config init`.
#[must_use]
pub fn generate_example_config() -> String {
    r"# namaste-map configuration
# ========================
#
# Place this file at:
#   - .namaste-map.yaml in the working directory
#   - ~/.config/namaste-map/namaste-map.yaml for global config
#
# CLI arguments always override file settings.

# Input column names
columns:
  source:
    code: code
    display: display
    # May be absent from the file; missing synonyms are treated as empty
    synonyms: synonyms
  reference:
    code: code
    title: title
    # Column holding MMS / TM2, written by `merge`
    module: module

# Column headers joined with a single space into the embedded text
text:
  source_fields: [display, synonyms]
  reference_fields: [title]

# Embedding provider
embedding:
  # hashing (built in) or fastembed (requires the `fastembed` build feature)
  provider: hashing
  # Vector dimension for the hashing provider
  dimension: 384
  # Model for the fastembed provider
  model: all-minilm-l6-v2
  batch_size: 256

matching:
  # Score source entries in parallel
  parallel: true
  # An empty source table produces a header-only output instead of failing
  allow_empty_source: true

output:
  # csv or json
  format: csv
"
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use crate::reports::ReportFormat;

    #[test]
    fn test_example_config_parses_to_defaults() {
        let config: AppConfig =
            serde_yaml::from_str(&generate_example_config()).expect("example must parse");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".namaste-map.yaml");
        std::fs::write(
            &path,
            "embedding:\n  provider: hashing\n  dimension: 64\noutput:\n  format: json\n",
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.embedding.provider, ProviderKind::Hashing);
        assert_eq!(config.embedding.dimension, 64);
        assert_eq!(config.output.format, ReportFormat::Json);
        assert_eq!(config.columns.source.code, "code");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = load_or_default(Some(Path::new("/nonexistent/namaste-map.yaml")));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "embedding: [not, a, map").unwrap();
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_find_config_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_in_dir(dir.path()).is_none());
        std::fs::write(dir.path().join("namaste-map.yaml"), "{}").unwrap();
        assert_eq!(
            find_config_in_dir(dir.path()),
            Some(dir.path().join("namaste-map.yaml"))
        );
    }
}
