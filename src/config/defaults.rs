//! Default values for namaste-map configuration.

/// Vector dimension of the built-in hashing model (matches MiniLM-L6).
pub const DEFAULT_HASHING_DIMENSION: usize = 384;

/// Largest dimension the hashing model accepts.
pub const MAX_HASHING_DIMENSION: usize = 65_536;

/// Sentence-transformer model loaded by the fastembed provider.
pub const DEFAULT_FASTEMBED_MODEL: &str = "all-minilm-l6-v2";

/// Texts per provider call.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Config file names searched for, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".namaste-map.yaml",
    ".namaste-map.yml",
    "namaste-map.yaml",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_defaults_match_documented_layout() {
        let config = AppConfig::default();
        assert_eq!(config.columns.source.code, "code");
        assert_eq!(config.columns.source.display, "display");
        assert_eq!(config.columns.source.synonyms, "synonyms");
        assert_eq!(config.columns.reference.title, "title");
        assert_eq!(config.columns.reference.module, "module");
        assert_eq!(config.text.source_fields, vec!["display", "synonyms"]);
        assert_eq!(config.text.reference_fields, vec!["title"]);
        assert_eq!(config.embedding.dimension, DEFAULT_HASHING_DIMENSION);
        assert_eq!(config.embedding.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.matching.parallel);
        assert!(config.matching.allow_empty_source);
    }
}
