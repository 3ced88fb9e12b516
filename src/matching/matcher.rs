//! Best-match selection for every source entry.

use super::index::{Nearest, SimilarityIndex};
use crate::embedding::{validate_vector, Embedding};
use crate::error::{EmbeddingErrorKind, MapperError, Result};
use crate::model::{ReferenceEntry, SourceEntry};
use rayon::prelude::*;

/// Below this many sources the scan stays on the calling thread.
const PARALLEL_THRESHOLD: usize = 64;

/// One source entry paired with its best reference entry.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct MatchResult<'a> {
    pub source: &'a SourceEntry,
    pub best_reference: &'a ReferenceEntry,
    /// Row of `best_reference` in the reference table
    pub reference_index: usize,
    /// Cosine similarity in `[-1, 1]`, unrounded
    pub score: f64,
}

/// Selects the arg-max reference entry for each source vector.
///
/// The index and the reference entries are read-only for the matcher's
/// lifetime, so per-source matching is independent and may run in parallel.
pub struct SimilarityMatcher<'r, I> {
    index: I,
    references: &'r [ReferenceEntry],
    parallel: bool,
}

impl<'r, I: SimilarityIndex> SimilarityMatcher<'r, I> {
    /// `references` must be in the same order as the rows of `index`.
    pub fn new(index: I, references: &'r [ReferenceEntry]) -> Result<Self> {
        if index.len() != references.len() {
            return Err(MapperError::config(format!(
                "similarity index holds {} rows but {} reference entries were given",
                index.len(),
                references.len()
            )));
        }
        Ok(Self {
            index,
            references,
            parallel: true,
        })
    }

    /// Enable or disable parallel matching
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Best match for a single source vector.
    pub fn best_match<'a>(&self, source: &'a SourceEntry, vector: &[f32]) -> Result<MatchResult<'a>>
    where
        'r: 'a,
    {
        let Nearest { index, score } = self.index.nearest(vector)?;
        let best_reference = self.references.get(index).ok_or_else(|| {
            MapperError::config(format!("similarity index returned unknown row {index}"))
        })?;
        Ok(MatchResult {
            source,
            best_reference,
            reference_index: index,
            score,
        })
    }

    /// Match every source entry, preserving input order.
    ///
    /// `vectors[i]` is the embedding of `sources[i]`. All vectors are checked
    /// against the index dimension before any scoring, so the reported
    /// failure is always the first offending source.
    pub fn match_all<'a>(
        &self,
        sources: &'a [SourceEntry],
        vectors: &[Embedding],
    ) -> Result<Vec<MatchResult<'a>>>
    where
        'r: 'a,
    {
        if sources.len() != vectors.len() {
            return Err(MapperError::embedding(
                "source embeddings",
                EmbeddingErrorKind::BatchLength {
                    expected: sources.len(),
                    actual: vectors.len(),
                },
            ));
        }
        let dimension = self.index.dimension();
        for (source, vector) in sources.iter().zip(vectors) {
            validate_vector(vector, dimension, || format!("source {}", source.code))?;
        }

        let results: Vec<MatchResult<'a>> = if self.parallel && sources.len() > PARALLEL_THRESHOLD
        {
            sources
                .par_iter()
                .zip(vectors.par_iter())
                .map(|(source, vector)| self.best_match(source, vector))
                .collect::<Result<_>>()?
        } else {
            sources
                .iter()
                .zip(vectors)
                .map(|(source, vector)| self.best_match(source, vector))
                .collect::<Result<_>>()?
        };

        tracing::debug!(
            "Matched {} source entries against {} references",
            results.len(),
            self.index.len()
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingMatrix;
    use crate::matching::ExhaustiveIndex;
    use crate::model::Module;

    fn source(code: &str) -> SourceEntry {
        SourceEntry {
            code: code.to_string(),
            display_name: code.to_lowercase(),
            synonyms: String::new(),
            canonical_text: format!("{} ", code.to_lowercase()),
        }
    }

    fn reference(code: &str, module: Module) -> ReferenceEntry {
        ReferenceEntry {
            code: code.to_string(),
            title: code.to_lowercase(),
            module,
        }
    }

    fn matcher<'r>(
        references: &'r [ReferenceEntry],
        rows: Vec<Vec<f32>>,
    ) -> SimilarityMatcher<'r, ExhaustiveIndex> {
        let matrix = EmbeddingMatrix::new(2, rows, |i| format!("reference #{i}")).unwrap();
        SimilarityMatcher::new(ExhaustiveIndex::new("ICD-11", matrix).unwrap(), references).unwrap()
    }

    #[test]
    fn test_match_all_preserves_order() {
        let refs = vec![reference("X1", Module::Mms), reference("X2", Module::Tm2)];
        let m = matcher(&refs, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let sources = vec![source("N1"), source("N2"), source("N3")];
        let vectors = vec![vec![0.0, 1.0], vec![1.0, 0.2], vec![0.1, 1.0]];

        let results = m.match_all(&sources, &vectors).unwrap();
        let codes: Vec<(&str, &str)> = results
            .iter()
            .map(|r| (r.source.code.as_str(), r.best_reference.code.as_str()))
            .collect();
        assert_eq!(codes, vec![("N1", "X2"), ("N2", "X1"), ("N3", "X2")]);
        assert_eq!(results[0].reference_index, 1);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let refs: Vec<ReferenceEntry> = (0..5)
            .map(|i| reference(&format!("X{i}"), Module::Mms))
            .collect();
        let rows: Vec<Vec<f32>> = (0..5).map(|i| vec![1.0, i as f32 * 0.5]).collect();
        let sources: Vec<SourceEntry> = (0..200).map(|i| source(&format!("N{i}"))).collect();
        let vectors: Vec<Embedding> = (0..200)
            .map(|i| vec![(i % 7) as f32 - 3.0, (i % 5) as f32])
            .collect();

        let sequential = matcher(&refs, rows.clone())
            .with_parallel(false)
            .match_all(&sources, &vectors)
            .unwrap();
        let parallel = matcher(&refs, rows)
            .with_parallel(true)
            .match_all(&sources, &vectors)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_dimension_mismatch_names_source() {
        let refs = vec![reference("X1", Module::Mms)];
        let m = matcher(&refs, vec![vec![1.0, 0.0]]);
        let sources = vec![source("N1"), source("N2")];
        let vectors = vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]];
        let err = m.match_all(&sources, &vectors).unwrap_err();
        assert!(matches!(
            err,
            MapperError::DimensionMismatch { ref entry, expected: 2, actual: 3 } if entry == "source N2"
        ));
    }

    #[test]
    fn test_vector_count_must_match_sources() {
        let refs = vec![reference("X1", Module::Mms)];
        let m = matcher(&refs, vec![vec![1.0, 0.0]]);
        assert!(m.match_all(&[source("N1")], &[]).is_err());
    }

    #[test]
    fn test_index_and_entries_must_align() {
        let refs = vec![reference("X1", Module::Mms)];
        let matrix = EmbeddingMatrix::new(2, vec![vec![1.0, 0.0], vec![0.0, 1.0]], |i| {
            i.to_string()
        })
        .unwrap();
        let index = ExhaustiveIndex::new("ICD-11", matrix).unwrap();
        assert!(SimilarityMatcher::new(index, &refs).is_err());
    }

    #[test]
    fn test_empty_sources_yield_no_results() {
        let refs = vec![reference("X1", Module::Mms)];
        let m = matcher(&refs, vec![vec![1.0, 0.0]]);
        assert!(m.match_all(&[], &[]).unwrap().is_empty());
    }
}
