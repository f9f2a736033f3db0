//! Typed failure modes for vocabulary extraction.
//!
//! IO and parse failures travel as plain `anyhow` errors with context; the
//! conditions below are the ones callers and tests need to tell apart, so
//! they stay downcastable after being wrapped.
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VocabError {
    /// An extraction entry (or source format) is not one of the supported shapes.
    #[error("unsupported configuration for {vocabulary}: {detail}")]
    Configuration { vocabulary: String, detail: String },

    #[error("root term {0} not found in ontology graph")]
    RootNotFound(String),

    /// Usually a misconfigured `descending_from`.
    #[error("root term {0} has no descendants in the is-a hierarchy")]
    NoDescendants(String),

    #[error("column {column:?} missing from table {table}")]
    MissingColumn { table: String, column: String },

    #[error("projection for {table} must keep both \"id\" and \"name\" columns")]
    IncompleteProjection { table: String },
}

impl VocabError {
    pub fn configuration(vocabulary: &str, detail: impl Into<String>) -> Self {
        VocabError::Configuration {
            vocabulary: vocabulary.to_string(),
            detail: detail.into(),
        }
    }
}
