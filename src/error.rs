//! Error types for blame computation and hunk queries.
//!
//! Construction-time errors (`RevisionResolution`, `Computation`,
//! `MissingHunk`) mean no collection was built. Query-time errors
//! (`IndexOutOfRange`, `NoHunkForLine`) leave the collection usable.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlameError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Cannot resolve revision '{spec}': {source}")]
    RevisionResolution {
        spec: String,
        #[source]
        source: git2::Error,
    },

    #[error("Blame failed for {path}: {source}")]
    Computation {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Engine reported {count} hunks but none at index {index}")]
    MissingHunk { index: usize, count: usize },

    #[error("Hunk index {index} out of range (collection has {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("No hunk contains line {0}")]
    NoHunkForLine(usize),

    #[error("Collection has no live blame computation")]
    NoComputation,
}

pub type Result<T> = std::result::Result<T, BlameError>;
