//! Blame hunk records.
//!
//! A hunk is one maximal run of lines that share the same attribution.
//! Line numbers are 1-indexed, matching libgit2.

use std::path::PathBuf;

use git2::Oid;
use serde::{Serialize, Serializer};

use crate::models::Signature;

/// One contiguous run of lines attributed to the same commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlameHunk {
    /// First line of the hunk in the blamed content (1-indexed)
    pub start_line: usize,
    /// Number of lines in the hunk
    pub line_count: usize,
    /// Commit that last changed these lines; all zeros for uncommitted lines
    #[serde(serialize_with = "serialize_oid")]
    pub final_commit_id: Oid,
    /// Author of `final_commit_id` as recorded by the engine
    pub final_signature: Option<Signature>,
    /// Commit where the lines were first introduced
    #[serde(serialize_with = "serialize_oid")]
    pub orig_commit_id: Oid,
    /// First line of the hunk in `orig_commit_id` (1-indexed)
    pub orig_start_line: usize,
    /// Path of the file in `orig_commit_id`, if the engine tracked it
    pub orig_path: Option<PathBuf>,
    /// Whether the history walk stopped at `final_commit_id`
    pub boundary: bool,
}

impl BlameHunk {
    /// Last line covered by this hunk (inclusive). Saturates rather than
    /// wrapping for a hunk whose count runs off the end of `usize`.
    pub fn end_line(&self) -> usize {
        self.start_line.saturating_add(self.line_count.saturating_sub(1))
    }

    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line - self.start_line < self.line_count
    }

    /// False for lines that only exist in a blamed buffer.
    pub fn is_committed(&self) -> bool {
        !self.final_commit_id.is_zero()
    }

    pub fn short_id(&self) -> String {
        let hash = self.final_commit_id.to_string();
        hash[..hash.len().min(8)].to_string()
    }
}

fn serialize_oid<S: Serializer>(oid: &Oid, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(oid)
}
