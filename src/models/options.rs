//! Caller-facing blame configuration.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Attribution strategy. Bit values match libgit2's `git_blame_flag_t`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct BlameStrategy: u32 {
        const TRACK_COPIES_SAME_FILE = 1 << 0;
        const TRACK_COPIES_SAME_COMMIT_MOVES = 1 << 1;
        const TRACK_COPIES_SAME_COMMIT_COPIES = 1 << 2;
        const TRACK_COPIES_ANY_COMMIT_COPIES = 1 << 3;
        const FIRST_PARENT = 1 << 4;
        const USE_MAILMAP = 1 << 5;
        const IGNORE_WHITESPACE = 1 << 6;
    }
}

/// Options for a blame request.
///
/// `min_line`/`max_line` are inclusive and 1-indexed; 0 leaves that end
/// unbounded. `starting_at` names the newest commit to consider (HEAD when
/// absent), `stopping_at` the oldest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlameOptions {
    pub strategy: BlameStrategy,
    pub min_line: usize,
    pub max_line: usize,
    pub starting_at: Option<String>,
    pub stopping_at: Option<String>,
}

impl BlameOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy: BlameStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn lines(mut self, min_line: usize, max_line: usize) -> Self {
        self.min_line = min_line;
        self.max_line = max_line;
        self
    }

    pub fn starting_at(mut self, spec: impl Into<String>) -> Self {
        self.starting_at = Some(spec.into());
        self
    }

    pub fn stopping_at(mut self, spec: impl Into<String>) -> Self {
        self.stopping_at = Some(spec.into());
        self
    }
}
