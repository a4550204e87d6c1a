//! Test fixtures: throwaway git repositories and a counting blame engine.

use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use git2::{Oid, Repository};
use tempfile::TempDir;

use crate::git::engine::{BlameEngine, CommitLookup, RawHunk};
use crate::git::options::NativeBlameOptions;
use crate::git::repository::GitRepository;
use crate::models::{CommitMetadata, Signature};

pub struct FixtureRepo {
    dir: TempDir,
    repo: Repository,
}

impl FixtureRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        Self { dir, repo }
    }

    /// Writes `content` to `path` and commits it on HEAD.
    pub fn commit(&self, path: &str, content: &str, message: &str) -> Oid {
        fs::write(self.dir.path().join(path), content).unwrap();

        let sig = self.repo.signature().unwrap();
        let tree_id = {
            let mut index = self.repo.index().unwrap();
            index.add_path(Path::new(path)).unwrap();
            index.write().unwrap();
            index.write_tree().unwrap()
        };
        let tree = self.repo.find_tree(tree_id).unwrap();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    pub fn open(&self) -> GitRepository {
        GitRepository::open(self.dir.path()).unwrap()
    }
}

/// A hunk attributed to the commit whose id is `commit_byte` repeated.
pub fn raw_hunk(start: usize, lines: usize, commit_byte: u8) -> RawHunk {
    let oid = Oid::from_bytes(&[commit_byte; 20]).unwrap();
    RawHunk {
        final_commit_id: oid,
        final_start_line: start,
        lines_in_hunk: lines,
        final_signature: Some(Signature {
            name: "Fake".to_string(),
            email: "fake@example.com".to_string(),
            timestamp: 0,
        }),
        orig_commit_id: oid,
        orig_start_line: start,
        orig_path: None,
        boundary: false,
    }
}

#[derive(Debug)]
pub struct FakeHandle {
    pub hunks: Vec<RawHunk>,
}

/// Engine double that serves a fixed hunk list and counts handles.
#[derive(Default)]
pub struct FakeEngine {
    hunks: Vec<RawHunk>,
    refs: HashMap<String, Oid>,
    extra_count: usize,
    failing_buffer: bool,
    acquired: Cell<usize>,
    released: Cell<usize>,
}

impl FakeEngine {
    pub const MISSING_PATH: &'static str = "missing.txt";

    pub fn with_hunks(mut self, hunks: Vec<RawHunk>) -> Self {
        self.hunks = hunks;
        self
    }

    pub fn with_ref(mut self, name: &str, oid: Oid) -> Self {
        self.refs.insert(name.to_string(), oid);
        self
    }

    /// Reports `extra` more hunks than the handle actually holds.
    pub fn overcounting(mut self, extra: usize) -> Self {
        self.extra_count = extra;
        self
    }

    /// Makes every buffer rerun fail before a computation is acquired.
    pub fn failing_buffer(mut self) -> Self {
        self.failing_buffer = true;
        self
    }

    /// A handle created outside any collection; not counted.
    pub fn handle(&self) -> FakeHandle {
        FakeHandle {
            hunks: self.hunks.clone(),
        }
    }

    pub fn acquired(&self) -> usize {
        self.acquired.get()
    }

    pub fn released(&self) -> usize {
        self.released.get()
    }
}

impl CommitLookup for FakeEngine {
    fn resolve_commit(&self, spec: &str) -> Result<Oid, git2::Error> {
        self.refs
            .get(spec)
            .copied()
            .ok_or_else(|| git2::Error::from_str(&format!("revspec '{spec}' not found")))
    }

    fn commit_metadata(&self, oid: Oid) -> Result<CommitMetadata, git2::Error> {
        Err(git2::Error::from_str(&format!("no commit {oid}")))
    }
}

impl BlameEngine for FakeEngine {
    type Handle<'a> = FakeHandle;

    fn blame_file<'a>(
        &'a self,
        path: &Path,
        _options: &NativeBlameOptions,
    ) -> Result<FakeHandle, git2::Error> {
        if path == Path::new(Self::MISSING_PATH) {
            return Err(git2::Error::from_str("the path does not exist in the given tree"));
        }
        self.acquired.set(self.acquired.get() + 1);
        Ok(self.handle())
    }

    fn blame_buffer<'h, 'r>(&'r self, reference: &'r FakeHandle, _buffer: &[u8]) -> Result<FakeHandle, git2::Error>
    where
        Self: 'h,
        'h: 'r,
    {
        if self.failing_buffer {
            return Err(git2::Error::from_str("buffer blame failed"));
        }
        self.acquired.set(self.acquired.get() + 1);
        Ok(FakeHandle {
            hunks: reference.hunks.clone(),
        })
    }

    /// The last line any served hunk covers.
    fn line_count(&self, path: &Path, _options: &NativeBlameOptions) -> Result<usize, git2::Error> {
        if path == Path::new(Self::MISSING_PATH) {
            return Err(git2::Error::from_str("the path does not exist in the given tree"));
        }
        Ok(self
            .hunks
            .iter()
            .map(|h| h.final_start_line + h.lines_in_hunk.saturating_sub(1))
            .max()
            .unwrap_or(0))
    }

    fn hunk_count<'a>(&'a self, handle: &FakeHandle) -> usize {
        handle.hunks.len() + self.extra_count
    }

    fn hunk_at<'a>(&'a self, handle: &FakeHandle, index: usize) -> Option<RawHunk> {
        handle.hunks.get(index).cloned()
    }

    fn release<'a>(&'a self, handle: FakeHandle) {
        self.released.set(self.released.get() + 1);
        drop(handle);
    }
}
