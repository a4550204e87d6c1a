//! Collaborator interfaces for blame computation.
//!
//! `CommitLookup` is the repository side (revision resolution, commit
//! metadata). `BlameEngine` is the attribution engine: it hands out
//! computation handles and answers hunk queries against them. The
//! libgit2-backed implementation lives on `GitRepository`.

use std::path::{Path, PathBuf};

use git2::Oid;

use crate::git::options::NativeBlameOptions;
use crate::git::repository::GitRepository;
use crate::models::{BlameHunk, CommitMetadata, Signature};

pub trait CommitLookup {
    fn resolve_commit(&self, spec: &str) -> Result<Oid, git2::Error>;

    fn commit_metadata(&self, oid: Oid) -> Result<CommitMetadata, git2::Error>;
}

/// Hunk descriptor as reported by the engine for one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHunk {
    pub final_commit_id: Oid,
    pub final_start_line: usize,
    pub lines_in_hunk: usize,
    pub final_signature: Option<Signature>,
    pub orig_commit_id: Oid,
    pub orig_start_line: usize,
    pub orig_path: Option<PathBuf>,
    pub boundary: bool,
}

impl From<RawHunk> for BlameHunk {
    fn from(raw: RawHunk) -> Self {
        BlameHunk {
            start_line: raw.final_start_line,
            line_count: raw.lines_in_hunk,
            final_commit_id: raw.final_commit_id,
            final_signature: raw.final_signature,
            orig_commit_id: raw.orig_commit_id,
            orig_start_line: raw.orig_start_line,
            orig_path: raw.orig_path,
            boundary: raw.boundary,
        }
    }
}

pub trait BlameEngine: CommitLookup {
    /// A completed computation. Dropping it, or passing it to `release`,
    /// frees the engine-side result.
    type Handle<'a>
    where
        Self: 'a;

    fn blame_file<'a>(
        &'a self,
        path: &Path,
        options: &NativeBlameOptions,
    ) -> Result<Self::Handle<'a>, git2::Error>;

    /// Re-runs attribution for `buffer` as the contents of the file that
    /// `reference` blamed, reusing its history. `reference` stays with the
    /// caller and must outlive the new computation.
    fn blame_buffer<'h, 'r>(
        &'r self,
        reference: &'r Self::Handle<'h>,
        buffer: &[u8],
    ) -> Result<Self::Handle<'r>, git2::Error>
    where
        Self: 'h,
        'h: 'r;

    /// Number of lines in `path` at the commit a blame with `options` would
    /// start from.
    fn line_count(&self, path: &Path, options: &NativeBlameOptions) -> Result<usize, git2::Error>;

    fn hunk_count<'a>(&'a self, handle: &Self::Handle<'a>) -> usize;

    fn hunk_at<'a>(&'a self, handle: &Self::Handle<'a>, index: usize) -> Option<RawHunk>;

    fn release<'a>(&'a self, handle: Self::Handle<'a>) {
        drop(handle);
    }
}

impl CommitLookup for GitRepository {
    fn resolve_commit(&self, spec: &str) -> Result<Oid, git2::Error> {
        GitRepository::resolve_commit(self, spec)
    }

    fn commit_metadata(&self, oid: Oid) -> Result<CommitMetadata, git2::Error> {
        GitRepository::commit_metadata(self, oid)
    }
}

impl BlameEngine for GitRepository {
    type Handle<'a> = git2::Blame<'a>;

    fn blame_file<'a>(
        &'a self,
        path: &Path,
        options: &NativeBlameOptions,
    ) -> Result<git2::Blame<'a>, git2::Error> {
        let mut opts = options.to_git2()?;
        self.repo.blame_file(path, Some(&mut opts))
    }

    fn blame_buffer<'h, 'r>(
        &'r self,
        reference: &'r git2::Blame<'h>,
        buffer: &[u8],
    ) -> Result<git2::Blame<'r>, git2::Error>
    where
        Self: 'h,
        'h: 'r,
    {
        reference.blame_buffer(buffer)
    }

    fn line_count(&self, path: &Path, options: &NativeBlameOptions) -> Result<usize, git2::Error> {
        let commit = match options.newest_commit() {
            Some(oid) => self.repo.find_commit(oid)?,
            None => self.repo.head()?.peel_to_commit()?,
        };
        let blob = commit.tree()?.get_path(path)?.to_object(&self.repo)?.peel_to_blob()?;
        Ok(count_lines(blob.content()))
    }

    fn hunk_count<'a>(&'a self, handle: &git2::Blame<'a>) -> usize {
        handle.len()
    }

    fn hunk_at<'a>(&'a self, handle: &git2::Blame<'a>, index: usize) -> Option<RawHunk> {
        handle.get_index(index).map(|hunk| raw_hunk(&hunk))
    }
}

/// Lines in `content`, counting a trailing line without a newline.
pub fn count_lines(content: &[u8]) -> usize {
    let newlines = content.iter().filter(|b| **b == b'\n').count();
    match content.last() {
        Some(b'\n') | None => newlines,
        Some(_) => newlines + 1,
    }
}

fn raw_hunk(hunk: &git2::BlameHunk<'_>) -> RawHunk {
    let final_commit_id = hunk.final_commit_id();
    // libgit2 leaves the signature unset for lines that only exist in a buffer
    let final_signature = if final_commit_id.is_zero() {
        None
    } else {
        Some(Signature::from_git(&hunk.final_signature()))
    };

    RawHunk {
        final_commit_id,
        final_start_line: hunk.final_start_line(),
        lines_in_hunk: hunk.lines_in_hunk(),
        final_signature,
        orig_commit_id: hunk.orig_commit_id(),
        orig_start_line: hunk.orig_start_line(),
        orig_path: hunk.path().map(Path::to_path_buf),
        boundary: hunk.is_boundary(),
    }
}
