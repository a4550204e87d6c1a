//! Blame hunk collections.
//!
//! A `BlameHunkCollection` is built once per blame request: the engine
//! computes the blame, every hunk is copied out by index, and the result is
//! queryable by index or by line. The collection governs the computation it
//! was built from: an owned computation is released when the collection is
//! released or dropped, a borrowed one is left to its creator.
//!
//! `from_buffer` re-blames the same file against in-memory contents,
//! reusing this collection's computation as history. The new collection
//! owns its own computation but borrows the receiver, which must outlive it.

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{BlameError, Result};
use crate::git::engine::{BlameEngine, count_lines};
use crate::git::handle::Computation;
use crate::git::options::NativeBlameOptions;
use crate::git::repository::GitRepository;
use crate::models::{BlameHunk, BlameOptions, CommitMetadata};

pub struct BlameHunkCollection<'a, E: BlameEngine + 'a> {
    repo: Option<&'a E>,
    computation: Option<Computation<'a, E::Handle<'a>>>,
    path: String,
    hunks: Vec<BlameHunk>,
}

impl<'a, E: BlameEngine + 'a> BlameHunkCollection<'a, E> {
    /// Blames `path` (relative to the repository root) and takes ownership
    /// of the resulting computation.
    ///
    /// Line bounds are checked against the file before the engine runs: an
    /// inverted range or a bound past the last line is a `Computation` error.
    pub fn from_file(repo: &'a E, path: impl AsRef<Path>, options: &BlameOptions) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();
        let native = NativeBlameOptions::translate(options, repo)?;

        check_line_bounds(repo, path, &native).map_err(|source| computation_error(&path_str, source))?;
        let handle = repo
            .blame_file(path, &native)
            .map_err(|source| computation_error(&path_str, source))?;
        debug!("Acquired blame computation for {}", path_str);

        Self::adopt(repo, Computation::Owned(handle), path_str, None)
    }

    /// Builds a collection over a computation created elsewhere. The
    /// computation is never released by this collection.
    pub fn from_handle(repo: &'a E, handle: &'a E::Handle<'a>, path: impl Into<String>) -> Result<Self> {
        Self::adopt(repo, Computation::Borrowed(handle), path.into(), None)
    }

    /// A collection over fixed hunks with no engine behind it.
    pub fn from_hunks(hunks: Vec<BlameHunk>) -> Self {
        Self {
            repo: None,
            computation: None,
            path: String::new(),
            hunks,
        }
    }

    /// Materializes `computation`. When `extent` is known, every hunk must
    /// end within it. On failure an owned computation is released.
    fn adopt(
        repo: &'a E,
        computation: Computation<'a, E::Handle<'a>>,
        path: String,
        extent: Option<usize>,
    ) -> Result<Self> {
        let hunks = materialize(repo, computation.get())
            .and_then(|hunks| within_extent(hunks, extent, &path));

        match hunks {
            Ok(hunks) => {
                info!("Blamed {}: {} hunks", path, hunks.len());
                Ok(Self {
                    repo: Some(repo),
                    computation: Some(computation),
                    path,
                    hunks,
                })
            }
            Err(e) => {
                warn!("Discarding blame of {}: {}", path, e);
                computation.release(|handle| repo.release(handle));
                Err(e)
            }
        }
    }

    /// Re-blames this collection's file with `buffer` as its contents.
    /// Lines the buffer adds are attributed to the zero commit.
    ///
    /// The result borrows `self`. An empty buffer has no lines to attribute
    /// and yields an empty collection without running the engine.
    pub fn from_buffer<'s>(&'s self, buffer: &[u8]) -> Result<BlameHunkCollection<'s, E>> {
        let (Some(repo), Some(computation)) = (self.repo, self.computation.as_ref()) else {
            return Err(BlameError::NoComputation);
        };

        if buffer.is_empty() {
            debug!("Empty buffer for {}, nothing to blame", self.path);
            return Ok(BlameHunkCollection {
                repo: Some(repo),
                computation: None,
                path: self.path.clone(),
                hunks: Vec::new(),
            });
        }

        let handle = repo
            .blame_buffer(computation.get(), buffer)
            .map_err(|source| computation_error(&self.path, source))?;
        debug!("Acquired buffer blame computation for {} ({} bytes)", self.path, buffer.len());

        BlameHunkCollection::adopt(
            repo,
            Computation::Owned(handle),
            self.path.clone(),
            Some(count_lines(buffer)),
        )
    }

    pub fn get(&self, index: usize) -> Result<&BlameHunk> {
        self.hunks.get(index).ok_or(BlameError::IndexOutOfRange {
            index,
            count: self.hunks.len(),
        })
    }

    /// The hunk covering `line` (1-indexed). Hunks never overlap in a blame
    /// produced by the engine; if they did, the first match would win.
    pub fn hunk_for_line(&self, line: usize) -> Result<&BlameHunk> {
        self.hunks
            .iter()
            .find(|hunk| hunk.contains_line(line))
            .ok_or(BlameError::NoHunkForLine(line))
    }

    pub fn len(&self) -> usize {
        self.hunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlameHunk> {
        self.hunks.iter()
    }

    pub fn as_slice(&self) -> &[BlameHunk] {
        &self.hunks
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this collection will release its computation.
    pub fn is_owning(&self) -> bool {
        self.computation.as_ref().is_some_and(Computation::is_owned)
    }

    pub fn final_commit(&self, hunk: &BlameHunk) -> Result<CommitMetadata> {
        self.commit(hunk.final_commit_id)
    }

    pub fn orig_commit(&self, hunk: &BlameHunk) -> Result<CommitMetadata> {
        self.commit(hunk.orig_commit_id)
    }

    fn commit(&self, oid: git2::Oid) -> Result<CommitMetadata> {
        let repo = self.repo.ok_or(BlameError::NoComputation)?;
        Ok(repo.commit_metadata(oid)?)
    }

    /// Releases an owned computation. Hunks stay queryable; `from_buffer`
    /// fails afterwards. Calling this again does nothing.
    pub fn release(&mut self) {
        let (Some(repo), Some(computation)) = (self.repo, self.computation.take()) else {
            return;
        };
        if computation.release(|handle| repo.release(handle)) {
            debug!("Released blame computation for {}", self.path);
        }
    }
}

impl<'a, E: BlameEngine + 'a> Drop for BlameHunkCollection<'a, E> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<'c, 'a, E: BlameEngine + 'a> IntoIterator for &'c BlameHunkCollection<'a, E> {
    type Item = &'c BlameHunk;
    type IntoIter = std::slice::Iter<'c, BlameHunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.hunks.iter()
    }
}

impl<'a, E: BlameEngine + 'a> fmt::Debug for BlameHunkCollection<'a, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlameHunkCollection")
            .field("path", &self.path)
            .field("owning", &self.is_owning())
            .field("hunks", &self.hunks)
            .finish()
    }
}

fn computation_error(path: &str, source: git2::Error) -> BlameError {
    warn!("Blame failed for {}: {}", path, source);
    BlameError::Computation {
        path: path.to_string(),
        source,
    }
}

/// Rejects inverted line ranges and bounds past the end of the file. A zero
/// bound is open and needs no lookup.
fn check_line_bounds<E: BlameEngine>(
    repo: &E,
    path: &Path,
    native: &NativeBlameOptions,
) -> std::result::Result<(), git2::Error> {
    let (min, max) = (native.min_line, native.max_line);
    if min == 0 && max == 0 {
        return Ok(());
    }
    if min != 0 && max != 0 && min > max {
        return Err(git2::Error::from_str(&format!("invalid line range {},{}", min, max)));
    }

    let lines = repo.line_count(path, native)?;
    let highest = min.max(max);
    if highest > lines {
        return Err(git2::Error::from_str(&format!(
            "line {} is past the end of the file ({} lines)",
            highest, lines
        )));
    }
    Ok(())
}

fn within_extent(hunks: Vec<BlameHunk>, extent: Option<usize>, path: &str) -> Result<Vec<BlameHunk>> {
    let Some(lines) = extent else {
        return Ok(hunks);
    };
    match hunks.iter().find(|hunk| hunk.end_line() > lines) {
        Some(hunk) => Err(BlameError::Computation {
            path: path.to_string(),
            source: git2::Error::from_str(&format!(
                "hunk at line {} runs past the {}-line buffer",
                hunk.start_line, lines
            )),
        }),
        None => Ok(hunks),
    }
}

/// Copies every hunk out of a completed computation, in engine order.
fn materialize<'a, E: BlameEngine + 'a>(repo: &'a E, handle: &E::Handle<'a>) -> Result<Vec<BlameHunk>> {
    let count = repo.hunk_count(handle);
    let mut hunks = Vec::with_capacity(count);

    for index in 0..count {
        let raw = repo
            .hunk_at(handle, index)
            .ok_or(BlameError::MissingHunk { index, count })?;
        hunks.push(BlameHunk::from(raw));
    }

    Ok(hunks)
}

impl GitRepository {
    pub fn blame(&self, path: impl AsRef<Path>, options: &BlameOptions) -> Result<BlameHunkCollection<'_, GitRepository>> {
        BlameHunkCollection::from_file(self, path, options)
    }
}
