//! Line attribution ("blame") for files tracked in a git repository.
//!
//! `GitRepository::blame` runs libgit2's blame for a path and collects the
//! result into a [`BlameHunkCollection`]: an ordered, contiguous list of
//! [`BlameHunk`]s that can be queried by index or by line, and re-run
//! against in-memory contents with [`BlameHunkCollection::from_buffer`].
//!
//! ```no_run
//! use blame_hunks::{BlameOptions, GitRepository};
//!
//! let repo = GitRepository::open(".")?;
//! let blame = repo.blame("src/lib.rs", &BlameOptions::new().lines(1, 20))?;
//! for hunk in &blame {
//!     println!("{} {}-{}", hunk.short_id(), hunk.start_line, hunk.end_line());
//! }
//! let edited = blame.from_buffer(b"new contents\n")?;
//! println!("{}", edited.hunk_for_line(1)?.is_committed());
//! # Ok::<(), blame_hunks::BlameError>(())
//! ```

pub mod error;
pub mod git;
pub mod models;

pub use error::{BlameError, Result};
pub use git::{BlameEngine, BlameHunkCollection, CommitLookup, Computation, GitRepository};
pub use models::{BlameHunk, BlameOptions, BlameStrategy, CommitMetadata, Signature};
