//! Plain data records shared by the library and the CLI.
//!
//! - `blame`: BlameHunk, one attributed run of lines
//! - `commit`: Signature and lazily resolved CommitMetadata
//! - `options`: BlameOptions and BlameStrategy flags

pub mod blame;
pub mod commit;
pub mod options;

pub use blame::*;
pub use commit::*;
pub use options::*;
