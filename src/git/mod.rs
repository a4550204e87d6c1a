pub mod blame;
pub mod engine;
pub mod handle;
pub mod options;
pub mod repository;

#[cfg(test)]
pub(crate) mod testing;

pub use blame::BlameHunkCollection;
pub use engine::{BlameEngine, CommitLookup, RawHunk};
pub use handle::Computation;
pub use options::NativeBlameOptions;
pub use repository::GitRepository;
