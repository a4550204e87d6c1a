//! Translation of `BlameOptions` into the engine's parameter block.
//!
//! Revision specifiers are resolved up front; the resolved commit ids are
//! stored as fixed-width byte arrays. An all-zero array means "not set".

use git2::Oid;
use tracing::warn;

use crate::error::{BlameError, Result};
use crate::git::engine::CommitLookup;
use crate::models::{BlameOptions, BlameStrategy};

pub const OID_RAW_LEN: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeBlameOptions {
    pub flags: u32,
    pub min_line: usize,
    pub max_line: usize,
    pub newest_commit: [u8; OID_RAW_LEN],
    pub oldest_commit: [u8; OID_RAW_LEN],
}

impl NativeBlameOptions {
    /// Builds the parameter block, resolving `starting_at`/`stopping_at`
    /// through `repo`. Fails before any blame is attempted when a
    /// specifier does not name a commit.
    pub fn translate<R: CommitLookup + ?Sized>(options: &BlameOptions, repo: &R) -> Result<Self> {
        let mut native = NativeBlameOptions {
            flags: options.strategy.bits(),
            min_line: options.min_line,
            max_line: options.max_line,
            ..Default::default()
        };

        if let Some(spec) = options.starting_at.as_deref() {
            native.newest_commit = resolve_into(repo, spec)?;
        }
        if let Some(spec) = options.stopping_at.as_deref() {
            native.oldest_commit = resolve_into(repo, spec)?;
        }

        Ok(native)
    }

    pub fn strategy(&self) -> BlameStrategy {
        BlameStrategy::from_bits_truncate(self.flags)
    }

    pub fn newest_commit(&self) -> Option<Oid> {
        oid_from_raw(&self.newest_commit)
    }

    pub fn oldest_commit(&self) -> Option<Oid> {
        oid_from_raw(&self.oldest_commit)
    }

    pub fn to_git2(&self) -> std::result::Result<git2::BlameOptions, git2::Error> {
        let strategy = self.strategy();
        let mut opts = git2::BlameOptions::new();
        opts.track_copies_same_file(strategy.contains(BlameStrategy::TRACK_COPIES_SAME_FILE))
            .track_copies_same_commit_moves(
                strategy.contains(BlameStrategy::TRACK_COPIES_SAME_COMMIT_MOVES),
            )
            .track_copies_same_commit_copies(
                strategy.contains(BlameStrategy::TRACK_COPIES_SAME_COMMIT_COPIES),
            )
            .track_copies_any_commit_copies(
                strategy.contains(BlameStrategy::TRACK_COPIES_ANY_COMMIT_COPIES),
            )
            .first_parent(strategy.contains(BlameStrategy::FIRST_PARENT))
            .use_mailmap(strategy.contains(BlameStrategy::USE_MAILMAP))
            .ignore_whitespace(strategy.contains(BlameStrategy::IGNORE_WHITESPACE))
            .min_line(self.min_line)
            .max_line(self.max_line);

        if !is_unset(&self.newest_commit) {
            opts.newest_commit(Oid::from_bytes(&self.newest_commit)?);
        }
        if !is_unset(&self.oldest_commit) {
            opts.oldest_commit(Oid::from_bytes(&self.oldest_commit)?);
        }

        Ok(opts)
    }
}

fn resolve_into<R: CommitLookup + ?Sized>(repo: &R, spec: &str) -> Result<[u8; OID_RAW_LEN]> {
    let oid = repo.resolve_commit(spec).map_err(|source| {
        warn!("Cannot resolve blame revision {}: {}", spec, source);
        BlameError::RevisionResolution {
            spec: spec.to_string(),
            source,
        }
    })?;

    let mut raw = [0u8; OID_RAW_LEN];
    let bytes = oid.as_bytes();
    let len = bytes.len().min(OID_RAW_LEN);
    raw[..len].copy_from_slice(&bytes[..len]);
    Ok(raw)
}

fn is_unset(raw: &[u8; OID_RAW_LEN]) -> bool {
    raw.iter().all(|b| *b == 0)
}

fn oid_from_raw(raw: &[u8; OID_RAW_LEN]) -> Option<Oid> {
    if is_unset(raw) {
        None
    } else {
        Oid::from_bytes(raw).ok()
    }
}
