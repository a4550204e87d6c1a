use git2::{Oid, Repository};
use std::path::Path;

use crate::error::{BlameError, Result};
use crate::models::{CommitMetadata, Signature};

pub struct GitRepository {
    pub repo: Repository,
    pub path: String,
}

impl GitRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let repo = Repository::discover(&path).map_err(|_| BlameError::RepoNotFound(path_str.clone()))?;

        Ok(Self {
            repo,
            path: path_str,
        })
    }

    /// Resolves a revision specifier ("HEAD~2", a branch, an abbreviated
    /// hash) to the commit it names.
    pub fn resolve_commit(&self, spec: &str) -> std::result::Result<Oid, git2::Error> {
        let commit = self.repo.revparse_single(spec)?.peel_to_commit()?;
        Ok(commit.id())
    }

    pub fn commit_metadata(&self, oid: Oid) -> std::result::Result<CommitMetadata, git2::Error> {
        let commit = self.repo.find_commit(oid)?;
        Ok(commit_to_metadata(&commit))
    }
}

pub fn commit_to_metadata(commit: &git2::Commit) -> CommitMetadata {
    let author = Signature::from_git(&commit.author());
    let relative_time = author.age_at(chrono::Utc::now().timestamp());
    CommitMetadata {
        oid: commit.id().to_string(),
        summary: commit.summary().unwrap_or("").trim().to_string(),
        message: commit.message().unwrap_or("").trim().to_string(),
        author,
        committer: Signature::from_git(&commit.committer()),
        relative_time,
    }
}
