use std::fs;
use std::path::Path;

use blame_hunks::GitRepository;
use git2::{Oid, Repository};
use tempfile::TempDir;

pub const FILE: &str = "notes.md";

/// A throwaway repository with a configured committer.
pub struct Fixture {
    dir: TempDir,
    repo: Repository,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        Self { dir, repo }
    }

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

/// `FILE` built up over three commits, each adding a distinct block of lines.
pub fn three_commits() -> (Fixture, Vec<Oid>) {
    let fixture = Fixture::new();
    let ids = vec![
        fixture.commit(FILE, "alpha\nbeta\n", "first"),
        fixture.commit(FILE, "alpha\nbeta\ngamma\ndelta\n", "second"),
        fixture.commit(FILE, "alpha\nbeta\ngamma\ndelta\nepsilon\n", "third"),
    ];
    (fixture, ids)
}
