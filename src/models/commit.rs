use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub timestamp: i64,
}

impl Signature {
    pub fn from_git(sig: &git2::Signature<'_>) -> Self {
        Self {
            name: sig.name().unwrap_or("Unknown").to_string(),
            email: sig.email().unwrap_or("").to_string(),
            timestamp: sig.when().seconds(),
        }
    }

    /// Coarse age of the signature relative to `now` (unix seconds), e.g.
    /// "3 days ago". Future timestamps read as "just now".
    pub fn age_at(&self, now: i64) -> String {
        const UNITS: [(i64, &str); 5] = [
            (365 * DAY, "year"),
            (30 * DAY, "month"),
            (DAY, "day"),
            (3600, "hour"),
            (60, "minute"),
        ];
        const DAY: i64 = 86_400;

        let elapsed = now.saturating_sub(self.timestamp);
        UNITS
            .iter()
            .find(|(secs, _)| elapsed >= *secs)
            .map(|(secs, unit)| {
                let n = elapsed / secs;
                format!("{} {}{} ago", n, unit, if n == 1 { "" } else { "s" })
            })
            .unwrap_or_else(|| "just now".to_string())
    }
}

/// Commit details resolved lazily for a blame hunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitMetadata {
    pub oid: String,
    pub summary: String,
    pub message: String,
    pub author: Signature,
    pub committer: Signature,
    pub relative_time: String,
}
