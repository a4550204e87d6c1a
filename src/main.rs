//! blame-hunks - show which commit last touched each line of a file
//!
//! # Usage
//! ```bash
//! blame-hunks src/lib.rs                      # Blame at HEAD
//! blame-hunks src/lib.rs -L 10,20 --rev v1.0  # Lines 10-20 as of v1.0
//! blame-hunks src/lib.rs --contents edited.rs # Blame unsaved edits
//! blame-hunks src/lib.rs --line 42 --json     # One hunk, as JSON
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blame_hunks::{BlameHunk, BlameHunkCollection, BlameOptions, BlameStrategy, GitRepository};

/// Show which commit last touched each line of a file
#[derive(Parser)]
#[command(name = "blame-hunks")]
#[command(about = "Per-line attribution for a file in a git repository", long_about = None)]
struct Cli {
    /// File to blame, relative to the repository root
    #[arg(value_name = "PATH")]
    path: String,

    /// Path inside the repository to open
    #[arg(short, long, default_value = ".")]
    repo: String,

    /// Only blame lines MIN through MAX (1-indexed, inclusive)
    #[arg(short = 'L', value_name = "MIN,MAX", value_parser = parse_line_range)]
    lines: Option<(usize, usize)>,

    /// Newest commit to consider (defaults to HEAD)
    #[arg(long, value_name = "REV")]
    rev: Option<String>,

    /// Oldest commit to consider
    #[arg(long, value_name = "REV")]
    since: Option<String>,

    /// Ignore whitespace differences
    #[arg(short = 'w')]
    ignore_whitespace: bool,

    /// Track moved and copied lines; repeat to search more widely
    #[arg(short = 'C', action = clap::ArgAction::Count)]
    copies: u8,

    /// Follow only the first parent of merge commits
    #[arg(long)]
    first_parent: bool,

    /// Map author names and emails through the repository mailmap
    #[arg(long)]
    mailmap: bool,

    /// Blame these contents instead of the committed file
    #[arg(long, value_name = "FILE")]
    contents: Option<PathBuf>,

    /// Show only the hunk containing this line
    #[arg(long, value_name = "LINE")]
    line: Option<usize>,

    /// Print hunks as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn blame_options(&self) -> BlameOptions {
        let mut strategy = BlameStrategy::empty();
        strategy.set(BlameStrategy::IGNORE_WHITESPACE, self.ignore_whitespace);
        strategy.set(BlameStrategy::FIRST_PARENT, self.first_parent);
        strategy.set(BlameStrategy::USE_MAILMAP, self.mailmap);
        if self.copies >= 1 {
            strategy |= BlameStrategy::TRACK_COPIES_SAME_FILE;
        }
        if self.copies >= 2 {
            strategy |= BlameStrategy::TRACK_COPIES_SAME_COMMIT_MOVES
                | BlameStrategy::TRACK_COPIES_SAME_COMMIT_COPIES;
        }
        if self.copies >= 3 {
            strategy |= BlameStrategy::TRACK_COPIES_ANY_COMMIT_COPIES;
        }

        let (min_line, max_line) = self.lines.unwrap_or((0, 0));
        BlameOptions {
            strategy,
            min_line,
            max_line,
            starting_at: self.rev.clone(),
            stopping_at: self.since.clone(),
        }
    }
}

fn parse_line_range(value: &str) -> Result<(usize, usize), String> {
    let (min, max) = value
        .split_once(',')
        .ok_or_else(|| format!("expected MIN,MAX, got '{}'", value))?;
    let min = min.trim().parse::<usize>().map_err(|e| e.to_string())?;
    let max = max.trim().parse::<usize>().map_err(|e| e.to_string())?;
    if min == 0 || max < min {
        return Err(format!("invalid line range {},{}", min, max));
    }
    Ok((min, max))
}

fn report(blame: &BlameHunkCollection<'_, GitRepository>, line: Option<usize>, json: bool) -> anyhow::Result<()> {
    let hunks: Vec<&BlameHunk> = match line {
        Some(line) => vec![blame.hunk_for_line(line)?],
        None => blame.iter().collect(),
    };
    print_hunks(blame, &hunks, json)
}

fn print_hunks(blame: &BlameHunkCollection<'_, GitRepository>, hunks: &[&BlameHunk], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(hunks)?);
        return Ok(());
    }

    let now = chrono::Utc::now().timestamp();
    for hunk in hunks {
        let (author, when) = match &hunk.final_signature {
            Some(sig) => (sig.name.as_str(), sig.age_at(now)),
            None => ("Not Committed Yet", String::new()),
        };
        let summary = if hunk.is_committed() {
            blame.final_commit(hunk).map(|c| c.summary).unwrap_or_default()
        } else {
            String::new()
        };
        let boundary = if hunk.boundary { "^" } else { "" };

        println!(
            "{}{} {:>5}-{:<5} {:<20} {:<16} {}",
            boundary,
            hunk.short_id(),
            hunk.start_line,
            hunk.end_line(),
            author,
            when,
            summary
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let repo = GitRepository::open(&cli.repo)
        .with_context(|| format!("Failed to open repository at {}", cli.repo))?;

    let committed = repo.blame(&cli.path, &cli.blame_options())?;
    match &cli.contents {
        Some(file) => {
            let buffer = std::fs::read(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let edited = committed.from_buffer(&buffer)?;
            report(&edited, cli.line, cli.json)
        }
        None => report(&committed, cli.line, cli.json),
    }
}
