use rand::Rng;

use super::FeedbackEngine;
use crate::context::CommitContext;
use crate::error::FeedbackError;

const FEEDBACK_POOL: &[&str] = &[
    "Nice commit! Small, steady steps win the race.",
    "Another one in the books. Keep that momentum going!",
    "Clean history is a gift to your future self. Well done.",
    "Committed and pushed forward. Your repo thanks you.",
    "Good work! Every commit is a checkpoint you can come back to.",
    "That's the spirit. Ship it, learn, repeat.",
    "Solid progress. Remember to take a break now and then.",
];

const SUMMARY_POOL: &[&str] = &[
    "You kept a steady rhythm this week. Consistent, focused commits make reviews and rollbacks much easier.",
    "Your commits tell a clear story. Keep grouping related changes together so each one stays easy to revert.",
    "Lots of activity lately! Consider splitting the larger changes into smaller commits to keep history readable.",
    "Your commit messages are doing real work. Writing down the why alongside the what will pay off later.",
    "A productive stretch. Try to land tests in the same commit as the behavior they cover.",
];

const GENERIC_SUGGESTION: &str = "chore: update files";

/// Offline engine used when no API key is configured or a provider call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalEngine;

impl LocalEngine {
    pub fn new() -> Self {
        LocalEngine
    }
}

fn pick(pool: &[&str]) -> String {
    let idx = rand::rng().random_range(0..pool.len());
    pool[idx].to_string()
}

/// Name of the first file touched by a unified diff.
fn first_changed_file(diff: &str) -> Option<&str> {
    diff.lines()
        .find_map(|line| line.strip_prefix("diff --git "))
        .and_then(|rest| rest.split_whitespace().next())
        .map(|path| path.strip_prefix("a/").unwrap_or(path))
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
}

impl FeedbackEngine for LocalEngine {
    fn generate_feedback(&self, _ctx: &CommitContext) -> Result<String, FeedbackError> {
        Ok(pick(FEEDBACK_POOL))
    }

    fn generate_summary_feedback(&self, _ctx: &CommitContext) -> Result<String, FeedbackError> {
        Ok(pick(SUMMARY_POOL))
    }

    fn generate_commit_suggestion(&self, ctx: &CommitContext) -> Result<String, FeedbackError> {
        let suggestion = ctx
            .diff
            .as_deref()
            .and_then(first_changed_file)
            .map(|file| format!("chore: update {file}"))
            .unwrap_or_else(|| GENERIC_SUGGESTION.to_string());
        Ok(suggestion)
    }

    fn name(&self) -> &str {
        "Local"
    }

    fn is_local(&self) -> bool {
        true
    }
}
