use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as GitCommand;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, Timelike};
use serde_json::Value;

use crate::context::TimeOfDay;

const RECORD_SEP: char = '\x1e';
const FIELD_SEP: char = '\x1f';
const LOG_FORMAT: &str = "--pretty=format:%x1e%an%x1f%ct%x1f%s";

/// Run a git command and capture stdout as String.
pub fn git_output(args: &[&str]) -> Result<String> {
    let output = GitCommand::new("git")
        .args(args)
        .output()
        .with_context(|| format!("failed to run git {:?}", args))?;

    if !output.status.success() {
        return Err(anyhow!(
            "git {:?} exited with status {:?}",
            args,
            output.status.code()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Get the path to the Git directory (e.g. .git)
pub fn git_dir() -> Result<PathBuf> {
    let dir = git_output(&["rev-parse", "--git-dir"])?.trim().to_string();
    Ok(PathBuf::from(dir))
}

/// Write the commit message into .git/COMMIT_EDITMSG so the next `git commit`
/// will use it as the default message in the editor.
pub fn write_commit_editmsg(message: &str) -> Result<PathBuf> {
    let path = git_dir()?.join("COMMIT_EDITMSG");
    fs::write(&path, format!("{message}\n"))
        .with_context(|| format!("failed to write commit message to {:?}", path))?;
    Ok(path)
}

/// Get the full staged diff.
pub fn staged_diff() -> Result<String> {
    git_output(&["diff", "--cached"])
}

/// Get a list of staged files.
pub fn staged_files() -> Result<Vec<String>> {
    let output = git_output(&["diff", "--cached", "--name-only"])?;
    let files = output
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    Ok(files)
}

/// The most recent commit.
#[derive(Debug, Clone)]
pub struct HeadCommit {
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub diff: String,
}

pub fn head_commit() -> Result<HeadCommit> {
    let message = git_output(&["log", "-1", "--pretty=format:%B"])?
        .trim()
        .to_string();
    let timestamp = git_output(&["log", "-1", "--pretty=format:%ct"])?;
    let timestamp = parse_unix_timestamp(timestamp.trim())
        .ok_or_else(|| anyhow!("invalid commit timestamp {:?}", timestamp.trim()))?;
    let diff = git_output(&["show", "--pretty=format:", "HEAD"])?;

    Ok(HeadCommit {
        message,
        timestamp,
        diff,
    })
}

/// Subjects of the latest `count` commits, newest first, skipping `skip`.
pub fn recent_subjects(count: usize, skip: usize) -> Result<Vec<String>> {
    let count = format!("-n{count}");
    let skip = format!("--skip={skip}");
    let output = git_output(&["log", &count, &skip, "--pretty=format:%s"])?;
    Ok(output
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

/// Combined patch of the latest `count` commits.
pub fn recent_patch(count: usize) -> Result<String> {
    let count = format!("-n{count}");
    git_output(&["log", &count, "--no-merges", "-p", "--pretty=format:commit %h %s"])
}

/// `user.name` from git config, if set.
pub fn user_name() -> Option<String> {
    git_output(&["config", "user.name"])
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Repository name from the origin remote, else the top-level directory.
pub fn repo_name() -> Option<String> {
    let from_remote = detect_repo_id()
        .and_then(|id| id.rsplit_once('/').map(|(_, repo)| repo.to_string()));
    if from_remote.is_some() {
        return from_remote;
    }

    let top = git_output(&["rev-parse", "--show-toplevel"]).ok()?;
    Path::new(top.trim())
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
}

/// Try to derive a repo identifier like "owner/repo" from `git remote.origin.url`.
pub fn detect_repo_id() -> Option<String> {
    let url = git_output(&["config", "--get", "remote.origin.url"]).ok()?;
    repo_id_from_url(&url)
}

fn repo_id_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches(".git");

    // For SSH: git@github.com:owner/repo
    // For HTTPS: https://github.com/owner/repo
    let path = if let Some(idx) = trimmed.find("://") {
        let rest = &trimmed[idx + 3..];
        match rest.find('/') {
            Some(slash) => &rest[slash + 1..],
            None => rest,
        }
    } else if let Some(idx) = trimmed.find(':') {
        &trimmed[idx + 1..]
    } else {
        trimmed
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() >= 2 {
        let owner = segments[segments.len() - 2];
        let repo = segments[segments.len() - 1];
        Some(format!("{}/{}", owner, repo))
    } else {
        None
    }
}

/// One commit from `git log --shortstat`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub author: String,
    pub timestamp: DateTime<Local>,
    pub subject: String,
    pub files_changed: u64,
    pub insertions: u64,
    pub deletions: u64,
}

/// Non-merge commits since `since` (any `git log --since` expression).
pub fn log_since(since: &str) -> Result<Vec<LogEntry>> {
    let since = format!("--since={since}");
    let output = git_output(&["log", "--no-merges", &since, LOG_FORMAT, "--shortstat"])?;
    Ok(parse_log(&output))
}

/// The latest `count` non-merge commits.
pub fn log_last(count: usize) -> Result<Vec<LogEntry>> {
    let count = format!("-n{count}");
    let output = git_output(&["log", "--no-merges", &count, LOG_FORMAT, "--shortstat"])?;
    Ok(parse_log(&output))
}

/// Parse output produced with `LOG_FORMAT` and `--shortstat`. Malformed
/// records are skipped.
pub fn parse_log(output: &str) -> Vec<LogEntry> {
    output
        .split(RECORD_SEP)
        .filter_map(|record| {
            let mut lines = record.lines();
            let header = lines.next()?;
            let mut fields = header.split(FIELD_SEP);
            let author = fields.next()?.trim().to_string();
            let timestamp = parse_unix_timestamp(fields.next()?.trim())?;
            let subject = fields.next().unwrap_or("").trim().to_string();

            let mut entry = LogEntry {
                author,
                timestamp,
                subject,
                files_changed: 0,
                insertions: 0,
                deletions: 0,
            };
            if let Some(stat) = lines.find(|l| l.contains("changed")) {
                apply_shortstat(&mut entry, stat);
            }
            Some(entry)
        })
        .collect()
}

/// " 3 files changed, 10 insertions(+), 2 deletions(-)"
fn apply_shortstat(entry: &mut LogEntry, line: &str) {
    for part in line.split(',') {
        let mut words = part.split_whitespace();
        let Some(count) = words.next().and_then(|n| n.parse::<u64>().ok()) else {
            continue;
        };
        match words.next() {
            Some(w) if w.starts_with("file") => entry.files_changed = count,
            Some(w) if w.starts_with("insertion") => entry.insertions = count,
            Some(w) if w.starts_with("deletion") => entry.deletions = count,
            _ => {}
        }
    }
}

fn parse_unix_timestamp(secs: &str) -> Option<DateTime<Local>> {
    let secs = secs.parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.with_timezone(&Local))
}

/// Aggregate statistics for a set of commits.
pub fn log_stats(entries: &[LogEntry]) -> BTreeMap<String, Value> {
    let mut stats = BTreeMap::new();
    let authors: HashSet<&str> = entries.iter().map(|e| e.author.as_str()).collect();

    stats.insert("total_commits".into(), Value::from(entries.len()));
    stats.insert(
        "files_changed".into(),
        Value::from(entries.iter().map(|e| e.files_changed).sum::<u64>()),
    );
    stats.insert(
        "insertions".into(),
        Value::from(entries.iter().map(|e| e.insertions).sum::<u64>()),
    );
    stats.insert(
        "deletions".into(),
        Value::from(entries.iter().map(|e| e.deletions).sum::<u64>()),
    );
    stats.insert("unique_authors".into(), Value::from(authors.len()));

    for bucket in [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ] {
        let count = entries
            .iter()
            .filter(|e| TimeOfDay::from_hour(e.timestamp.hour()) == bucket)
            .count();
        stats.insert(format!("{}_commits", bucket.as_str()), Value::from(count));
    }

    stats
}

/// Cut a diff to at most `max_chars` characters, noting how much was dropped.
pub fn truncate_diff(diff: &str, max_chars: usize) -> String {
    match diff.char_indices().nth(max_chars) {
        None => diff.to_string(),
        Some((idx, _)) => {
            let dropped = diff[idx..].lines().count();
            format!("{}\n... [diff truncated, {dropped} more lines]", &diff[..idx])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(author: &str, ts: i64, subject: &str, stat: &str) -> String {
        format!("{RECORD_SEP}{author}{FIELD_SEP}{ts}{FIELD_SEP}{subject}\n\n{stat}\n")
    }

    #[test]
    fn parses_log_records_with_shortstat() {
        let output = format!(
            "{}{}",
            record(
                "Ada",
                1_700_000_000,
                "feat: a",
                " 3 files changed, 10 insertions(+), 2 deletions(-)",
            ),
            record("Bob", 1_700_003_600, "fix: b", " 1 file changed, 1 insertion(+)"),
        );
        let entries = parse_log(&output);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].author, "Ada");
        assert_eq!(entries[0].subject, "feat: a");
        assert_eq!(entries[0].files_changed, 3);
        assert_eq!(entries[0].insertions, 10);
        assert_eq!(entries[0].deletions, 2);
        assert_eq!(entries[1].files_changed, 1);
        assert_eq!(entries[1].deletions, 0);
    }

    #[test]
    fn skips_malformed_records() {
        let output = format!("{RECORD_SEP}garbage\n{}", record("Ada", 1, "x", ""));
        let entries = parse_log(&output);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].files_changed, 0);
    }

    #[test]
    fn stats_aggregate_entries() {
        let output = format!(
            "{}{}{}",
            record("Ada", 1_700_000_000, "a", " 2 files changed, 5 insertions(+), 1 deletion(-)"),
            record("Ada", 1_700_000_100, "b", " 1 file changed, 3 deletions(-)"),
            record("Bob", 1_700_000_200, "c", " 4 files changed, 7 insertions(+)"),
        );
        let stats = log_stats(&parse_log(&output));

        assert_eq!(stats["total_commits"], 3);
        assert_eq!(stats["files_changed"], 7);
        assert_eq!(stats["insertions"], 12);
        assert_eq!(stats["deletions"], 4);
        assert_eq!(stats["unique_authors"], 2);

        let bucketed: u64 = ["morning", "afternoon", "evening", "night"]
            .iter()
            .map(|b| stats[&format!("{b}_commits")].as_u64().unwrap())
            .sum();
        assert_eq!(bucketed, 3);
    }

    #[test]
    fn stats_of_nothing_are_zero() {
        let stats = log_stats(&[]);
        assert_eq!(stats["total_commits"], 0);
        assert_eq!(stats["unique_authors"], 0);
    }

    #[test]
    fn repo_id_from_ssh_and_https() {
        assert_eq!(
            repo_id_from_url("git@github.com:owner/repo.git\n").as_deref(),
            Some("owner/repo")
        );
        assert_eq!(
            repo_id_from_url("https://gitlab.com/group/sub/repo").as_deref(),
            Some("sub/repo")
        );
        assert_eq!(repo_id_from_url("repo"), None);
    }

    #[test]
    fn truncate_diff_is_char_safe() {
        assert_eq!(truncate_diff("short", 100), "short");

        let diff = "é\n".repeat(10);
        let out = truncate_diff(&diff, 4);
        assert!(out.starts_with("é\né\n"));
        assert!(out.ends_with("[diff truncated, 8 more lines]"));
    }
}
