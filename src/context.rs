//! The repository snapshot handed to feedback engines.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Local, Timelike};
use serde_json::Value;

/// Marker that selects on-demand analysis when a context has no explicit
/// [`SummaryMode`].
pub const ON_DEMAND_MARKER: &str = "[on-demand]";

pub const DEFAULT_USERNAME: &str = "User";
pub const DEFAULT_REPO_NAME: &str = "repository";

/// Which flavour of multi-commit summary to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    /// Time distribution and workflow habits across the last week.
    Weekly,
    /// Code-quality patterns in a specific set of commits.
    OnDemand,
}

impl SummaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryMode::Weekly => "weekly",
            SummaryMode::OnDemand => "on-demand",
        }
    }
}

/// Coarse bucket of the hour a commit was made in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// [5,12) morning, [12,17) afternoon, [17,21) evening, otherwise night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of repository state assembled by the caller.
///
/// Every optional part may be empty; engines and templates must cope.
#[derive(Debug, Clone)]
pub struct CommitContext {
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub diff: Option<String>,
    /// Prior commit messages in whatever order the caller chose.
    pub commit_history: Vec<String>,
    pub commit_stats: BTreeMap<String, Value>,
    pub username: String,
    pub repo_name: String,
    pub summary_mode: Option<SummaryMode>,
}

impl CommitContext {
    pub fn new(message: impl Into<String>) -> Self {
        CommitContext {
            message: message.into(),
            timestamp: Local::now(),
            diff: None,
            commit_history: Vec::new(),
            commit_stats: BTreeMap::new(),
            username: DEFAULT_USERNAME.to_string(),
            repo_name: DEFAULT_REPO_NAME.to_string(),
            summary_mode: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach a diff. Blank diffs are stored as `None`.
    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        let diff = diff.into();
        self.diff = if diff.trim().is_empty() { None } else { Some(diff) };
        self
    }

    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.commit_history = history;
        self
    }

    pub fn with_stat(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.commit_stats.insert(key.into(), value.into());
        self
    }

    pub fn with_stats(mut self, stats: BTreeMap<String, Value>) -> Self {
        self.commit_stats.extend(stats);
        self
    }

    /// Set the author name; blank names keep the default.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        let username = username.into();
        if !username.trim().is_empty() {
            self.username = username.trim().to_string();
        }
        self
    }

    /// Set the repository name; blank names keep the default.
    pub fn with_repo_name(mut self, repo_name: impl Into<String>) -> Self {
        let repo_name = repo_name.into();
        if !repo_name.trim().is_empty() {
            self.repo_name = repo_name.trim().to_string();
        }
        self
    }

    pub fn with_summary_mode(mut self, mode: SummaryMode) -> Self {
        self.summary_mode = Some(mode);
        self
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.timestamp.hour())
    }

    /// The explicit mode if set, otherwise sniffed from the message marker.
    pub fn resolved_summary_mode(&self) -> SummaryMode {
        match self.summary_mode {
            Some(mode) => mode,
            None if self.message.contains(ON_DEMAND_MARKER) => SummaryMode::OnDemand,
            None => SummaryMode::Weekly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_buckets() {
        assert_eq!(TimeOfDay::from_hour(6), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(13), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(19), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(2), TimeOfDay::Night);
    }

    #[test]
    fn time_of_day_boundaries_are_inclusive_lower() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Night);
    }

    #[test]
    fn blank_diff_is_none() {
        let ctx = CommitContext::new("msg").with_diff("   \n");
        assert!(ctx.diff.is_none());
    }

    #[test]
    fn blank_names_keep_defaults() {
        let ctx = CommitContext::new("").with_username("  ").with_repo_name("");
        assert_eq!(ctx.username, DEFAULT_USERNAME);
        assert_eq!(ctx.repo_name, DEFAULT_REPO_NAME);
    }

    #[test]
    fn explicit_summary_mode_wins_over_marker() {
        let ctx = CommitContext::new(format!("{ON_DEMAND_MARKER} last 5"))
            .with_summary_mode(SummaryMode::Weekly);
        assert_eq!(ctx.resolved_summary_mode(), SummaryMode::Weekly);
    }

    #[test]
    fn marker_selects_on_demand_without_explicit_mode() {
        let marked = CommitContext::new(format!("{ON_DEMAND_MARKER} last 5"));
        assert_eq!(marked.resolved_summary_mode(), SummaryMode::OnDemand);
        assert_eq!(CommitContext::new("").resolved_summary_mode(), SummaryMode::Weekly);
    }
}
