use crate::context::{CommitContext, SummaryMode};
use crate::llm::prompts;
use crate::personality::Personality;
use crate::render::PromptPair;

pub fn summary_prompt(personality: &Personality, ctx: &CommitContext) -> PromptPair {
    let mode = ctx.resolved_summary_mode();

    let mut system = match mode {
        SummaryMode::Weekly => prompts::WEEKLY_SUMMARY,
        SummaryMode::OnDemand => prompts::ON_DEMAND_ANALYSIS,
    }
    .to_owned();
    if !personality.description.trim().is_empty() {
        system.push_str("\nTone: ");
        system.push_str(personality.description.trim());
    }

    let user = match mode {
        SummaryMode::Weekly => weekly_user_prompt(ctx),
        SummaryMode::OnDemand => on_demand_user_prompt(ctx),
    };

    PromptPair { system, user }
}

fn weekly_user_prompt(ctx: &CommitContext) -> String {
    let mut user = format!(
        "Developer: {name}\nRepository: {repo}\nPeriod: the last 7 days\n\n",
        name = ctx.username,
        repo = ctx.repo_name
    );

    user.push_str("Activity statistics:\n");
    user.push_str(&render_stats(ctx));

    user.push_str("\nCommits by time of day:\n");
    for bucket in ["morning", "afternoon", "evening", "night"] {
        let count = ctx
            .commit_stats
            .get(&format!("{bucket}_commits"))
            .map(|v| v.to_string())
            .unwrap_or_else(|| "0".into());
        user.push_str(&format!("- {bucket}: {count}\n"));
    }

    user.push_str("\nCommit messages this week:\n");
    user.push_str(&render_history(ctx));

    user.push_str(
        "\nSummarize this developer's workflow habits and how their time was distributed.",
    );
    user
}

fn on_demand_user_prompt(ctx: &CommitContext) -> String {
    let mut user = format!(
        "Repository: {repo}\nAuthor: {name}\nCommits under review: {count}\n\n",
        repo = ctx.repo_name,
        name = ctx.username,
        count = ctx.commit_history.len()
    );

    user.push_str("Commit messages (as provided):\n");
    user.push_str(&render_history(ctx));

    user.push_str("\nChange statistics for these commits:\n");
    user.push_str(&render_stats(ctx));

    if let Some(diff) = &ctx.diff {
        user.push_str(&format!("\nCombined diff:\n```diff\n{diff}\n```\n"));
    }

    user.push_str("\nAnalyze the code-quality patterns in this specific set of commits.");
    user
}

pub fn commit_suggestion_prompt(ctx: &CommitContext) -> PromptPair {
    let system = prompts::COMMIT_SUGGESTION.to_owned();

    let mut user = format!("Repository: {repo}\n\n", repo = ctx.repo_name);

    if !ctx.commit_history.is_empty() {
        user.push_str("Recent commits (match their style):\n");
        user.push_str(&render_history(ctx));
        user.push('\n');
    }

    match &ctx.diff {
        Some(diff) => user.push_str(&format!("Staged diff:\n```diff\n{diff}\n```")),
        None => user.push_str("No diff is available; suggest a generic but valid message."),
    }

    if !ctx.message.trim().is_empty() {
        user.push_str(&format!("\n\nDraft message from the author: {}", ctx.message.trim()));
    }

    PromptPair { system, user }
}

fn render_history(ctx: &CommitContext) -> String {
    if ctx.commit_history.is_empty() {
        return "- (none)\n".to_string();
    }
    let mut out = String::new();
    for message in &ctx.commit_history {
        let subject = message.lines().next().unwrap_or("").trim();
        out.push_str(&format!("- {subject}\n"));
    }
    out
}

fn render_stats(ctx: &CommitContext) -> String {
    if ctx.commit_stats.is_empty() {
        return "- (no statistics available)\n".to_string();
    }
    let mut out = String::new();
    for (key, value) in &ctx.commit_stats {
        let value = match value.as_str() {
            Some(s) => s.to_string(),
            None => value.to_string(),
        };
        out.push_str(&format!("- {key}: {value}\n"));
    }
    out
}
