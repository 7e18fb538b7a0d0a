use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use commitmuse::cli_args::{Cli, Command};
use commitmuse::config::Config;
use commitmuse::error::FeedbackError;
use commitmuse::llm::provider::{self, PROVIDERS};
use commitmuse::{
    CommitContext, FeedbackEngine, LocalEngine, SummaryMode, git, logging, new_engine, personality,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let cfg = Config::from_sources(&cli);

    match &cli.command {
        Command::Suggest { apply } => run_suggest(&cfg, *apply),
        Command::Feedback => run_feedback(&cfg),
        Command::Summary => run_summary(&cfg),
        Command::Analyze { count } => run_analyze(&cfg, *count),
        Command::Personalities => {
            list_personalities(&cfg);
            Ok(())
        }
        Command::Providers => {
            list_providers(&cfg);
            Ok(())
        }
    }
}

/// Build the engine from config, dropping to offline mode if the HTTP client
/// cannot be created.
fn build_engine(cfg: &Config) -> Box<dyn FeedbackEngine> {
    match new_engine(&cfg.engine_options()) {
        Ok(engine) => engine,
        Err(e) => {
            log::warn!("{e}; using offline responses");
            Box::new(LocalEngine::new())
        }
    }
}

/// Context with the author and repository filled in.
fn base_context(message: impl Into<String>) -> CommitContext {
    CommitContext::new(message)
        .with_username(git::user_name().unwrap_or_default())
        .with_repo_name(git::repo_name().unwrap_or_default())
}

/// Run `op` on `engine`; on error or empty output, run it on the local engine.
fn generate_with_fallback<F>(engine: &dyn FeedbackEngine, what: &str, op: F) -> String
where
    F: Fn(&dyn FeedbackEngine) -> Result<String, FeedbackError>,
{
    let spinner = (!engine.is_local()).then(|| start_spinner(engine.name()));
    let result = op(engine);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(text) if !text.trim().is_empty() => return text,
        Ok(_) => log::warn!("{} returned no usable {what}; using offline response", engine.name()),
        Err(e) => log::warn!("{e}; using offline response"),
    }

    op(&LocalEngine::new()).unwrap_or_default()
}

fn start_spinner(provider: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} {elapsed}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Asking {provider}"));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn print_preview(title: &str, body: &str) {
    let rule = "-".repeat(title.len() + 12);
    println!();
    println!("{}", format!("----- {title} -----").bold());
    println!("{body}");
    println!("{}", rule.bold());
}

fn recent_history(cfg: &Config, skip: usize) -> Vec<String> {
    git::recent_subjects(cfg.history_limit, skip).unwrap_or_else(|e| {
        log::debug!("No commit history available: {e}");
        Vec::new()
    })
}

/// Commit-message suggestion for the staged diff.
fn run_suggest(cfg: &Config, apply: bool) -> Result<()> {
    let diff = git::staged_diff()?;
    if diff.trim().is_empty() {
        println!("No staged changes found.");
        return Ok(());
    }

    log::debug!("Staged files: {:?}", git::staged_files().unwrap_or_default());

    let ctx = base_context("")
        .with_diff(git::truncate_diff(&diff, cfg.diff_limit))
        .with_history(recent_history(cfg, 0));

    let engine = build_engine(cfg);
    let message = generate_with_fallback(engine.as_ref(), "commit message", |e| {
        e.generate_commit_suggestion(&ctx)
    });

    print_preview("Commit Message Preview", &message);

    if apply {
        let path = git::write_commit_editmsg(&message)?;
        println!("Saved to {}", path.display());
    }

    Ok(())
}

/// One-line commentary on HEAD.
fn run_feedback(cfg: &Config) -> Result<()> {
    let head = git::head_commit()?;

    let ctx = base_context(head.message)
        .with_timestamp(head.timestamp)
        .with_diff(git::truncate_diff(&head.diff, cfg.diff_limit))
        .with_history(recent_history(cfg, 1));

    let engine = build_engine(cfg);
    let feedback =
        generate_with_fallback(engine.as_ref(), "feedback", |e| e.generate_feedback(&ctx));

    println!("{} {}", "»".cyan().bold(), feedback);
    Ok(())
}

/// Summary of the last seven days.
fn run_summary(cfg: &Config) -> Result<()> {
    let entries = git::log_since("1.week")?;
    if entries.is_empty() {
        println!("No commits in the last week.");
        return Ok(());
    }

    let ctx = base_context("")
        .with_summary_mode(SummaryMode::Weekly)
        .with_history(entries.iter().map(|e| e.subject.clone()).collect())
        .with_stats(git::log_stats(&entries));

    let engine = build_engine(cfg);
    let summary = generate_with_fallback(engine.as_ref(), "summary", |e| {
        e.generate_summary_feedback(&ctx)
    });

    print_preview("Weekly Summary", &summary);
    Ok(())
}

/// Review of the latest `count` commits.
fn run_analyze(cfg: &Config, count: usize) -> Result<()> {
    let entries = git::log_last(count.max(1))?;
    if entries.is_empty() {
        println!("No commits to analyze.");
        return Ok(());
    }

    let patch = git::recent_patch(entries.len()).unwrap_or_default();
    let ctx = base_context("")
        .with_summary_mode(SummaryMode::OnDemand)
        .with_history(entries.iter().map(|e| e.subject.clone()).collect())
        .with_stats(git::log_stats(&entries))
        .with_diff(git::truncate_diff(&patch, cfg.diff_limit));

    let engine = build_engine(cfg);
    let analysis = generate_with_fallback(engine.as_ref(), "analysis", |e| {
        e.generate_summary_feedback(&ctx)
    });

    print_preview(&format!("Analysis of {} commits", entries.len()), &analysis);
    Ok(())
}

fn list_personalities(cfg: &Config) {
    let registry = personality::load(cfg.personality_file.as_deref());
    for p in registry.iter() {
        let marker = if p.name == registry.default_name() {
            "*".green().bold().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{marker} {:<12} {} - {}",
            p.name.bold(),
            p.display_name,
            p.description
        );
    }
}

fn list_providers(cfg: &Config) {
    let selected = provider::resolve(&cfg.provider).config.id;
    for p in PROVIDERS {
        let marker = if p.id == selected {
            "*".green().bold().to_string()
        } else {
            " ".to_string()
        };
        let experimental = if p.experimental {
            " (experimental)".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "{marker} {:<12} {}{experimental}\n    model: {}  key: ${}  url: {}",
            p.id.bold(),
            p.display_name,
            p.default_model,
            p.api_key_env,
            p.base_url
        );
    }
}
