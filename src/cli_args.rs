use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser, Subcommand};

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "commitmuse",
    version,
    about = "LLM-assisted commit messages and commentary for Git"
)]
#[command(group(
    ArgGroup::new("model_group")
        .args(["model", "no_model"])
        .multiple(false)
))]
pub struct Cli {
    /// Provider to use: openai, openrouter or gemini
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Model name (defaults per provider). If 'none', acts like --no-model.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Disable model calls; use offline responses instead
    #[arg(long, global = true)]
    pub no_model: bool,

    /// API key (otherwise read from the provider's key variable or the config file)
    #[arg(long, env = "COMMITMUSE_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Personality used for commentary
    #[arg(long, global = true)]
    pub personality: Option<String>,

    /// TOML file with custom personalities
    #[arg(long, global = true)]
    pub personality_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands, e.g. `commitmuse suggest --apply`
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Suggest a conventional commit message for the staged changes
    Suggest {
        /// Write the suggestion into .git/COMMIT_EDITMSG (no commit is created)
        #[arg(long)]
        apply: bool,
    },

    /// Comment on the most recent commit
    Feedback,

    /// Summarize your commits from the last week
    Summary,

    /// Analyze the code-quality patterns of the latest commits
    Analyze {
        /// Number of commits to analyze
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
    },

    /// List available personalities
    Personalities,

    /// List known providers
    Providers,
}
