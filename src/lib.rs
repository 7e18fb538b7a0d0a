//! Generated commit-message suggestions, commit commentary and multi-commit
//! summaries for Git, backed by OpenAI-compatible providers with an offline
//! fallback.

pub mod cli_args;
pub mod config;
pub mod context;
pub mod error;
pub mod git;
pub mod llm;
pub mod logging;
pub mod personality;
pub mod render;

pub use context::{CommitContext, SummaryMode, TimeOfDay};
pub use error::{FeedbackError, PersonalityError, ProviderFailure};
pub use llm::{EngineOptions, FeedbackEngine, LocalEngine, UnifiedEngine, new_engine};
pub use personality::{Personality, PersonalityRegistry};
