pub mod extract;
pub mod local;
mod prompt_builder;
mod prompts;
pub mod provider;
pub mod unified;

use std::path::PathBuf;
use std::time::Duration;

use crate::context::CommitContext;
use crate::error::FeedbackError;
use crate::personality;

pub use local::LocalEngine;
pub use unified::UnifiedEngine;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can turn a commit context into text.
pub trait FeedbackEngine: Send + Sync {
    /// One-line commentary on a commit, in the personality's voice.
    fn generate_feedback(&self, ctx: &CommitContext) -> Result<String, FeedbackError>;

    /// Longer analysis of several commits: a weekly summary or an on-demand
    /// review, chosen by the context's summary mode.
    fn generate_summary_feedback(&self, ctx: &CommitContext) -> Result<String, FeedbackError>;

    /// A single conventional-commit line for the context's diff.
    fn generate_commit_suggestion(&self, ctx: &CommitContext) -> Result<String, FeedbackError>;

    /// Display name of the backend.
    fn name(&self) -> &str;

    fn is_local(&self) -> bool {
        false
    }
}

/// Inputs for [`new_engine`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub provider: String,
    pub model: String,
    /// Empty means no credentials: the local engine is used.
    pub api_key: String,
    pub personality: String,
    pub personality_path: Option<PathBuf>,
    /// Replaces the provider's base URL, e.g. for a proxy.
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            provider: provider::DEFAULT_PROVIDER.to_string(),
            model: String::new(),
            api_key: String::new(),
            personality: String::new(),
            personality_path: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Build the engine for these options.
///
/// Without an API key this is always the [`LocalEngine`]; nothing else is
/// looked at and no network call can happen.
pub fn new_engine(opts: &EngineOptions) -> Result<Box<dyn FeedbackEngine>, FeedbackError> {
    if opts.api_key.trim().is_empty() {
        log::debug!("No API key configured, using local feedback");
        return Ok(Box::new(LocalEngine::new()));
    }

    let resolution = provider::resolve(&opts.provider);
    let model = provider::resolve_model(resolution.config, &opts.model);

    let registry = personality::load(opts.personality_path.as_deref());
    let personality = registry.get(&opts.personality).clone();

    log::debug!(
        "Using {} with model {model} and personality {}",
        resolution.config.display_name,
        personality.name
    );

    let engine = UnifiedEngine::new(
        resolution.config,
        opts.api_key.trim().to_string(),
        model,
        opts.base_url.clone(),
        personality,
        opts.timeout,
    )?;

    Ok(Box::new(engine))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_always_yields_local() {
        let cases = [
            ("openai", "gpt-4o", ""),
            ("foobar", "", "   "),
            ("", "none", ""),
            ("GEMINI", "?!", "\t"),
        ];
        for (provider, model, key) in cases {
            let opts = EngineOptions {
                provider: provider.into(),
                model: model.into(),
                api_key: key.into(),
                personality: "no-such-personality".into(),
                personality_path: Some(PathBuf::from("/definitely/missing.toml")),
                ..EngineOptions::default()
            };
            let engine = new_engine(&opts).unwrap();
            assert!(engine.is_local());
            assert_eq!(engine.name(), "Local");
        }
    }

    #[test]
    fn api_key_yields_provider_engine() {
        let opts = EngineOptions {
            provider: "openrouter".into(),
            api_key: "sk-test".into(),
            ..EngineOptions::default()
        };
        let engine = new_engine(&opts).unwrap();
        assert!(!engine.is_local());
        assert_eq!(engine.name(), "OpenRouter");
    }

    #[test]
    fn unknown_provider_with_key_uses_default_provider() {
        let opts = EngineOptions {
            provider: "foobar".into(),
            api_key: "sk-test".into(),
            ..EngineOptions::default()
        };
        let engine = new_engine(&opts).unwrap();
        assert_eq!(engine.name(), provider::default_provider().display_name);
    }

    #[test]
    fn default_timeout_suits_a_commit_hook() {
        assert_eq!(EngineOptions::default().timeout, Duration::from_secs(10));
    }

    #[test]
    fn engines_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn FeedbackEngine>();
        assert_send_sync::<UnifiedEngine>();
        assert_send_sync::<LocalEngine>();
    }
}
