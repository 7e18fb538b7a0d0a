//! Error types for the feedback engine using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by feedback engines and the prompt renderer.
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// A personality template could not be rendered. Callers recover by
    /// switching to the local engine.
    #[error("failed to render template for personality '{personality}': {source}")]
    TemplateRender {
        personality: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("{provider} API error: {source}")]
    Provider {
        provider: String,
        #[source]
        source: ProviderFailure,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl FeedbackError {
    /// Display name of the provider that failed, if this is a provider error.
    pub fn provider(&self) -> Option<&str> {
        match self {
            FeedbackError::Provider { provider, .. } => Some(provider),
            _ => None,
        }
    }
}

/// What went wrong while talking to a provider.
#[derive(Error, Debug)]
pub enum ProviderFailure {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status} - {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("no choices returned")]
    EmptyChoices,
}

/// Errors from loading a personality file. `personality::load` recovers from
/// all of these by falling back to the built-in set.
#[derive(Error, Debug)]
pub enum PersonalityError {
    #[error("failed to read personality file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse personality file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("invalid personality '{name}': {reason}")]
    Invalid { name: String, reason: String },
}
