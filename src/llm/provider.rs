//! Compiled-in table of OpenAI-compatible providers.

/// Static description of one chat-completions provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderConfig {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Base URL including the API version; `/chat/completions` is appended.
    pub base_url: &'static str,
    pub default_model: &'static str,
    /// Environment variable holding this provider's API key.
    pub api_key_env: &'static str,
    pub experimental: bool,
}

pub const DEFAULT_PROVIDER: &str = "openai";

pub const PROVIDERS: &[ProviderConfig] = &[
    ProviderConfig {
        id: "openai",
        display_name: "OpenAI",
        base_url: "https://api.openai.com/v1",
        default_model: "gpt-4o-mini",
        api_key_env: "OPENAI_API_KEY",
        experimental: false,
    },
    ProviderConfig {
        id: "openrouter",
        display_name: "OpenRouter",
        base_url: "https://openrouter.ai/api/v1",
        default_model: "openai/gpt-4o-mini",
        api_key_env: "OPENROUTER_API_KEY",
        experimental: false,
    },
    ProviderConfig {
        id: "gemini",
        display_name: "Google Gemini",
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
        default_model: "gemini-2.0-flash",
        api_key_env: "GEMINI_API_KEY",
        experimental: true,
    },
];

/// Outcome of looking up a provider by name.
#[derive(Debug, Clone)]
pub struct ProviderResolution {
    pub config: &'static ProviderConfig,
    /// The name as given by the caller.
    pub requested: String,
    /// True when `requested` was not a known provider and was replaced.
    pub normalized: bool,
}

pub fn default_provider() -> &'static ProviderConfig {
    find(DEFAULT_PROVIDER).unwrap_or(&PROVIDERS[0])
}

/// Case-insensitive lookup by id.
pub fn find(name: &str) -> Option<&'static ProviderConfig> {
    let name = name.trim();
    PROVIDERS.iter().find(|p| p.id.eq_ignore_ascii_case(name))
}

/// Resolve a provider name, normalizing unknown names to the default with a
/// warning. An empty name quietly selects the default.
pub fn resolve(name: &str) -> ProviderResolution {
    let requested = name.trim().to_string();

    if requested.is_empty() {
        return ProviderResolution {
            config: default_provider(),
            requested,
            normalized: false,
        };
    }

    match find(&requested) {
        Some(config) => {
            if config.experimental {
                log::warn!("Provider {} is experimental", config.display_name);
            }
            ProviderResolution {
                config,
                requested,
                normalized: false,
            }
        }
        None => {
            let config = default_provider();
            log::warn!(
                "Unknown provider {requested:?}, falling back to {}",
                config.display_name
            );
            ProviderResolution {
                config,
                requested,
                normalized: true,
            }
        }
    }
}

/// The model to use: `model` when given, otherwise the provider default.
pub fn resolve_model(config: &ProviderConfig, model: &str) -> String {
    let model = model.trim();
    if model.is_empty() {
        config.default_model.to_string()
    } else {
        model.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_providers_match_case_insensitively() {
        let res = resolve("OpenRouter");
        assert_eq!(res.config.id, "openrouter");
        assert!(!res.normalized);

        assert_eq!(resolve("  GEMINI ").config.id, "gemini");
    }

    #[test]
    fn unknown_provider_normalizes_with_warning_flag() {
        let res = resolve("foobar");
        assert_eq!(res.config.id, DEFAULT_PROVIDER);
        assert!(res.normalized);
        assert_eq!(res.requested, "foobar");
    }

    #[test]
    fn empty_provider_is_default_without_warning() {
        let res = resolve("");
        assert_eq!(res.config.id, DEFAULT_PROVIDER);
        assert!(!res.normalized);
    }

    #[test]
    fn table_has_three_entries_and_one_experimental() {
        assert_eq!(PROVIDERS.len(), 3);
        assert_eq!(PROVIDERS.iter().filter(|p| p.experimental).count(), 1);
    }

    #[test]
    fn empty_model_uses_provider_default() {
        let openai = default_provider();
        assert_eq!(resolve_model(openai, "  "), openai.default_model);
        assert_eq!(resolve_model(openai, "gpt-4o"), "gpt-4o");
    }
}
