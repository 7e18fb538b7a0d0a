use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cli_args::Cli;
use crate::llm::EngineOptions;
use crate::llm::provider;

pub const DEFAULT_DIFF_LIMIT: usize = 8000;
pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Final resolved configuration for commitmuse.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: String,
    pub model: String,
    /// Empty when no key was found; the local engine is used then.
    pub api_key: String,
    pub personality: String,
    pub personality_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub diff_limit: usize,
    pub history_limit: usize,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--provider`, `--model`, ...)
    ///   2. Env vars (`COMMITMUSE_PROVIDER`, `COMMITMUSE_MODEL`, the provider's key variable, ...)
    ///   3. TOML `~/.config/commitmuse/config.toml`
    ///   4. Hardcoded defaults
    pub fn from_sources(cli: &Cli) -> Self {
        let file_cfg = config_path()
            .and_then(|p| load_file_config(&p))
            .unwrap_or_default();
        let default_personalities = personalities_path().filter(|p| p.exists());

        Self::from_parts(cli, |key| env::var(key).ok(), file_cfg, default_personalities)
    }

    fn from_parts(
        cli: &Cli,
        env_var: impl Fn(&str) -> Option<String>,
        file_cfg: FileConfig,
        default_personalities: Option<PathBuf>,
    ) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let provider_name = non_empty(cli.provider.clone())
            .or_else(|| non_empty(env_var("COMMITMUSE_PROVIDER")))
            .or(non_empty(file_cfg.provider))
            .unwrap_or_else(|| provider::DEFAULT_PROVIDER.to_string());

        let model = non_empty(cli.model.clone())
            .or_else(|| non_empty(env_var("COMMITMUSE_MODEL")))
            .or(non_empty(file_cfg.model))
            .unwrap_or_default();

        let no_model = cli.no_model || model.eq_ignore_ascii_case("none");

        // Unknown names fall back to the default provider here, so its key is used.
        let selected = provider::resolve(&provider_name).config;
        let api_key = if no_model {
            String::new()
        } else {
            non_empty(cli.api_key.clone())
                .or_else(|| non_empty(env_var(selected.api_key_env)))
                .or(non_empty(file_cfg.api_key))
                .unwrap_or_default()
        };

        let personality = non_empty(cli.personality.clone())
            .or_else(|| non_empty(env_var("COMMITMUSE_PERSONALITY")))
            .or(non_empty(file_cfg.personality))
            .unwrap_or_default();

        let personality_file = cli
            .personality_file
            .clone()
            .or_else(|| non_empty(env_var("COMMITMUSE_PERSONALITIES")).map(PathBuf::from))
            .or(file_cfg.personality_file)
            .or(default_personalities);

        let base_url = non_empty(env_var("COMMITMUSE_BASE_URL")).or(non_empty(file_cfg.base_url));

        Config {
            provider: selected.id.to_string(),
            model: if no_model { String::new() } else { model },
            api_key,
            personality,
            personality_file,
            base_url,
            timeout: Duration::from_secs(
                file_cfg
                    .timeout_secs
                    .filter(|s| *s > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            diff_limit: file_cfg.diff_limit.unwrap_or(DEFAULT_DIFF_LIMIT),
            history_limit: file_cfg.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            provider: self.provider.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            personality: self.personality.clone(),
            personality_path: self.personality_file.clone(),
            base_url: self.base_url.clone(),
            timeout: self.timeout,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    provider: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    personality: Option<String>,
    personality_file: Option<PathBuf>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    diff_limit: Option<usize>,
    history_limit: Option<usize>,
}

fn config_dir() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("commitmuse"))
}

/// Return `~/.config/commitmuse/config.toml`
fn config_path() -> Option<PathBuf> {
    Some(config_dir()?.join("config.toml"))
}

/// Return `~/.config/commitmuse/personalities.toml`
fn personalities_path() -> Option<PathBuf> {
    Some(config_dir()?.join("personalities.toml"))
}

fn load_file_config(path: &Path) -> Option<FileConfig> {
    if !path.exists() {
        return None;
    }

    let data = fs::read_to_string(path)
        .map_err(|e| log::warn!("Could not read {}: {e}", path.display()))
        .ok()?;
    toml::from_str::<FileConfig>(&data)
        .map_err(|e| log::warn!("Ignoring malformed config {}: {e}", path.display()))
        .ok()
}
