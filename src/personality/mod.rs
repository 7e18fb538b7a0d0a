//! Named prompt personalities: built-ins plus an optional TOML override file.

mod defaults;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::PersonalityError;

pub use defaults::DEFAULT_PERSONALITY;

pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A bundle of prompt templates plus generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Personality {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub system_prompt: String,
    pub user_prompt_format: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Personality {
    fn validate(&self) -> Result<(), PersonalityError> {
        let invalid = |reason: String| PersonalityError::Invalid {
            name: self.name.clone(),
            reason,
        };

        if self.max_tokens == 0 {
            return Err(invalid("max_tokens must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(invalid(format!(
                "temperature {} is outside [0, 1]",
                self.temperature
            )));
        }
        if self.user_prompt_format.trim().is_empty() {
            return Err(invalid("user_prompt_format is empty".into()));
        }
        Ok(())
    }
}

/// Personalities by name plus the entry used for empty or unknown names.
#[derive(Debug, Clone)]
pub struct PersonalityRegistry {
    default: Personality,
    entries: BTreeMap<String, Personality>,
}

impl PersonalityRegistry {
    /// A fresh copy of the personalities shipped with the binary.
    pub fn builtin() -> Self {
        let entries: BTreeMap<String, Personality> = defaults::builtin_personalities()
            .into_iter()
            .map(|p| {
                let personality = Personality {
                    name: p.name.to_string(),
                    display_name: p.display_name.to_string(),
                    description: p.description.to_string(),
                    system_prompt: p.system_prompt.to_string(),
                    user_prompt_format: p.user_prompt_format.to_string(),
                    max_tokens: p.max_tokens,
                    temperature: p.temperature,
                };
                (personality.name.clone(), personality)
            })
            .collect();

        let default = entries
            .get(DEFAULT_PERSONALITY)
            .cloned()
            .unwrap_or_else(fallback_personality);

        PersonalityRegistry { default, entries }
    }

    /// Exact match, or the default for empty and unknown names.
    pub fn get(&self, name: &str) -> &Personality {
        let name = name.trim();
        if name.is_empty() {
            return &self.default;
        }
        match self.entries.get(name) {
            Some(p) => p,
            None => {
                log::warn!(
                    "Unknown personality {name:?}, using {:?}",
                    self.default.name
                );
                &self.default
            }
        }
    }

    pub fn default_personality(&self) -> &Personality {
        &self.default
    }

    pub fn default_name(&self) -> &str {
        &self.default.name
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Personalities in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Personality> {
        self.entries.values()
    }
}

/// Load personalities, degrading to the built-ins on any problem.
pub fn load(path: Option<&Path>) -> PersonalityRegistry {
    let Some(path) = path else {
        return PersonalityRegistry::builtin();
    };

    match try_load(path) {
        Ok(registry) => {
            log::debug!(
                "Loaded {} personalities from {}",
                registry.len(),
                path.display()
            );
            registry
        }
        Err(e) => {
            log::warn!("{e}; using built-in personalities");
            PersonalityRegistry::builtin()
        }
    }
}

/// Load and validate a personality file, merging it over the built-ins.
pub fn try_load(path: &Path) -> Result<PersonalityRegistry, PersonalityError> {
    let data = fs::read_to_string(path).map_err(|source| PersonalityError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&data, path)
}

fn parse(data: &str, path: &Path) -> Result<PersonalityRegistry, PersonalityError> {
    let file: PersonalityFile = toml::from_str(data).map_err(|source| PersonalityError::Parse {
        path: PathBuf::from(path),
        source: Box::new(source),
    })?;

    let mut registry = PersonalityRegistry::builtin();

    for (key, entry) in file.personalities {
        let personality = entry.into_personality(key);
        personality.validate()?;
        registry
            .entries
            .insert(personality.name.clone(), personality);
    }

    let default_name = file
        .default
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| registry.default.name.clone());

    match registry.entries.get(&default_name) {
        Some(p) => registry.default = p.clone(),
        None => log::warn!(
            "Default personality {default_name:?} in {} does not exist, keeping {:?}",
            path.display(),
            registry.default.name
        ),
    }

    Ok(registry)
}

#[derive(Debug, Deserialize)]
struct PersonalityFile {
    default: Option<String>,
    #[serde(default)]
    personalities: BTreeMap<String, PersonalityEntry>,
}

#[derive(Debug, Deserialize)]
struct PersonalityEntry {
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    system_prompt: String,
    user_prompt_format: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl PersonalityEntry {
    fn into_personality(self, key: String) -> Personality {
        Personality {
            display_name: self
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| key.clone()),
            name: key,
            description: self.description,
            system_prompt: self.system_prompt,
            user_prompt_format: self.user_prompt_format,
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        }
    }
}

/// Used only if the built-in table were ever missing its default entry.
fn fallback_personality() -> Personality {
    Personality {
        name: DEFAULT_PERSONALITY.to_string(),
        display_name: "Default".to_string(),
        description: "Plain one-line feedback".to_string(),
        system_prompt: "Reply with exactly one short sentence about the commit.".to_string(),
        user_prompt_format: "Commit message: {{Message}}".to_string(),
        max_tokens: DEFAULT_MAX_TOKENS,
        temperature: DEFAULT_TEMPERATURE,
    }
}
