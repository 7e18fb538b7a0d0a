use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::extract::extract;
use super::provider::ProviderConfig;
use super::{FeedbackEngine, prompt_builder};
use crate::context::CommitContext;
use crate::error::{FeedbackError, ProviderFailure};
use crate::personality::Personality;
use crate::render::{self, PromptPair};

pub const SUMMARY_MAX_TOKENS: u32 = 800;
pub const SUGGESTION_MAX_TOKENS: u32 = 100;
pub const SUGGESTION_TEMPERATURE: f32 = 0.3;

/// Minimal request/response structs for the OpenAI Chat Completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    n: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// Providers may send only some of these.
#[derive(Default, Deserialize)]
#[serde(default)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Engine that talks to any OpenAI-compatible chat-completions endpoint.
pub struct UnifiedEngine {
    client: Client,
    provider: &'static ProviderConfig,
    api_key: String,
    model: String,
    api_base_url: String,
    personality: Personality,
}

impl UnifiedEngine {
    pub fn new(
        provider: &'static ProviderConfig,
        api_key: String,
        model: String,
        api_base_url: Option<String>,
        personality: Personality,
        timeout: Duration,
    ) -> Result<Self, FeedbackError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FeedbackError::HttpClient)?;

        let api_base_url = api_base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| provider.base_url.to_string());

        Ok(UnifiedEngine {
            client,
            provider,
            api_key,
            model,
            api_base_url: api_base_url.trim().trim_end_matches('/').to_string(),
            personality,
        })
    }

    pub fn provider(&self) -> &'static ProviderConfig {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.api_base_url)
    }

    fn provider_error(&self, source: ProviderFailure) -> FeedbackError {
        FeedbackError::Provider {
            provider: self.provider.display_name.to_string(),
            source,
        }
    }

    fn call_chat(
        &self,
        prompts: PromptPair,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, FeedbackError> {
        log::debug!("System prompt:\n{}", truncate(&prompts.system, 2000));
        log::debug!("User prompt:\n{}", truncate(&prompts.user, 3000));

        let req = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts.system,
                },
                ChatMessage {
                    role: "user",
                    content: prompts.user,
                },
            ],
            temperature,
            max_tokens,
            n: 1,
        };

        log::info!(
            "Calling {} model {:?}",
            self.provider.display_name,
            &self.model
        );

        let resp = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .map_err(|e| self.provider_error(ProviderFailure::Transport(e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(self.provider_error(ProviderFailure::Status {
                status: status.as_u16(),
                body: text,
            }));
        }

        let chat_resp: ChatResponse = resp
            .json()
            .map_err(|e| self.provider_error(ProviderFailure::Decode(e)))?;

        if let Some(usage) = &chat_resp.usage {
            log::debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        let content = chat_resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| self.provider_error(ProviderFailure::EmptyChoices))?;

        log::trace!("Raw response: {content}");

        Ok(content.trim().to_string())
    }
}

impl FeedbackEngine for UnifiedEngine {
    fn generate_feedback(&self, ctx: &CommitContext) -> Result<String, FeedbackError> {
        let prompts = render::render(&self.personality, ctx)?;
        self.call_chat(
            prompts,
            self.personality.temperature,
            self.personality.max_tokens,
        )
    }

    fn generate_summary_feedback(&self, ctx: &CommitContext) -> Result<String, FeedbackError> {
        let prompts = prompt_builder::summary_prompt(&self.personality, ctx);
        log::debug!("Summary mode: {}", ctx.resolved_summary_mode().as_str());
        self.call_chat(prompts, self.personality.temperature, SUMMARY_MAX_TOKENS)
    }

    fn generate_commit_suggestion(&self, ctx: &CommitContext) -> Result<String, FeedbackError> {
        let prompts = prompt_builder::commit_suggestion_prompt(ctx);
        let raw = self.call_chat(prompts, SUGGESTION_TEMPERATURE, SUGGESTION_MAX_TOKENS)?;
        Ok(extract(&raw))
    }

    fn name(&self) -> &str {
        self.provider.display_name
    }
}

/// Truncate long strings for debug logging.
fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!(
            "{}...\n[truncated {} chars]",
            &s[..idx],
            s[idx..].chars().count()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn truncate_cuts_on_char_boundary() {
        let out = truncate("ééééé", 2);
        assert!(out.starts_with("éé..."));
        assert!(out.ends_with("[truncated 3 chars]"));
    }
}
