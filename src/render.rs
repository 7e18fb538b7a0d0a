//! Renders personality templates against a commit context.

use std::collections::BTreeMap;

use handlebars::{Handlebars, no_escape};
use serde::Serialize;
use serde_json::Value;

use crate::context::CommitContext;
use crate::error::FeedbackError;
use crate::personality::Personality;

/// System and user prompt for one chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Variables visible to personality templates.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TemplateData<'a> {
    message: &'a str,
    time_of_day: &'static str,
    diff: Option<&'a str>,
    username: &'a str,
    repo_name: &'a str,
    commit_history: &'a [String],
    commit_stats: &'a BTreeMap<String, Value>,
}

impl<'a> TemplateData<'a> {
    fn from_context(ctx: &'a CommitContext) -> Self {
        TemplateData {
            message: ctx.message.trim(),
            time_of_day: ctx.time_of_day().as_str(),
            diff: ctx.diff.as_deref(),
            username: &ctx.username,
            repo_name: &ctx.repo_name,
            commit_history: &ctx.commit_history,
            commit_stats: &ctx.commit_stats,
        }
    }
}

/// Missing variables render as empty strings and nothing is HTML-escaped.
fn create_handlebars() -> Handlebars<'static> {
    let mut hb = Handlebars::new();
    hb.set_strict_mode(false);
    hb.register_escape_fn(no_escape);
    hb
}

/// Render both templates of `personality` for `ctx`.
pub fn render(personality: &Personality, ctx: &CommitContext) -> Result<PromptPair, FeedbackError> {
    let hb = create_handlebars();
    let data = TemplateData::from_context(ctx);

    let render_one = |template: &str| {
        hb.render_template(template, &data)
            .map_err(|e| FeedbackError::TemplateRender {
                personality: personality.name.clone(),
                source: Box::new(e),
            })
    };

    let system = render_one(&personality.system_prompt)?;
    let user = render_one(&personality.user_prompt_format)?;

    Ok(PromptPair {
        system: system.trim().to_string(),
        user: user.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::personality::PersonalityRegistry;

    fn personality_with(user_prompt_format: &str) -> Personality {
        Personality {
            name: "test".into(),
            display_name: "Test".into(),
            description: String::new(),
            system_prompt: "Be brief, {{Username}}.".into(),
            user_prompt_format: user_prompt_format.into(),
            max_tokens: 50,
            temperature: 0.5,
        }
    }

    #[test]
    fn every_builtin_renders_an_empty_context() {
        let ctx = CommitContext::new("");
        for p in PersonalityRegistry::builtin().iter() {
            let prompts = render(p, &ctx).unwrap();
            assert!(!prompts.user.is_empty(), "{} rendered an empty user prompt", p.name);
            assert!(!prompts.system.is_empty());
        }
    }

    #[test]
    fn variables_are_substituted() {
        let ts = Local.with_ymd_and_hms(2024, 3, 4, 9, 30, 0).earliest().unwrap();
        let ctx = CommitContext::new("fix: typo")
            .with_timestamp(ts)
            .with_username("ada")
            .with_repo_name("engine");
        let p = personality_with("{{Username}}|{{RepoName}}|{{TimeOfDay}}|{{Message}}");

        let prompts = render(&p, &ctx).unwrap();
        assert_eq!(prompts.user, "ada|engine|morning|fix: typo");
        assert_eq!(prompts.system, "Be brief, ada.");
    }

    #[test]
    fn conditional_blocks_skip_empty_fields() {
        let p = personality_with(
            "start{{#if Diff}} diff={{Diff}}{{/if}}{{#if CommitHistory}} history{{/if}}{{#if CommitStats}} stats{{/if}}",
        );

        let empty = render(&p, &CommitContext::new("")).unwrap();
        assert_eq!(empty.user, "start");

        let full = CommitContext::new("")
            .with_diff("+a")
            .with_history(vec!["fix: a".into()])
            .with_stat("total_commits", 3);
        assert_eq!(render(&p, &full).unwrap().user, "start diff=+a history stats");
    }

    #[test]
    fn history_and_stats_iterate() {
        let p = personality_with(
            "{{#each CommitHistory}}[{{this}}]{{/each}}{{#each CommitStats}}<{{@key}}={{this}}>{{/each}}",
        );
        let ctx = CommitContext::new("")
            .with_history(vec!["fix: a".into(), "feat: b".into()])
            .with_stat("deletions", 2)
            .with_stat("insertions", 10);

        assert_eq!(
            render(&p, &ctx).unwrap().user,
            "[fix: a][feat: b]<deletions=2><insertions=10>"
        );
    }

    #[test]
    fn missing_variables_render_empty() {
        let p = personality_with("a{{Nope}}b");
        assert_eq!(render(&p, &CommitContext::new("")).unwrap().user, "ab");
    }

    #[test]
    fn html_is_not_escaped() {
        let p = personality_with("{{Diff}}");
        let ctx = CommitContext::new("").with_diff("if a < b && c > d {}");
        assert_eq!(render(&p, &ctx).unwrap().user, "if a < b && c > d {}");
    }

    #[test]
    fn malformed_template_is_a_render_error() {
        let p = personality_with("{{#if Diff}}unclosed");
        let err = render(&p, &CommitContext::new("")).unwrap_err();
        assert!(matches!(
            err,
            FeedbackError::TemplateRender { ref personality, .. } if personality == "test"
        ));
    }
}
