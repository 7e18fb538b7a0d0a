//! Turns a free-form model reply into a single commit-message line.
//!
//! Models wrap answers in quotes, code fences, or chatty preambles. The
//! passes below peel those layers off in a fixed order:
//! 1. trim whitespace
//! 2. strip one pair of wrapping quotes
//! 3. take the body of the first fenced code block
//! 4. pick the first conventional-commit line
//! 5. else the first plausible line
//! 6. else the first line, truncated
//!
//! The whole pipeline repeats until the text stops changing. Every pass
//! returns a substring of its input, so a changed result is strictly shorter
//! and the loop terminates; the fixed point makes [`extract`] idempotent.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Lines at or above this many characters are not treated as messages.
pub const MAX_LINE_CHARS: usize = 100;

/// Length of the last-resort truncated line.
pub const TRUNCATE_CHARS: usize = 72;

pub const CONVENTIONAL_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

static CONVENTIONAL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^(?:{})(?:\([^()\s][^()]*\))?!?: \S",
        CONVENTIONAL_TYPES.join("|")
    );
    Regex::new(&pattern).expect("Invalid regex")
});

/// Clean up a raw model response. Total: never panics, empty in, empty out.
pub fn extract(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = extract_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn extract_once(raw: &str) -> String {
    let text = raw.trim();
    let text = strip_wrapping_quotes(text);
    let text = unwrap_fence(text);
    let text = text.trim();

    if text.is_empty() {
        return String::new();
    }

    if let Some(line) = first_conventional_line(text) {
        return line.to_string();
    }
    if let Some(line) = first_reasonable_line(text) {
        return line.to_string();
    }
    truncate_first_line(text, TRUNCATE_CHARS)
}

/// Strip one pair of straight quotes wrapping the whole text.
pub fn strip_wrapping_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Body of the first ```` ``` ```` fence pair, without its info string.
/// Text without a complete fence pair is returned unchanged.
pub fn unwrap_fence(text: &str) -> &str {
    const FENCE: &str = "```";

    let Some(open) = text.find(FENCE) else {
        return text;
    };
    let after_open = &text[open + FENCE.len()..];
    let Some(close) = after_open.find(FENCE) else {
        return text;
    };
    let inner = &after_open[..close];

    // ```text\nbody``` - the first line is an info string only when a
    // newline follows it.
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim().contains(' ') => body,
        _ => inner,
    }
}

/// First line shaped like `type(scope)!: description`.
pub fn first_conventional_line(text: &str) -> Option<&str> {
    text.lines()
        .map(str::trim)
        .find(|line| is_short(line) && CONVENTIONAL_LINE.is_match(line))
}

/// First non-empty line that is not a comment or fence and is short enough.
pub fn first_reasonable_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| {
        !line.is_empty()
            && !line.starts_with('#')
            && !line.starts_with("//")
            && !line.starts_with("```")
            && is_short(line)
    })
}

/// First line cut to at most `max_chars` characters.
pub fn truncate_first_line(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    match line.char_indices().nth(max_chars) {
        Some((idx, _)) => line[..idx].trim_end().to_string(),
        None => line.to_string(),
    }
}

fn is_short(line: &str) -> bool {
    line.chars().count() < MAX_LINE_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(extract(""), "");
        assert_eq!(extract("   \n\t "), "");
    }

    #[test]
    fn fenced_block_is_unwrapped() {
        assert_eq!(
            extract("```\nfix: correct off-by-one\n```"),
            "fix: correct off-by-one"
        );
    }

    #[test]
    fn fence_info_string_is_dropped() {
        assert_eq!(extract("```text\nfeat: add login\n```"), "feat: add login");
    }

    #[test]
    fn quoted_message_is_unquoted() {
        assert_eq!(
            extract("\"feat(auth): add password reset\""),
            "feat(auth): add password reset"
        );
        assert_eq!(extract("'docs: fix typo'"), "docs: fix typo");
    }

    #[test]
    fn conventional_line_is_found_after_preamble() {
        let raw = "Sure! Here is a commit message for your change:\n\nrefactor(core): split parser into passes\n\nThis makes it easier to test.";
        assert_eq!(extract(raw), "refactor(core): split parser into passes");
    }

    #[test]
    fn breaking_change_marker_is_conventional() {
        assert_eq!(
            extract("Here you go\nfeat(api)!: drop v1 endpoints"),
            "feat(api)!: drop v1 endpoints"
        );
    }

    #[test]
    fn unknown_types_are_not_conventional() {
        assert_eq!(first_conventional_line("wip: stuff\nfix: real"), Some("fix: real"));
        assert_eq!(first_conventional_line("feature: nope"), None);
    }

    #[test]
    fn overlong_conventional_line_is_skipped() {
        let long = format!("feat: {}", "x".repeat(120));
        let raw = format!("{long}\nfix: short one");
        assert_eq!(extract(&raw), "fix: short one");
    }

    #[test]
    fn falls_back_to_first_reasonable_line() {
        let raw = "# Commit message\n\nUpdate the readme with install steps\nMore detail";
        assert_eq!(extract(raw), "Update the readme with install steps");
    }

    #[test]
    fn falls_back_to_truncated_first_line() {
        let raw = "a".repeat(150);
        let out = extract(&raw);
        assert_eq!(out.chars().count(), TRUNCATE_CHARS);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let raw = "é".repeat(130);
        assert_eq!(truncate_first_line(&raw, 72).chars().count(), 72);
    }

    #[test]
    fn unclosed_fence_is_left_alone() {
        assert_eq!(unwrap_fence("```\nfix: a"), "```\nfix: a");
        assert_eq!(extract("```\nfix: a"), "fix: a");
    }

    #[test]
    fn quotes_inside_fence_are_handled() {
        assert_eq!(extract("```\n\"chore: bump deps\"\n```"), "chore: bump deps");
    }

    #[test]
    fn single_quote_character_is_not_stripped_to_nothing() {
        assert_eq!(strip_wrapping_quotes("\""), "\"");
        assert_eq!(extract("\""), "\"");
    }

    #[test]
    fn extract_is_idempotent() {
        let long = "word ".repeat(40);
        let inputs: [&str; 12] = [
            "",
            "fix: a",
            "\"\"feat: nested quotes\"\"",
            "```\n```",
            "```rust\nfn main() {}\n```",
            "# only a comment",
            "   \"  padded \"  ",
            "\"'mixed'\"",
            "Line one\nline two",
            "```\n\"'```'\"\n```",
            long.as_str(),
            "// comment\n```\ntest: cover edge\n```",
        ];
        for input in inputs {
            let once = extract(input);
            assert_eq!(extract(&once), once, "not idempotent for {input:?}");
        }
    }
}
