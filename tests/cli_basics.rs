use assert_cmd::{cargo, Command};
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary isolated from the caller's config and keys.
fn isolated(home: &TempDir) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!();
    cmd.env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("COMMITMUSE_API_KEY")
        .env_remove("COMMITMUSE_PROVIDER")
        .env_remove("COMMITMUSE_PERSONALITY")
        .env_remove("COMMITMUSE_PERSONALITIES")
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("GEMINI_API_KEY");
    cmd
}

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Usage"));
}

#[test]
fn prints_version() {
    let mut cmd = cargo::cargo_bin_cmd!();

    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn lists_providers() {
    let home = TempDir::new().unwrap();

    isolated(&home)
        .arg("providers")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("openai")
                .and(predicate::str::contains("openrouter"))
                .and(predicate::str::contains("gemini"))
                .and(predicate::str::contains("(experimental)")),
        );
}

#[test]
fn unknown_provider_warns_and_uses_default() {
    let home = TempDir::new().unwrap();

    isolated(&home)
        .args(["-v", "--provider", "foobar", "providers"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown provider \"foobar\""))
        .stdout(predicate::str::contains("* openai"));
}

#[test]
fn lists_builtin_personalities() {
    let home = TempDir::new().unwrap();

    isolated(&home)
        .arg("personalities")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("supportive")
                .and(predicate::str::contains("sarcastic"))
                .and(predicate::str::contains("mentor"))
                .and(predicate::str::contains("zen")),
        );
}

#[test]
fn lists_personalities_from_file() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("custom.toml");
    std::fs::write(
        &file,
        r#"
[personalities.pirate]
name = "Pirate"
description = "Arr"
user_prompt_format = "{{Message}}"
"#,
    )
    .unwrap();

    isolated(&home)
        .arg("--personality-file")
        .arg(&file)
        .arg("personalities")
        .assert()
        .success()
        .stdout(predicate::str::contains("pirate").and(predicate::str::contains("supportive")));
}

#[test]
fn suggest_outside_a_repository_fails() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    isolated(&home)
        .current_dir(work.path())
        .env("GIT_CEILING_DIRECTORIES", work.path().parent().unwrap())
        .arg("suggest")
        .assert()
        .failure();
}
