//! End-to-end tests for the `sidebar` binary.
//!
//! Every test points the CLI at a fresh data directory and config file so
//! nothing leaks between runs or into the user's real data.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("sidebar").unwrap();
        cmd.env_clear()
            .env("SIDEBAR_DATA_DIR", self.dir.path().join("data"))
            .env("SIDEBAR_CONFIG", self.dir.path().join("config.toml"))
            .env("NO_COLOR", "1");
        cmd
    }

    fn user(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.env("SIDEBAR_USER", "alice");
        cmd
    }

    fn new_chat(&self, title: &str) -> String {
        let output = self
            .user()
            .args(["--quiet", "new", title])
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }
}

#[test]
fn test_empty_list_shows_headline() {
    let env = Env::new();
    env.user()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("What can I help with?"));
}

#[test]
fn test_anonymous_list_shows_headline() {
    let env = Env::new();
    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("What can I help with?"));
}

#[test]
fn test_new_pin_and_list() {
    let env = Env::new();
    env.new_chat("Trip to Paris");
    let rust = env.new_chat("Rust lifetimes");

    env.user()
        .args(["pin", &rust])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chat pinned"));

    env.user()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pinned (1)"))
        .stdout(predicate::str::contains("General (1)"));

    env.user()
        .args(["list", "paris"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trip to Paris"))
        .stdout(predicate::str::contains("Rust lifetimes").not());
}

#[test]
fn test_list_json() {
    let env = Env::new();
    let id = env.new_chat("Groceries");

    let output = env.user().args(["--json", "list"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["user"], "alice");
    assert_eq!(value["General"][0]["id"], id.as_str());
    assert_eq!(value["Pinned"].as_array().unwrap().len(), 0);
}

#[test]
fn test_clear_rejects_wrong_confirmation() {
    let env = Env::new();
    env.new_chat("Keep me");

    env.user()
        .args(["clear", "--confirm", "delete"])
        .assert()
        .failure()
        .code(64)
        .stderr(predicate::str::contains("type DELETE to confirm"));

    env.user()
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("Keep me"));
}

#[test]
fn test_clear_checks_confirmation_on_empty_history() {
    let env = Env::new();
    env.user()
        .args(["clear", "--confirm", "delete"])
        .assert()
        .failure()
        .code(64)
        .stderr(predicate::str::contains("type DELETE to confirm"));

    env.user()
        .args(["clear", "--confirm", "DELETE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No chats to delete."));
}

#[test]
fn test_corrupt_preferences_do_not_block_commands() {
    let env = Env::new();
    let data = env.dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("preferences.json"), [0xff, 0xfe, 0x00, 0x7b]).unwrap();

    env.user()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("What can I help with?"));

    env.user()
        .args(["accent", "#10b981"])
        .assert()
        .success();
    env.user()
        .args(["--quiet", "accent"])
        .assert()
        .success()
        .stdout("#10b981\n");
}

#[test]
fn test_clear_deletes_everything() {
    let env = Env::new();
    env.new_chat("One");
    env.new_chat("Two");

    env.user()
        .args(["clear", "--confirm", "DELETE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 chats"));

    env.user()
        .arg("list")
        .assert()
        .stdout(predicate::str::contains("What can I help with?"));
}

#[test]
fn test_delete_unknown_chat_exit_code() {
    let env = Env::new();
    env.user()
        .args(["delete", "nope"])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn test_export_writes_file() {
    let env = Env::new();
    env.new_chat("Exported");
    let out = env.dir.path().join("out");

    env.user()
        .args(["export", "--format", "markdown", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 chat to"));

    let files: Vec<_> = std::fs::read_dir(&out).unwrap().collect();
    assert_eq!(files.len(), 1);
    let name = files[0].as_ref().unwrap().file_name();
    let name = name.to_string_lossy();
    assert!(name.starts_with("chat-history-alice-"));
    assert!(name.ends_with(".md"));
}

#[test]
fn test_export_stdout_is_json() {
    let env = Env::new();
    env.new_chat("Exported");

    let output = env.user().args(["export", "--stdout"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["userId"], "alice");
    assert_eq!(value["chatCount"], 1);
}

#[test]
fn test_accent_validation_and_persistence() {
    let env = Env::new();

    env.user()
        .args(["accent", "blue"])
        .assert()
        .failure()
        .code(64);

    env.user().args(["accent", "#8B5CF6"]).assert().success();

    env.user()
        .args(["--quiet", "accent"])
        .assert()
        .success()
        .stdout("#8b5cf6\n");
}

#[test]
fn test_role_override_and_reset() {
    let env = Env::new();

    env.user()
        .args(["role", "owner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Owner"));

    env.user()
        .args(["--quiet", "role"])
        .assert()
        .stdout("Owner\n");

    env.user()
        .args(["role", "--reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Member"));
}

#[test]
fn test_feedback_requires_text() {
    let env = Env::new();

    env.user()
        .args(["feedback", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be empty"));

    env.user()
        .args(["feedback", "--category", "idea", "Dark mode please"])
        .assert()
        .success();

    let log = std::fs::read_to_string(env.dir.path().join("data").join("feedback.jsonl")).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("Dark mode please"));
}

#[test]
fn test_mutations_require_user() {
    let env = Env::new();
    env.cmd()
        .args(["new", "Orphan"])
        .assert()
        .failure()
        .code(64)
        .stderr(predicate::str::contains("No current user"));
}

#[test]
fn test_config_init_and_get() {
    let env = Env::new();

    env.cmd().args(["config", "init"]).assert().success();
    env.cmd().args(["config", "init"]).assert().failure();

    env.cmd()
        .args(["config", "get", "export.format"])
        .assert()
        .success()
        .stdout("json\n");
}
