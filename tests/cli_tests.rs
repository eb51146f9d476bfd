//! CLI binary tests for `prforge`

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn prforge() -> Command {
    Command::cargo_bin("prforge").unwrap()
}

#[test]
fn help_lists_subcommands() {
    prforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("auth"));
}

#[test]
fn version_flag_works() {
    prforge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("prforge"));
}

#[test]
fn publish_requires_changes() {
    prforge()
        .args([
            "publish",
            "--repo",
            "octo/demo",
            "--branch",
            "feat-x",
            "--message",
            "msg",
            "--title",
            "title",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DEST=SRC"));
}

#[test]
fn publish_reports_missing_change_file() {
    prforge()
        .args([
            "publish",
            "--repo",
            "octo/demo",
            "--branch",
            "feat-x",
            "--message",
            "msg",
            "--title",
            "title",
            "--token",
            "dummy",
            "a.txt=/definitely/not/here.txt",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read change file"));
}

#[test]
fn publish_rejects_malformed_repository() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "hello").unwrap();

    prforge()
        .args([
            "publish",
            "--repo",
            "not-a-repo",
            "--branch",
            "feat-x",
            "--message",
            "msg",
            "--title",
            "title",
            "--token",
            "dummy",
            &format!("a.txt={}", file.path().display()),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid repository"));
}

#[test]
fn auth_setup_prints_instructions() {
    prforge()
        .args(["auth", "setup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gh auth login"));
}
