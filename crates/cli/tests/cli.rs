// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box tests for the fm binary
//!
//! Nothing here needs a live backend: offline commands run without config,
//! and intake validation rejects bad drafts before any gateway call.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn fm() -> Command {
    let mut cmd = Command::cargo_bin("fm").unwrap();
    cmd.env_remove("FM_CONFIG").env_remove("FM_LOG");
    cmd
}

/// A config pointing at a port nothing listens on
fn write_config(dir: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("foreman.toml");
    let content = format!(
        r#"
[gateway]
base_url = "http://127.0.0.1:9"
timeout = "2s"

[tables]
leads = 1
activities = 2

[outbox]
path = "{}"
{}
"#,
        dir.join("outbox.wal").display(),
        extra
    );
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_fm_help() {
    fm().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lead pipeline"))
        .stdout(predicate::str::contains("stages"));
}

#[test]
fn test_fm_version() {
    fm().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fm"));
}

#[test]
fn test_stages_lists_transition_table() {
    fm().arg("stages")
        .assert()
        .success()
        .stdout(predicate::str::contains("ESTIMATE_SENT"))
        .stdout(predicate::str::contains("(terminal)"));
}

#[test]
fn test_stages_json_marks_terminal_stages() {
    let output = fm().args(["--output", "json", "stages"]).output().unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0]["stage"], "NEW");
    assert_eq!(rows[5]["stage"], "WON");
    assert_eq!(rows[5]["terminal"], true);
    assert!(rows[5]["next"].as_array().unwrap().is_empty());
}

#[test]
fn test_sla_overdue_lead() {
    fm().args([
        "sla",
        "--status",
        "CONTACTED",
        "--next-action-at",
        "2026-06-01T11:00:00Z",
        "--at",
        "2026-06-01T12:00:00Z",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("overdue"));
}

#[test]
fn test_sla_due_within_critical_window() {
    fm().args([
        "sla",
        "--status",
        "NEGOTIATING",
        "--next-action-at",
        "2026-06-01T15:00:00Z",
        "--at",
        "2026-06-01T12:00:00Z",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("critical"));
}

#[test]
fn test_sla_terminal_lead_has_no_band() {
    fm().args([
        "sla",
        "--status",
        "WON",
        "--next-action-at",
        "2026-06-01T11:00:00Z",
        "--at",
        "2026-06-01T12:00:00Z",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("none"));
}

#[test]
fn test_sla_uses_configured_thresholds() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        temp.path(),
        "[sla]\ncritical_within = \"1h\"\nwarning_within = \"4h\"\n",
    );

    fm().arg("--config")
        .arg(&config)
        .args([
            "sla",
            "--status",
            "NEW",
            "--next-action-at",
            "2026-06-01T15:00:00Z",
            "--at",
            "2026-06-01T12:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning"));
}

#[test]
fn test_unknown_stage_is_rejected_by_parser() {
    fm().args(["lead", "move", "1", "DONE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DONE"));
}

#[test]
fn test_missing_config_is_explained() {
    let temp = TempDir::new().unwrap();
    fm().current_dir(temp.path())
        .args(["lead", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No config file found"))
        .stderr(predicate::str::contains("foreman.toml"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        temp.path(),
        "[sla]\ncritical_within = \"12h\"\nwarning_within = \"6h\"\n",
    );

    fm().arg("--config")
        .arg(&config)
        .arg("board")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not load"))
        .stderr(predicate::str::contains("sla.critical_within"));
}

#[test]
fn test_inverted_budget_rejected_before_network() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "");

    fm().arg("--config")
        .arg(&config)
        .args([
            "lead",
            "create",
            "--name",
            "Ada Lovelace",
            "--budget-min",
            "50000",
            "--budget-max",
            "30000",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("budget_min"))
        .stderr(predicate::str::contains("Could not reach").not());
}

#[test]
fn test_status_change_cannot_be_logged() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "");

    fm().arg("--config")
        .arg(&config)
        .args([
            "lead",
            "log",
            "1",
            "--kind",
            "STATUS_CHANGE",
            "--title",
            "moved",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("recorded automatically"));
}

#[test]
fn test_empty_outbox_lists_nothing() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "");

    fm().arg("--config")
        .arg(&config)
        .args(["audit", "pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No deferred audit entries"));
}

#[test]
fn test_completions_generate_script() {
    fm().args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fm"));
}
