// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tests for the teardown sequence and its report.

use super::*;
use crate::runner::{CommandOutput, ScriptedRunner};

fn config_with_install_dir(dir: &Path) -> DevstackConfig {
    DevstackConfig {
        install_dir: dir.to_path_buf(),
        ..Default::default()
    }
}

fn everything_present() -> ScriptedRunner {
    ScriptedRunner::new()
        .respond("kind get clusters", CommandOutput::ok("devstack\n"))
        .respond("docker network inspect", CommandOutput::ok("[{}]"))
}

#[tokio::test]
async fn test_teardown_with_nothing_present() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new()
        .respond("kind get clusters", CommandOutput::ok(""))
        .respond("docker network inspect", CommandOutput::failed(1, "No such network"));

    let report = teardown(&runner, &config_with_install_dir(dir.path()), false).await;

    assert!(report.is_clean());
    assert_eq!(report.steps.len(), 4);
    assert!(report.steps.iter().all(|s| s.outcome == StepOutcome::Absent));
    assert!(runner.mutations().is_empty());
}

#[tokio::test]
async fn test_teardown_removes_in_reverse_order() {
    let dir = tempfile::tempdir().unwrap();
    let kind = dir.path().join("kind");
    std::fs::write(&kind, b"#!/bin/sh\n").unwrap();
    let runner = everything_present();

    let report = teardown(&runner, &config_with_install_dir(dir.path()), false).await;

    assert!(report.is_clean());
    assert!(report.steps.iter().all(|s| s.outcome == StepOutcome::Removed));
    let mutations: Vec<String> = runner.mutations().iter().map(|m| m.command_line()).collect();
    assert_eq!(
        mutations,
        vec![
            "kubectl --context kind-devstack delete --ignore-not-found --wait -f deploy/postgres.yaml"
                .to_string(),
            "kind delete cluster --name devstack".to_string(),
            "docker network rm devstack-net".to_string(),
            format!("rm -f {}", kind.display()),
        ]
    );
}

#[tokio::test]
async fn test_teardown_elevates_binary_removal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("kind"), b"").unwrap();
    let runner = ScriptedRunner::new()
        .respond("kind get clusters", CommandOutput::ok(""))
        .respond("docker network inspect", CommandOutput::failed(1, ""));

    teardown(&runner, &config_with_install_dir(dir.path()), true).await;

    let mutations = runner.mutations();
    assert_eq!(mutations.len(), 1);
    assert!(mutations[0].command_line().starts_with("sudo rm -f "));
}

#[tokio::test]
async fn test_teardown_continues_past_failures() {
    let dir = tempfile::tempdir().unwrap();
    let runner = everything_present()
        .respond("kind delete cluster", CommandOutput::failed(1, "ERROR: failed to delete cluster"))
        .respond(
            "kubectl --context kind-devstack delete",
            CommandOutput::failed(1, "Unable to connect to the server"),
        );

    let report = teardown(&runner, &config_with_install_dir(dir.path()), false).await;

    assert!(!report.is_clean());
    assert_eq!(
        report.outcome(TeardownStep::DatabaseResources),
        Some(&StepOutcome::Failed("Unable to connect to the server".to_string()))
    );
    assert!(matches!(
        report.outcome(TeardownStep::Cluster),
        Some(StepOutcome::Failed(reason)) if reason.contains("failed to delete cluster")
    ));
    assert_eq!(report.outcome(TeardownStep::Network), Some(&StepOutcome::Removed));
    assert_eq!(report.outcome(TeardownStep::KindBinary), Some(&StepOutcome::Absent));
    assert_eq!(report.failures().count(), 2);
}

#[tokio::test]
async fn test_teardown_without_kind_installed() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new()
        .without_program("kind")
        .respond("docker network inspect", CommandOutput::ok("[{}]"));

    let report = teardown(&runner, &config_with_install_dir(dir.path()), false).await;

    assert!(report.is_clean());
    assert_eq!(report.outcome(TeardownStep::DatabaseResources), Some(&StepOutcome::Absent));
    assert_eq!(report.outcome(TeardownStep::Cluster), Some(&StepOutcome::Absent));
    assert_eq!(report.outcome(TeardownStep::Network), Some(&StepOutcome::Removed));
}

#[tokio::test]
async fn test_teardown_twice_second_run_is_all_absent() {
    let dir = tempfile::tempdir().unwrap();
    let kind = dir.path().join("kind");
    std::fs::write(&kind, b"").unwrap();
    let config = config_with_install_dir(dir.path());

    let first = teardown(&everything_present(), &config, false).await;
    assert!(first.is_clean());
    // The scripted `rm -f` does not touch the filesystem.
    std::fs::remove_file(&kind).unwrap();

    // kind went with the first run.
    let runner = ScriptedRunner::new()
        .without_program("kind")
        .respond("docker network inspect", CommandOutput::failed(1, "No such network"));
    let second = teardown(&runner, &config, false).await;

    assert!(second.is_clean());
    assert!(second.steps.iter().all(|s| s.outcome == StepOutcome::Absent));
    assert!(runner.mutations().is_empty());
}

#[tokio::test]
async fn test_teardown_kind_failure_other_than_missing_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ScriptedRunner::new()
        .respond("kind get clusters", CommandOutput::failed(1, "permission denied"))
        .respond("docker network inspect", CommandOutput::failed(1, ""));

    let report = teardown(&runner, &config_with_install_dir(dir.path()), false).await;

    assert!(matches!(report.outcome(TeardownStep::Cluster), Some(StepOutcome::Failed(_))));
}

#[test]
fn test_summary_and_json() {
    let mut report = TeardownReport::default();
    report.record(TeardownStep::Cluster, "devstack", StepOutcome::Removed);
    report.record(TeardownStep::Network, "devstack-net", StepOutcome::Failed("busy".to_string()));

    let lines = report.summary_lines();
    assert_eq!(lines[0], "  removed  cluster (devstack)");
    assert_eq!(lines[1], "  FAILED   network (devstack-net): busy");

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"step\":\"cluster\""));
    assert!(json.contains("\"outcome\":\"removed\""));
    assert!(json.contains("\"reason\":\"busy\""));
}
