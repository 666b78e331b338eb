// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tests for tool, network and cluster provisioning.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::*;
use crate::error::{DevstackError, Result};
use crate::platform::{Installer, Platform, Tool};
use crate::runner::{CommandOutput, CommandRunner, ScriptedRunner};

#[derive(Default)]
struct CountingInstaller {
    installs: AtomicUsize,
}

#[async_trait]
impl Installer for CountingInstaller {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    async fn install(&self, _tool: Tool, _runner: &dyn CommandRunner) -> Result<()> {
        self.installs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn config_arg(runner: &ScriptedRunner) -> PathBuf {
    let create = runner
        .calls()
        .into_iter()
        .find(|c| c.command_line().starts_with("kind create cluster"))
        .expect("kind create cluster was not invoked");
    let idx = create.args.iter().position(|a| a == "--config").unwrap();
    PathBuf::from(&create.args[idx + 1])
}

fn template_file(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kind-cluster.yaml.tpl");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

const TEMPLATE: &str = "kind: Cluster\napiVersion: kind.x-k8s.io/v1alpha4\nname: {{CLUSTER_NAME}}\nnodes:\n  - role: control-plane\n    labels:\n      cluster: {{CLUSTER_NAME}}\n";

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ensure_tool_present_is_noop() {
    let runner = ScriptedRunner::new().with_tool("kind");
    let installer = CountingInstaller::default();

    let state = ensure_tool(&runner, Tool::Kind, &installer).await.unwrap();

    assert_eq!(state, ToolState::AlreadyPresent(PathBuf::from("/usr/local/bin/kind")));
    assert_eq!(installer.installs.load(Ordering::SeqCst), 0);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_ensure_tool_missing_installs() {
    let runner = ScriptedRunner::new();
    let installer = CountingInstaller::default();

    let state = ensure_tool(&runner, Tool::Helm, &installer).await.unwrap();

    assert_eq!(state, ToolState::Installed);
    assert_eq!(installer.installs.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ensure_network_creates_when_absent() {
    let runner = ScriptedRunner::new().respond(
        "docker network inspect",
        CommandOutput::failed(1, "Error: No such network: devstack-net"),
    );

    let result = ensure_network(&runner, "devstack-net").await.unwrap();

    assert_eq!(result, Provisioned::Created);
    assert_eq!(runner.count("docker network create devstack-net"), 1);
}

#[tokio::test]
async fn test_ensure_network_is_idempotent() {
    let runner = ScriptedRunner::new().respond_sequence(
        "docker network inspect",
        vec![CommandOutput::failed(1, "No such network"), CommandOutput::ok("[{}]")],
    );

    assert_eq!(ensure_network(&runner, "net").await.unwrap(), Provisioned::Created);
    assert_eq!(ensure_network(&runner, "net").await.unwrap(), Provisioned::AlreadyPresent);
    assert_eq!(runner.mutations().len(), 1);
}

#[tokio::test]
async fn test_ensure_network_create_failure_propagates() {
    let runner = ScriptedRunner::new()
        .respond("docker network inspect", CommandOutput::failed(1, ""))
        .respond(
            "docker network create",
            CommandOutput::failed(1, "Cannot connect to the Docker daemon"),
        );

    let err = ensure_network(&runner, "net").await.unwrap_err();
    assert!(matches!(err, DevstackError::ToolFailed { ref stderr, .. } if stderr.contains("Docker daemon")));
}

// ---------------------------------------------------------------------------
// Cluster
// ---------------------------------------------------------------------------

#[test]
fn test_render_replaces_every_placeholder() {
    let rendered = render_template(TEMPLATE, "team-a");
    assert!(!rendered.contains(CLUSTER_NAME_PLACEHOLDER));
    assert_eq!(rendered.matches("team-a").count(), 2);
}

#[test]
fn test_render_without_placeholder_is_unchanged() {
    assert_eq!(render_template("kind: Cluster\n", "x"), "kind: Cluster\n");
}

#[test]
fn test_control_plane_container_name() {
    assert_eq!(control_plane_container("devstack"), "devstack-control-plane");
}

#[tokio::test]
async fn test_cluster_exists_requires_exact_match() {
    let runner = ScriptedRunner::new().respond(
        "kind get clusters",
        CommandOutput::ok("devstack-old\nother\n"),
    );
    assert!(!cluster_exists(&runner, "devstack").await.unwrap());
    assert!(cluster_exists(&runner, "other").await.unwrap());
}

#[tokio::test]
async fn test_ensure_cluster_existing_is_noop() {
    let runner = ScriptedRunner::new().respond("kind get clusters", CommandOutput::ok("devstack\n"));
    let spec = ClusterSpec {
        name: "devstack".to_string(),
        template: PathBuf::from("/does/not/matter"),
        network: "devstack-net".to_string(),
    };

    assert_eq!(ensure_cluster(&runner, &spec).await.unwrap(), Provisioned::AlreadyPresent);
    assert!(runner.mutations().is_empty());
}

#[tokio::test]
async fn test_ensure_cluster_creates_connects_and_cleans_up() {
    let (_dir, template) = template_file(TEMPLATE);
    let runner = ScriptedRunner::new().respond("kind get clusters", CommandOutput::ok(""));
    let spec = ClusterSpec {
        name: "devstack".to_string(),
        template,
        network: "devstack-net".to_string(),
    };

    assert_eq!(ensure_cluster(&runner, &spec).await.unwrap(), Provisioned::Created);

    let mutations: Vec<String> = runner.mutations().iter().map(|m| m.command_line()).collect();
    assert_eq!(mutations.len(), 2);
    assert!(mutations[0].starts_with("kind create cluster --name devstack --config "));
    assert_eq!(
        mutations[1],
        "docker network connect devstack-net devstack-control-plane"
    );
    assert!(!config_arg(&runner).exists(), "rendered config must be removed");
}

#[tokio::test]
async fn test_rendered_config_removed_on_failure() {
    let (_dir, template) = template_file(TEMPLATE);
    let runner = ScriptedRunner::new()
        .respond("kind get clusters", CommandOutput::ok(""))
        .respond("kind create cluster", CommandOutput::failed(1, "ERROR: failed to create cluster"));
    let spec = ClusterSpec {
        name: "devstack".to_string(),
        template,
        network: "devstack-net".to_string(),
    };

    let err = ensure_cluster(&runner, &spec).await.unwrap_err();

    assert!(matches!(err, DevstackError::ToolFailed { .. }));
    assert_eq!(runner.count("docker network connect"), 0);
    assert!(!config_arg(&runner).exists(), "rendered config must be removed");
}

#[tokio::test]
async fn test_missing_template_is_reported() {
    let runner = ScriptedRunner::new().respond("kind get clusters", CommandOutput::ok(""));
    let spec = ClusterSpec {
        name: "devstack".to_string(),
        template: PathBuf::from("/nonexistent/kind-cluster.yaml.tpl"),
        network: "devstack-net".to_string(),
    };

    let err = ensure_cluster(&runner, &spec).await.unwrap_err();
    assert!(matches!(err, DevstackError::ReadFile { .. }));
    assert!(runner.mutations().is_empty());
}

#[tokio::test]
async fn test_kind_query_failure_propagates() {
    let runner = ScriptedRunner::new().without_program("kind");
    let spec = ClusterSpec {
        name: "devstack".to_string(),
        template: PathBuf::from("unused"),
        network: "net".to_string(),
    };
    assert!(matches!(
        ensure_cluster(&runner, &spec).await,
        Err(DevstackError::Spawn { .. })
    ));
}
