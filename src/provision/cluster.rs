// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! kind cluster provisioning.

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use super::Provisioned;
use crate::error::{DevstackError, Result};
use crate::runner::{run_checked, CommandRunner, Invocation};

/// Token replaced with the cluster name when rendering the kind config.
pub const CLUSTER_NAME_PLACEHOLDER: &str = "{{CLUSTER_NAME}}";

/// What `ensure_cluster` needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSpec {
    pub name: String,
    pub template: PathBuf,
    /// Network the control-plane container joins after creation.
    pub network: String,
}

pub fn render_template(template: &str, cluster_name: &str) -> String {
    template.replace(CLUSTER_NAME_PLACEHOLDER, cluster_name)
}

/// Docker container kind runs the control plane in.
pub fn control_plane_container(cluster_name: &str) -> String {
    format!("{}-control-plane", cluster_name)
}

/// Exact-name match against `kind get clusters`.
pub async fn cluster_exists(runner: &dyn CommandRunner, name: &str) -> Result<bool> {
    let output = run_checked(runner, &Invocation::query("kind").args(["get", "clusters"])).await?;
    Ok(output.stdout.lines().any(|line| line.trim() == name))
}

/// Create the cluster from its rendered template unless it exists.
///
/// The rendered config lives in a scratch file that is removed when this
/// function returns, whether creation succeeded or not.
pub async fn ensure_cluster(runner: &dyn CommandRunner, spec: &ClusterSpec) -> Result<Provisioned> {
    if cluster_exists(runner, &spec.name).await? {
        tracing::info!(cluster = %spec.name, "cluster already exists");
        return Ok(Provisioned::AlreadyPresent);
    }

    let template = std::fs::read_to_string(&spec.template)
        .map_err(|e| DevstackError::read_file(&spec.template, e))?;
    if !template.contains(CLUSTER_NAME_PLACEHOLDER) {
        tracing::warn!(
            template = %spec.template.display(),
            "template has no {} placeholder; using it as-is",
            CLUSTER_NAME_PLACEHOLDER
        );
    }
    let rendered = write_rendered(&render_template(&template, &spec.name))?;

    tracing::info!(cluster = %spec.name, "creating cluster");
    run_checked(
        runner,
        &Invocation::mutation("kind")
            .args(["create", "cluster", "--name", &spec.name, "--config"])
            .arg(rendered.path().to_string_lossy()),
    )
    .await?;

    let container = control_plane_container(&spec.name);
    tracing::info!(%container, network = %spec.network, "connecting control plane to network");
    run_checked(
        runner,
        &Invocation::mutation("docker").args(["network", "connect", &spec.network, &container]),
    )
    .await?;

    Ok(Provisioned::Created)
}

fn write_rendered(contents: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("kind-config-")
        .suffix(".yaml")
        .tempfile()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}
