// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Best-effort environment teardown.
//!
//! Steps run in reverse dependency order. Each one checks for its resource
//! first; a failure is recorded in the [`TeardownReport`] and the sequence
//! carries on.

pub mod report;

use std::path::Path;

use crate::config::DevstackConfig;
use crate::deploy::remove_database;
use crate::error::{DevstackError, Result};
use crate::platform::Tool;
use crate::provision::{cluster_exists, network_exists};
use crate::runner::{CommandRunner, Invocation};

pub use report::{StepOutcome, StepReport, TeardownReport, TeardownStep};

/// Remove everything `start` creates. Never fails.
pub async fn teardown(
    runner: &dyn CommandRunner,
    config: &DevstackConfig,
    elevate: bool,
) -> TeardownReport {
    let mut report = TeardownReport::default();
    let cluster = config.cluster_name.as_str();
    let kind_binary = config.install_dir.join(Tool::Kind.binary_name());

    let outcome = settle(remove_database_step(runner, config).await);
    report.record(
        TeardownStep::DatabaseResources,
        config.database_manifest.display().to_string(),
        outcome,
    );

    let outcome = settle(remove_cluster(runner, cluster).await);
    report.record(TeardownStep::Cluster, cluster, outcome);

    let outcome = settle(remove_network(runner, &config.network_name).await);
    report.record(TeardownStep::Network, config.network_name.as_str(), outcome);

    let outcome = settle(remove_binary(runner, &kind_binary, elevate).await);
    report.record(
        TeardownStep::KindBinary,
        kind_binary.display().to_string(),
        outcome,
    );

    for failure in report.failures() {
        tracing::warn!(step = %failure.step, target_name = %failure.target, "teardown step failed");
    }
    report
}

/// Like [`cluster_exists`], but a host without `kind` has no clusters.
async fn kind_cluster_present(runner: &dyn CommandRunner, name: &str) -> Result<bool> {
    match cluster_exists(runner, name).await {
        Err(DevstackError::Spawn { ref source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            tracing::debug!(cluster = name, "kind not installed, no cluster to remove");
            Ok(false)
        }
        other => other,
    }
}

fn settle(result: Result<StepOutcome>) -> StepOutcome {
    result.unwrap_or_else(|e| StepOutcome::Failed(e.to_string()))
}

/// Run a removal and map its exit status to an outcome.
async fn run_removal(runner: &dyn CommandRunner, invocation: Invocation) -> Result<StepOutcome> {
    let output = runner.run(&invocation).await?;
    if output.success() {
        Ok(StepOutcome::Removed)
    } else {
        Err(DevstackError::tool_failed(&invocation, &output))
    }
}

async fn remove_database_step(
    runner: &dyn CommandRunner,
    config: &DevstackConfig,
) -> Result<StepOutcome> {
    // Without a cluster there is no API server to delete from.
    if !kind_cluster_present(runner, &config.cluster_name).await? {
        return Ok(StepOutcome::Absent);
    }
    tracing::info!("deleting database resources");
    let output = remove_database(runner, &config.kube_context(), &config.database_manifest).await?;
    if output.success() {
        Ok(StepOutcome::Removed)
    } else {
        Ok(StepOutcome::Failed(output.stderr.trim().to_string()))
    }
}

async fn remove_cluster(runner: &dyn CommandRunner, name: &str) -> Result<StepOutcome> {
    if !kind_cluster_present(runner, name).await? {
        return Ok(StepOutcome::Absent);
    }
    tracing::info!(cluster = name, "deleting cluster");
    run_removal(
        runner,
        Invocation::mutation("kind").args(["delete", "cluster", "--name", name]),
    )
    .await
}

async fn remove_network(runner: &dyn CommandRunner, name: &str) -> Result<StepOutcome> {
    if !network_exists(runner, name).await? {
        return Ok(StepOutcome::Absent);
    }
    tracing::info!(network = name, "removing network");
    run_removal(
        runner,
        Invocation::mutation("docker").args(["network", "rm", name]),
    )
    .await
}

async fn remove_binary(runner: &dyn CommandRunner, path: &Path, elevate: bool) -> Result<StepOutcome> {
    if !path.exists() {
        return Ok(StepOutcome::Absent);
    }
    tracing::info!(path = %path.display(), "removing installed binary");
    run_removal(
        runner,
        Invocation::mutation("rm")
            .arg("-f")
            .arg(path.to_string_lossy())
            .elevated(elevate),
    )
    .await
}

#[cfg(test)]
#[path = "teardown_tests.rs"]
mod tests;
