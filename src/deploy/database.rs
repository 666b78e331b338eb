// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use super::kubectl;
use crate::error::Result;
use crate::runner::{run_checked, CommandOutput, CommandRunner, Invocation};

fn delete_manifest(context: &str, manifest: &Path) -> Invocation {
    kubectl(context, true)
        .args(["delete", "--ignore-not-found", "--wait", "-f"])
        .arg(manifest.to_string_lossy())
}

/// `kubectl apply` the static database manifest.
pub async fn deploy_database(
    runner: &dyn CommandRunner,
    context: &str,
    manifest: &Path,
) -> Result<()> {
    tracing::info!(manifest = %manifest.display(), "applying database manifest");
    let apply = kubectl(context, true)
        .args(["apply", "-f"])
        .arg(manifest.to_string_lossy());
    run_checked(runner, &apply).await.map(|_| ())
}

/// Delete the manifest's resources; missing resources are not an error.
///
/// Returns the raw output so teardown can record a failure without aborting.
pub async fn remove_database(
    runner: &dyn CommandRunner,
    context: &str,
    manifest: &Path,
) -> Result<CommandOutput> {
    runner.run(&delete_manifest(context, manifest)).await
}

/// Drop and recreate the database resources.
pub async fn reset_database(
    runner: &dyn CommandRunner,
    context: &str,
    manifest: &Path,
) -> Result<()> {
    tracing::info!(manifest = %manifest.display(), "resetting database");
    run_checked(runner, &delete_manifest(context, manifest)).await?;
    deploy_database(runner, context, manifest).await
}
