// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

use super::Provisioned;
use crate::error::Result;
use crate::runner::{run_checked, CommandRunner, Invocation};

/// `docker network inspect` succeeds only for existing networks.
pub async fn network_exists(runner: &dyn CommandRunner, name: &str) -> Result<bool> {
    let inspect = Invocation::query("docker").args(["network", "inspect", name]);
    Ok(runner.run(&inspect).await?.success())
}

/// Create the docker network `name` if it does not exist.
pub async fn ensure_network(runner: &dyn CommandRunner, name: &str) -> Result<Provisioned> {
    if network_exists(runner, name).await? {
        tracing::info!(network = name, "network already exists");
        return Ok(Provisioned::AlreadyPresent);
    }

    tracing::info!(network = name, "creating network");
    run_checked(
        runner,
        &Invocation::mutation("docker").args(["network", "create", name]),
    )
    .await?;
    Ok(Provisioned::Created)
}
