// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-service Helm releases.
//!
//! Each `*.yaml` / `*.yml` file in the values directory is one service. Its
//! file stem names both the namespace and the release, and the file is passed
//! as value overrides to the shared chart.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::kubectl;
use crate::config::validation::validate_resource_name;
use crate::error::{DevstackError, Result};
use crate::provision::Provisioned;
use crate::runner::{run_checked, CommandRunner, Invocation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDeployment {
    /// Namespace and release name.
    pub namespace: String,
    pub values_file: PathBuf,
}

fn is_values_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// List services in `values_dir`, ordered by namespace.
///
/// Hidden files, directories and non-YAML files are skipped.
///
/// # Errors
/// `ReadFile` if the directory cannot be listed, `Validation` for a stem that
/// is not a valid namespace, `DuplicateService` when two files share a stem.
pub fn discover_services(values_dir: &Path) -> Result<Vec<ServiceDeployment>> {
    let entries =
        std::fs::read_dir(values_dir).map_err(|e| DevstackError::read_file(values_dir, e))?;

    let mut by_namespace: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if !path.is_file() || !is_values_file(&path) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if stem.starts_with('.') {
            continue;
        }

        validate_resource_name(stem, &format!("namespace for {}", path.display()))?;

        if let Some(first) = by_namespace.get(stem) {
            return Err(DevstackError::DuplicateService {
                namespace: stem.to_string(),
                first: first.clone(),
                second: path,
            });
        }
        by_namespace.insert(stem.to_string(), path);
    }

    Ok(by_namespace
        .into_iter()
        .map(|(namespace, values_file)| ServiceDeployment {
            namespace,
            values_file,
        })
        .collect())
}

pub async fn namespace_exists(
    runner: &dyn CommandRunner,
    context: &str,
    namespace: &str,
) -> Result<bool> {
    let get = kubectl(context, false).args(["get", "namespace", namespace]);
    Ok(runner.run(&get).await?.success())
}

/// Create `namespace` unless it exists.
pub async fn ensure_namespace(
    runner: &dyn CommandRunner,
    context: &str,
    namespace: &str,
) -> Result<Provisioned> {
    if namespace_exists(runner, context, namespace).await? {
        return Ok(Provisioned::AlreadyPresent);
    }
    tracing::info!(namespace, "creating namespace");
    run_checked(
        runner,
        &kubectl(context, true).args(["create", "namespace", namespace]),
    )
    .await?;
    Ok(Provisioned::Created)
}

/// `helm upgrade --install` the shared chart once per values file.
///
/// Stops at the first failing release.
pub async fn deploy_services(
    runner: &dyn CommandRunner,
    context: &str,
    values_dir: &Path,
    chart_dir: &Path,
) -> Result<Vec<ServiceDeployment>> {
    let services = discover_services(values_dir)?;
    if services.is_empty() {
        tracing::warn!(values_dir = %values_dir.display(), "no values files found");
        return Ok(services);
    }

    for service in &services {
        ensure_namespace(runner, context, &service.namespace).await?;

        tracing::info!(
            release = %service.namespace,
            values = %service.values_file.display(),
            "deploying service"
        );
        let upgrade = Invocation::mutation("helm")
            .args(["upgrade", "--install", &service.namespace])
            .arg(chart_dir.to_string_lossy())
            .args(["--namespace", &service.namespace, "--kube-context", context, "-f"])
            .arg(service.values_file.to_string_lossy());
        run_checked(runner, &upgrade).await?;
    }

    Ok(services)
}
