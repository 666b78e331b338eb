// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Status command implementation for devstack.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::status_format::print_status_human;
use crate::config::DevstackConfig;
use crate::deploy::{discover_services, namespace_exists};
use crate::platform::Platform;
use crate::provision::{cluster_exists, network_exists};
use crate::runner::CommandRunner;
use crate::Devstack;

/// Tools reported by `status`, in display order.
pub const STATUS_TOOLS: [&str; 4] = ["kind", "helm", "kubectl", "docker"];

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentStatus {
    pub checked_at: DateTime<Utc>,
    pub platform: Platform,
    pub state: EnvironmentState,
    pub tools: Vec<ToolStatus>,
    pub network: ResourceStatus,
    pub cluster: ResourceStatus,
    pub services: Vec<ServiceStatus>,
    /// Set when the values directory could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentState {
    /// Network, cluster and every service namespace exist.
    Up,
    Partial,
    Down,
}

impl std::fmt::Display for EnvironmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvironmentState::Up => write!(f, "up"),
            EnvironmentState::Partial => write!(f, "partial"),
            EnvironmentState::Down => write!(f, "down"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub path: Option<PathBuf>,
}

impl ToolStatus {
    pub fn installed(&self) -> bool {
        self.path.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceStatus {
    pub name: String,
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub namespace: String,
    pub values_file: PathBuf,
    pub deployed: bool,
}

/// Inspect the environment without changing it.
///
/// Lookups that fail (a missing `docker`, an unreachable cluster) report the
/// resource as absent rather than aborting.
pub async fn collect_status(
    runner: &dyn CommandRunner,
    config: &DevstackConfig,
    platform: Platform,
) -> EnvironmentStatus {
    let tools = STATUS_TOOLS
        .iter()
        .map(|name| ToolStatus {
            name: name.to_string(),
            path: runner.resolve(name),
        })
        .collect();

    let network_up = network_exists(runner, &config.network_name)
        .await
        .unwrap_or(false);
    let cluster_up = cluster_exists(runner, &config.cluster_name)
        .await
        .unwrap_or(false);

    let context = config.kube_context();
    let mut services = Vec::new();
    let mut services_error = None;
    match discover_services(&config.values_dir) {
        Ok(found) => {
            for svc in found {
                let deployed = cluster_up
                    && namespace_exists(runner, &context, &svc.namespace)
                        .await
                        .unwrap_or(false);
                services.push(ServiceStatus {
                    namespace: svc.namespace,
                    values_file: svc.values_file,
                    deployed,
                });
            }
        }
        Err(e) => services_error = Some(e.to_string()),
    }

    let state = overall_state(network_up, cluster_up, &services);
    EnvironmentStatus {
        checked_at: Utc::now(),
        platform,
        state,
        tools,
        network: ResourceStatus {
            name: config.network_name.clone(),
            exists: network_up,
        },
        cluster: ResourceStatus {
            name: config.cluster_name.clone(),
            exists: cluster_up,
        },
        services,
        services_error,
    }
}

fn overall_state(network_up: bool, cluster_up: bool, services: &[ServiceStatus]) -> EnvironmentState {
    let all_deployed = services.iter().all(|s| s.deployed);
    let any_deployed = services.iter().any(|s| s.deployed);
    if network_up && cluster_up && all_deployed {
        EnvironmentState::Up
    } else if network_up || cluster_up || any_deployed {
        EnvironmentState::Partial
    } else {
        EnvironmentState::Down
    }
}

/// Run the status command and display results.
pub async fn run_status(stack: &Devstack, json_output: bool) -> i32 {
    let status = stack.status().await;
    if json_output {
        match serde_json::to_string_pretty(&status) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error rendering status: {}", e);
                return 1;
            }
        }
    } else {
        print_status_human(&status);
    }
    0
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
