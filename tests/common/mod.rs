// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use devstack::platform::{installer_for, Arch, InstallSettings, Platform};
use devstack::runner::{CommandRunner, ScriptedRunner};
use devstack::{Devstack, DevstackConfig};
use tempfile::TempDir;

pub const TEMPLATE: &str =
    "kind: Cluster\napiVersion: kind.x-k8s.io/v1alpha4\nname: {{CLUSTER_NAME}}\n";

/// A project directory with a cluster template and one values file per
/// entry in `services`.
pub fn project(services: &[&str]) -> (TempDir, DevstackConfig) {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("kind-cluster.yaml.tpl");
    std::fs::write(&template, TEMPLATE).unwrap();
    let values = dir.path().join("values");
    std::fs::create_dir(&values).unwrap();
    for svc in services {
        std::fs::write(values.join(format!("{}.yaml", svc)), "replicaCount: 1\n").unwrap();
    }

    let config = DevstackConfig {
        cluster_template: template,
        database_manifest: dir.path().join("postgres.yaml"),
        values_dir: values,
        chart_dir: dir.path().join("chart"),
        install_dir: dir.path().join("bin"),
        ..Default::default()
    };
    (dir, config)
}

pub fn stack(config: DevstackConfig, runner: impl CommandRunner + 'static) -> Devstack {
    let settings = InstallSettings::from_config(&config, Arch::Amd64, false);
    Devstack::new(
        config,
        Box::new(runner),
        installer_for(Platform::Linux, settings),
        false,
    )
}

pub fn scripted_stack(config: DevstackConfig, runner: &Arc<ScriptedRunner>) -> Devstack {
    stack(config, Arc::clone(runner))
}

/// Command lines of every mutation, in order.
pub fn mutation_lines(runner: &ScriptedRunner) -> Vec<String> {
    runner.mutations().iter().map(|m| m.command_line()).collect()
}

/// Index of the first mutation starting with `prefix`.
pub fn position(lines: &[String], prefix: &str) -> usize {
    lines
        .iter()
        .position(|l| l.starts_with(prefix))
        .unwrap_or_else(|| panic!("no mutation starting with {:?} in {:#?}", prefix, lines))
}
