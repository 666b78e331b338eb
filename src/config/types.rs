// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration types and defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_install_dir, validate_path, validate_resource_name, validate_shell_safe,
    validate_version, ValidationError,
};

/// Environment definition shared by every provisioning step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DevstackConfig {
    /// kind cluster name.
    pub cluster_name: String,
    /// Docker network the control-plane container joins.
    pub network_name: String,
    /// kind config template containing `{{CLUSTER_NAME}}`.
    pub cluster_template: PathBuf,
    /// Static PostgreSQL manifest.
    pub database_manifest: PathBuf,
    /// Directory of per-service Helm values files.
    pub values_dir: PathBuf,
    /// Shared Helm chart for every service.
    pub chart_dir: PathBuf,
    /// Where installed tool binaries are placed.
    pub install_dir: PathBuf,
    pub kind_version: String,
    pub helm_version: String,
    pub readiness: ReadinessConfig,
}

impl Default for DevstackConfig {
    fn default() -> Self {
        Self {
            cluster_name: "devstack".to_string(),
            network_name: "devstack-net".to_string(),
            cluster_template: PathBuf::from("deploy/kind-cluster.yaml.tpl"),
            database_manifest: PathBuf::from("deploy/postgres.yaml"),
            values_dir: PathBuf::from("deploy/values"),
            chart_dir: PathBuf::from("deploy/chart"),
            install_dir: PathBuf::from("/usr/local/bin"),
            kind_version: "v0.24.0".to_string(),
            helm_version: "v3.16.2".to_string(),
            readiness: ReadinessConfig::default(),
        }
    }
}

/// PostgreSQL readiness probe settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadinessConfig {
    /// Failed probes tolerated before giving up.
    pub timeout_attempts: u32,
    /// Fixed pause between probes.
    pub interval_secs: u64,
    pub host: String,
    pub port: u16,
    /// Image providing `pg_isready`.
    pub image: String,
    /// Namespace the throwaway probe pod runs in.
    pub namespace: String,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            timeout_attempts: 60,
            interval_secs: 1,
            host: "postgres".to_string(),
            port: 5432,
            image: "postgres:16-alpine".to_string(),
            namespace: "default".to_string(),
        }
    }
}

impl ReadinessConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl DevstackConfig {
    /// kubectl context kind registers for the cluster.
    pub fn kube_context(&self) -> String {
        format!("kind-{}", self.cluster_name)
    }

    /// Validate all fields.
    ///
    /// # Errors
    /// Returns a `ValidationError` for the first field that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_resource_name(&self.cluster_name, "cluster_name")?;
        validate_resource_name(&self.network_name, "network_name")?;
        validate_path(&self.cluster_template, "cluster_template")?;
        validate_path(&self.database_manifest, "database_manifest")?;
        validate_path(&self.values_dir, "values_dir")?;
        validate_path(&self.chart_dir, "chart_dir")?;
        validate_install_dir(&self.install_dir)?;
        validate_version(&self.kind_version, "kind_version")?;
        validate_version(&self.helm_version, "helm_version")?;
        self.readiness.validate()
    }
}

/// Upper bound on `readiness.timeout_attempts`; a day of one-second probes.
pub const MAX_TIMEOUT_ATTEMPTS: u32 = 86_400;

impl ReadinessConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_attempts > MAX_TIMEOUT_ATTEMPTS {
            return Err(ValidationError::OutOfRange {
                field: "readiness.timeout_attempts".to_string(),
                reason: format!("must be at most {}", MAX_TIMEOUT_ATTEMPTS),
            });
        }
        if self.interval_secs == 0 {
            return Err(ValidationError::OutOfRange {
                field: "readiness.interval_secs".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.port == 0 {
            return Err(ValidationError::OutOfRange {
                field: "readiness.port".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        validate_resource_name(&self.namespace, "readiness.namespace")?;
        if self.host.is_empty() {
            return Err(ValidationError::EmptyField("readiness.host".to_string()));
        }
        validate_shell_safe(&self.host, "readiness.host")?;
        if self.image.is_empty() {
            return Err(ValidationError::EmptyField("readiness.image".to_string()));
        }
        validate_shell_safe(&self.image, "readiness.image")
    }
}
