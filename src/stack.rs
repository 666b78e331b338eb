// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! One method per CLI command, composing the provisioning steps.

use tokio_util::sync::CancellationToken;

use crate::cli::status::{collect_status, EnvironmentStatus};
use crate::config::DevstackConfig;
use crate::deploy::{self, ServiceDeployment};
use crate::error::Result;
use crate::platform::{self, installer_for, Arch, InstallSettings, Installer, Platform, Tool};
use crate::provision::{self, ClusterSpec, Provisioned, ToolState};
use crate::readiness::{wait_ready, ReadinessProbe, WaitPolicy};
use crate::runner::CommandRunner;
use crate::teardown::{teardown, TeardownReport};

/// A configured environment plus the runner and installer that act on it.
pub struct Devstack {
    config: DevstackConfig,
    runner: Box<dyn CommandRunner>,
    installer: Box<dyn Installer>,
    platform: Platform,
    elevate: bool,
    cancel: CancellationToken,
}

impl Devstack {
    pub fn new(
        config: DevstackConfig,
        runner: Box<dyn CommandRunner>,
        installer: Box<dyn Installer>,
        elevate: bool,
    ) -> Self {
        let platform = installer.platform();
        Self {
            config,
            runner,
            installer,
            platform,
            elevate,
            cancel: CancellationToken::new(),
        }
    }

    /// Detect platform, architecture and privilege level of this host.
    pub fn for_host(config: DevstackConfig, runner: Box<dyn CommandRunner>) -> Self {
        let platform = Platform::detect();
        let elevate = platform::needs_elevation();
        let settings = InstallSettings::from_config(&config, Arch::detect(), elevate);
        tracing::debug!(%platform, elevate, "host detected");
        Self::new(config, runner, installer_for(platform, settings), elevate)
    }

    pub fn config(&self) -> &DevstackConfig {
        &self.config
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Token that interrupts readiness waits when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    pub async fn check_kind(&self) -> Result<ToolState> {
        provision::ensure_tool(self.runner(), Tool::Kind, self.installer.as_ref()).await
    }

    pub async fn install_kind(&self) -> Result<()> {
        self.installer.install(Tool::Kind, self.runner()).await
    }

    pub async fn check_helm(&self) -> Result<ToolState> {
        provision::ensure_tool(self.runner(), Tool::Helm, self.installer.as_ref()).await
    }

    pub async fn install_helm(&self) -> Result<()> {
        self.installer.install(Tool::Helm, self.runner()).await
    }

    pub async fn create_network(&self) -> Result<Provisioned> {
        provision::ensure_network(self.runner(), &self.config.network_name).await
    }

    /// kind, network, then cluster.
    pub async fn create_cluster(&self) -> Result<Provisioned> {
        self.check_kind().await?;
        self.create_network().await?;
        let spec = ClusterSpec {
            name: self.config.cluster_name.clone(),
            template: self.config.cluster_template.clone(),
            network: self.config.network_name.clone(),
        };
        provision::ensure_cluster(self.runner(), &spec).await
    }

    /// Apply the database manifest and wait until it accepts connections.
    pub async fn database(&self) -> Result<u32> {
        deploy::deploy_database(
            self.runner(),
            &self.config.kube_context(),
            &self.config.database_manifest,
        )
        .await?;
        self.wait_for_postgres().await
    }

    pub async fn reset_database(&self) -> Result<u32> {
        deploy::reset_database(
            self.runner(),
            &self.config.kube_context(),
            &self.config.database_manifest,
        )
        .await?;
        self.wait_for_postgres().await
    }

    pub async fn wait_for_postgres(&self) -> Result<u32> {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let probe = ReadinessProbe::postgres(&self.config, &suffix[..8]);
        wait_ready(
            self.runner(),
            &probe,
            WaitPolicy::from_config(&self.config),
            &self.cancel,
        )
        .await
    }

    pub async fn microservices(&self) -> Result<Vec<ServiceDeployment>> {
        self.check_helm().await?;
        deploy::deploy_services(
            self.runner(),
            &self.config.kube_context(),
            &self.config.values_dir,
            &self.config.chart_dir,
        )
        .await
    }

    /// cluster → database → microservices, stopping at the first failure.
    pub async fn start(&self) -> Result<Vec<ServiceDeployment>> {
        self.create_cluster().await?;
        self.database().await?;
        self.microservices().await
    }

    pub async fn clean(&self) -> TeardownReport {
        teardown(self.runner(), &self.config, self.elevate).await
    }

    pub async fn status(&self) -> EnvironmentStatus {
        collect_status(self.runner(), &self.config, self.platform).await
    }
}
