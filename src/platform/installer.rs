// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Platform-specific installers for `kind` and `helm`.
//!
//! One installer is chosen at startup from the detected [`Platform`]:
//!
//! | tool | macOS | Linux | WSL |
//! |------|-------|-------|-----|
//! | kind | release binary (darwin) | release binary | release binary |
//! | helm | Homebrew | `get-helm-3` script | release tarball |
//!
//! kind binaries are checked against the published `.sha256sum` before they
//! are copied into the install directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use super::checksum::verify_sha256;
use super::{Arch, Platform};
use crate::config::DevstackConfig;
use crate::error::Result;
use crate::runner::{run_checked, CommandRunner, Invocation};

const KIND_DOWNLOAD_BASE: &str = "https://kind.sigs.k8s.io/dl";
const HELM_DOWNLOAD_BASE: &str = "https://get.helm.sh";
const HELM_INSTALL_SCRIPT: &str =
    "https://raw.githubusercontent.com/helm/helm/main/scripts/get-helm-3";

/// Tools devstack knows how to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Kind,
    Helm,
}

impl Tool {
    pub fn binary_name(&self) -> &'static str {
        match self {
            Self::Kind => "kind",
            Self::Helm => "helm",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.binary_name())
    }
}

/// Inputs shared by all installers.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallSettings {
    pub install_dir: PathBuf,
    pub kind_version: String,
    pub helm_version: String,
    pub arch: Arch,
    /// Prefix privileged writes with `sudo`.
    pub elevate: bool,
}

impl InstallSettings {
    pub fn from_config(config: &DevstackConfig, arch: Arch, elevate: bool) -> Self {
        Self {
            install_dir: config.install_dir.clone(),
            kind_version: config.kind_version.clone(),
            helm_version: config.helm_version.clone(),
            arch,
            elevate,
        }
    }

    pub fn target(&self, tool: Tool) -> PathBuf {
        self.install_dir.join(tool.binary_name())
    }
}

#[async_trait]
pub trait Installer: Send + Sync {
    fn platform(&self) -> Platform;

    /// Install `tool` unconditionally. Failures are fatal and not rolled back.
    async fn install(&self, tool: Tool, runner: &dyn CommandRunner) -> Result<()>;
}

/// Select the installer for `platform`.
pub fn installer_for(platform: Platform, settings: InstallSettings) -> Box<dyn Installer> {
    match platform {
        Platform::MacOs => Box::new(MacOsInstaller { settings }),
        Platform::Linux => Box::new(LinuxInstaller { settings }),
        Platform::Wsl => Box::new(WslInstaller { settings }),
    }
}

pub struct MacOsInstaller {
    settings: InstallSettings,
}

pub struct LinuxInstaller {
    settings: InstallSettings,
}

pub struct WslInstaller {
    settings: InstallSettings,
}

#[async_trait]
impl Installer for MacOsInstaller {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    async fn install(&self, tool: Tool, runner: &dyn CommandRunner) -> Result<()> {
        match tool {
            Tool::Kind => install_kind_release(runner, &self.settings, Platform::MacOs).await,
            Tool::Helm => {
                tracing::info!("installing helm with Homebrew");
                run_checked(runner, &Invocation::mutation("brew").args(["install", "helm"]))
                    .await
                    .map(|_| ())
            }
        }
    }
}

#[async_trait]
impl Installer for LinuxInstaller {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    async fn install(&self, tool: Tool, runner: &dyn CommandRunner) -> Result<()> {
        match tool {
            Tool::Kind => install_kind_release(runner, &self.settings, Platform::Linux).await,
            Tool::Helm => {
                let s = &self.settings;
                tracing::info!(version = %s.helm_version, "installing helm with get-helm-3");
                let pipeline = format!(
                    "curl -fsSL {} | HELM_INSTALL_DIR={} USE_SUDO={} bash -s -- --version {}",
                    HELM_INSTALL_SCRIPT,
                    s.install_dir.display(),
                    s.elevate,
                    s.helm_version
                );
                run_checked(runner, &Invocation::mutation("sh").args(["-c", &pipeline]))
                    .await
                    .map(|_| ())
            }
        }
    }
}

#[async_trait]
impl Installer for WslInstaller {
    fn platform(&self) -> Platform {
        Platform::Wsl
    }

    async fn install(&self, tool: Tool, runner: &dyn CommandRunner) -> Result<()> {
        match tool {
            Tool::Kind => install_kind_release(runner, &self.settings, Platform::Wsl).await,
            Tool::Helm => install_helm_tarball(runner, &self.settings).await,
        }
    }
}

/// Release asset name, e.g. `kind-linux-amd64`.
pub fn kind_asset(platform: Platform, arch: Arch) -> String {
    format!("kind-{}-{}", platform.asset_os(), arch.as_str())
}

pub fn kind_download_url(version: &str, asset: &str) -> String {
    format!("{}/{}/{}", KIND_DOWNLOAD_BASE, version, asset)
}

pub fn helm_tarball_url(version: &str, arch: Arch) -> String {
    format!(
        "{}/helm-{}-linux-{}.tar.gz",
        HELM_DOWNLOAD_BASE,
        version,
        arch.as_str()
    )
}

async fn install_kind_release(
    runner: &dyn CommandRunner,
    settings: &InstallSettings,
    platform: Platform,
) -> Result<()> {
    let asset = kind_asset(platform, settings.arch);
    let url = kind_download_url(&settings.kind_version, &asset);
    tracing::info!(%url, "downloading kind");

    let scratch = tempfile::tempdir()?;
    let download = scratch.path().join("kind");
    run_checked(runner, &download_to(&url, &download)).await?;

    if runner.executes() {
        let sums = run_checked(
            runner,
            &Invocation::query("curl").args(["-fsSL", &format!("{}.sha256sum", url)]),
        )
        .await?;
        verify_sha256(&download, &sums.stdout, &asset)?;
    }

    install_binary(runner, settings, &download, Tool::Kind).await
}

async fn install_helm_tarball(runner: &dyn CommandRunner, settings: &InstallSettings) -> Result<()> {
    let url = helm_tarball_url(&settings.helm_version, settings.arch);
    tracing::info!(%url, "downloading helm release tarball");

    let scratch = tempfile::tempdir()?;
    let archive = scratch.path().join("helm.tar.gz");
    run_checked(runner, &download_to(&url, &archive)).await?;
    run_checked(
        runner,
        &Invocation::mutation("tar")
            .args(["-xzf"])
            .arg(path_arg(&archive))
            .arg("-C")
            .arg(path_arg(scratch.path())),
    )
    .await?;

    let extracted = scratch
        .path()
        .join(format!("linux-{}", settings.arch.as_str()))
        .join("helm");
    install_binary(runner, settings, &extracted, Tool::Helm).await
}

fn download_to(url: &str, dest: &Path) -> Invocation {
    Invocation::mutation("curl")
        .args(["-fsSL", "-o"])
        .arg(path_arg(dest))
        .arg(url)
}

async fn install_binary(
    runner: &dyn CommandRunner,
    settings: &InstallSettings,
    source: &Path,
    tool: Tool,
) -> Result<()> {
    let target = settings.target(tool);
    tracing::info!(%tool, dest = %target.display(), "installing binary");
    let install = Invocation::mutation("install")
        .args(["-m", "0755"])
        .arg(path_arg(source))
        .arg(path_arg(&target))
        .elevated(settings.elevate);
    run_checked(runner, &install).await.map(|_| ())
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
#[path = "installer_tests.rs"]
mod tests;
