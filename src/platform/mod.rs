// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Host platform detection and tool installers.

pub mod checksum;
pub mod installer;

use serde::Serialize;

pub use installer::{installer_for, InstallSettings, Installer, Tool};

/// Host variants with distinct installation paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    MacOs,
    Linux,
    /// Linux under the Windows Subsystem for Linux.
    Wsl,
}

impl Platform {
    /// Detect the current host. Anything unrecognised is treated as Linux.
    pub fn detect() -> Self {
        let kernel_release = std::fs::read_to_string("/proc/sys/kernel/osrelease").ok();
        let wsl_env = std::env::var_os("WSL_DISTRO_NAME").is_some();
        Self::from_parts(std::env::consts::OS, kernel_release.as_deref(), wsl_env)
    }

    pub fn from_parts(os: &str, kernel_release: Option<&str>, wsl_env: bool) -> Self {
        if os == "macos" {
            return Self::MacOs;
        }
        let microsoft_kernel = kernel_release
            .map(|r| r.to_ascii_lowercase().contains("microsoft"))
            .unwrap_or(false);
        if os == "linux" && (microsoft_kernel || wsl_env) {
            Self::Wsl
        } else {
            Self::Linux
        }
    }

    /// OS component of release asset names.
    pub fn asset_os(&self) -> &'static str {
        match self {
            Self::MacOs => "darwin",
            Self::Linux | Self::Wsl => "linux",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MacOs => write!(f, "macos"),
            Self::Linux => write!(f, "linux"),
            Self::Wsl => write!(f, "wsl"),
        }
    }
}

/// CPU architecture for release assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Arch {
    pub fn detect() -> Self {
        Self::from_target(std::env::consts::ARCH)
    }

    pub fn from_target(arch: &str) -> Self {
        match arch {
            "aarch64" | "arm64" => Self::Arm64,
            _ => Self::Amd64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
        }
    }
}

/// Whether writes to system locations need `sudo`.
#[cfg(unix)]
pub fn needs_elevation() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() != 0 }
}

#[cfg(not(unix))]
pub fn needs_elevation() -> bool {
    false
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
