// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use crate::error::Result;
use crate::platform::{Installer, Tool};
use crate::runner::CommandRunner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolState {
    AlreadyPresent(PathBuf),
    Installed,
}

/// Install `tool` through `installer` unless it already resolves on `PATH`.
pub async fn ensure_tool(
    runner: &dyn CommandRunner,
    tool: Tool,
    installer: &dyn Installer,
) -> Result<ToolState> {
    if let Some(path) = runner.resolve(tool.binary_name()) {
        tracing::info!(%tool, path = %path.display(), "already installed");
        return Ok(ToolState::AlreadyPresent(path));
    }

    tracing::info!(%tool, platform = %installer.platform(), "not found, installing");
    installer.install(tool, runner).await?;

    if runner.executes() && runner.resolve(tool.binary_name()).is_none() {
        tracing::warn!(%tool, "installed but not on PATH; check the install directory");
    }
    Ok(ToolState::Installed)
}
