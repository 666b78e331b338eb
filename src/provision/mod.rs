// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Idempotent provisioning of tools, the shared network and the cluster.
//!
//! Every `ensure_*` operation checks for existence first and only creates
//! what is missing, so repeated calls converge on the same state.

pub mod cluster;
pub mod network;
pub mod tool;

use serde::Serialize;

pub use cluster::{
    cluster_exists, control_plane_container, ensure_cluster, render_template, ClusterSpec,
    CLUSTER_NAME_PLACEHOLDER,
};
pub use network::{ensure_network, network_exists};
pub use tool::{ensure_tool, ToolState};

/// Result of an `ensure_*` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provisioned {
    AlreadyPresent,
    Created,
}

impl std::fmt::Display for Provisioned {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyPresent => write!(f, "already present"),
            Self::Created => write!(f, "created"),
        }
    }
}

#[cfg(test)]
#[path = "provision_tests.rs"]
mod tests;
