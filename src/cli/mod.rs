// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI subcommands that do more than call a single [`crate::Devstack`] method.

pub mod config_cmd;
pub mod status;
pub mod status_format;

pub use config_cmd::{run_config, ConfigAction};
pub use status::{collect_status, run_status, EnvironmentState, EnvironmentStatus};
