// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! devstack - local Kubernetes development environment.
//!
//! Brings up a kind cluster on a shared docker network, applies a PostgreSQL
//! manifest, waits for it to accept connections and deploys one Helm release
//! per values file. Every step is idempotent: existence checks run before any
//! creation, so re-running a command reconciles a partially built environment.
//!
//! All external work goes through a [`runner::CommandRunner`], which makes the
//! sequencing testable without docker or a cluster.

pub mod cli;
pub mod config;
pub mod deploy;
pub mod error;
pub mod platform;
pub mod provision;
pub mod readiness;
pub mod runner;
pub mod stack;
pub mod teardown;

pub use config::DevstackConfig;
pub use error::{DevstackError, Result};
pub use stack::Devstack;
