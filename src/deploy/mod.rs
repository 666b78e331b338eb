// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Workload deployment: the database manifest and Helm-deployed services.
//!
//! All `kubectl` and `helm` calls are pinned to the cluster's kind context so
//! whatever context is current in the user's kubeconfig is never touched.

pub mod database;
pub mod services;

use crate::runner::Invocation;

pub use database::{deploy_database, remove_database, reset_database};
pub use services::{
    deploy_services, discover_services, ensure_namespace, namespace_exists, ServiceDeployment,
};

/// `kubectl --context <context> ...`
pub fn kubectl(context: &str, mutation: bool) -> Invocation {
    let base = if mutation {
        Invocation::mutation("kubectl")
    } else {
        Invocation::query("kubectl")
    };
    base.args(["--context", context])
}

#[cfg(test)]
#[path = "deploy_tests.rs"]
mod tests;
