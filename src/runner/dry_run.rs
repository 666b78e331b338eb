// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! `--dry-run` support.

use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CommandOutput, CommandRunner, Invocation};
use crate::error::Result;

/// Runs queries for real and prints mutations instead of executing them.
///
/// Existence checks therefore reflect the live host, and the printed plan is
/// exactly what a real run would do next.
pub struct DryRunRunner<R> {
    inner: R,
    planned: Mutex<Vec<Invocation>>,
}

impl<R: CommandRunner> DryRunRunner<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            planned: Mutex::new(Vec::new()),
        }
    }

    /// Mutations skipped so far, in order.
    pub fn planned(&self) -> Vec<Invocation> {
        self.planned.lock().clone()
    }
}

#[async_trait]
impl<R: CommandRunner> CommandRunner for DryRunRunner<R> {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        if !invocation.is_mutation() {
            return self.inner.run(invocation).await;
        }
        println!("[dry-run] {}", invocation.command_line());
        self.planned.lock().push(invocation.clone());
        Ok(CommandOutput::ok(""))
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.inner.resolve(program)
    }

    fn executes(&self) -> bool {
        false
    }
}
