// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! External command execution.
//!
//! Every call to `kind`, `docker`, `kubectl`, `helm` or an installer goes
//! through a [`CommandRunner`]. Invocations are tagged as read-only queries
//! or mutations so a dry run can still inspect live state.

pub mod dry_run;
pub mod process;
pub mod scripted;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{DevstackError, Result};

pub use dry_run::DryRunRunner;
pub use process::ProcessRunner;
pub use scripted::ScriptedRunner;

/// Whether an invocation changes external state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    Query,
    Mutation,
}

/// A single external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub kind: InvocationKind,
}

impl Invocation {
    pub fn query(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            kind: InvocationKind::Query,
        }
    }

    pub fn mutation(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            kind: InvocationKind::Mutation,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Prefix with `sudo` when `elevate` is set.
    pub fn elevated(self, elevate: bool) -> Self {
        if !elevate {
            return self;
        }
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
            kind: self.kind,
        }
    }

    pub fn is_mutation(&self) -> bool {
        self.kind == InvocationKind::Mutation
    }

    /// Space-joined command line for logs and error messages.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion.
    ///
    /// A non-zero exit is reported through [`CommandOutput::status`]; `Err`
    /// means the program could not be started at all.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;

    /// Locate `program` on the search path.
    fn resolve(&self, program: &str) -> Option<PathBuf>;

    /// Whether mutations really execute. False for dry and scripted runs.
    fn executes(&self) -> bool {
        true
    }
}

/// Shared runners, so a caller can keep inspecting a runner it handed off.
#[async_trait]
impl<R: CommandRunner + ?Sized> CommandRunner for Arc<R> {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        (**self).run(invocation).await
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        (**self).resolve(program)
    }

    fn executes(&self) -> bool {
        (**self).executes()
    }
}

/// Run and turn a non-zero exit into [`DevstackError::ToolFailed`].
pub async fn run_checked(
    runner: &dyn CommandRunner,
    invocation: &Invocation,
) -> Result<CommandOutput> {
    let output = runner.run(invocation).await?;
    if output.success() {
        Ok(output)
    } else {
        Err(DevstackError::tool_failed(invocation, &output))
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
