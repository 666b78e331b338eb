// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scripted runner for exercising provisioning logic without external tools.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CommandOutput, CommandRunner, Invocation};
use crate::error::{DevstackError, Result};

struct Rule {
    prefix: String,
    responses: VecDeque<CommandOutput>,
}

/// Records every invocation and answers from prefix-matched rules.
///
/// Rules match on the start of [`Invocation::command_line`]; the most
/// recently added matching rule wins. A rule with several responses hands
/// them out in order and repeats the last one. Unmatched invocations
/// succeed with empty output. Programs not marked with
/// [`ScriptedRunner::with_tool`] do not resolve on the search path.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Invocation>>,
    tools: Mutex<HashSet<String>>,
    missing: Mutex<HashSet<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every matching invocation with `output`.
    pub fn respond(self, prefix: &str, output: CommandOutput) -> Self {
        self.respond_sequence(prefix, vec![output])
    }

    /// Answer matching invocations with `outputs` in order.
    pub fn respond_sequence(self, prefix: &str, outputs: Vec<CommandOutput>) -> Self {
        self.rules.lock().push(Rule {
            prefix: prefix.to_string(),
            responses: outputs.into(),
        });
        self
    }

    /// Make `program` resolvable at `/usr/local/bin/<program>`.
    pub fn with_tool(self, program: &str) -> Self {
        self.tools.lock().insert(program.to_string());
        self
    }

    /// Make spawning `program` fail as if it were not installed.
    pub fn without_program(self, program: &str) -> Self {
        self.missing.lock().insert(program.to_string());
        self
    }

    /// Every invocation seen, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }

    /// Mutating invocations seen, in order.
    pub fn mutations(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .iter()
            .filter(|i| i.is_mutation())
            .cloned()
            .collect()
    }

    /// Number of invocations whose command line starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|i| i.command_line().starts_with(prefix))
            .count()
    }

    fn answer(&self, line: &str) -> CommandOutput {
        let mut rules = self.rules.lock();
        let Some(rule) = rules.iter_mut().rev().find(|r| line.starts_with(&r.prefix)) else {
            return CommandOutput::ok("");
        };
        if rule.responses.len() > 1 {
            rule.responses.pop_front().unwrap_or_default()
        } else {
            rule.responses.front().cloned().unwrap_or_default()
        }
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.calls.lock().push(invocation.clone());
        if self.missing.lock().contains(&invocation.program) {
            return Err(DevstackError::Spawn {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }
        Ok(self.answer(&invocation.command_line()))
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.tools
            .lock()
            .contains(program)
            .then(|| PathBuf::from("/usr/local/bin").join(program))
    }

    fn executes(&self) -> bool {
        false
    }
}
