//! Shared test doubles for the provisioning pipeline.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use fireclass_core::check::{REQUIRED_TOOLS, ToolResolver};
use fireclass_core::exec::{CommandSpawner, SpawnOutput, SpawnRequest};
use fireclass_core::prompt::Interact;

/// Spawner that records every request and fails commands whose joined
/// argv contains a scripted pattern.
pub struct ScriptedSpawner {
    pub calls: RefCell<Vec<SpawnRequest>>,
    fail_patterns: Vec<String>,
}

impl ScriptedSpawner {
    pub fn ok() -> Self {
        Self::failing_on(&[])
    }

    pub fn failing_on(patterns: &[&str]) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Joined command lines, in invocation order.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|req| req.argv.join(" "))
            .collect()
    }
}

impl CommandSpawner for ScriptedSpawner {
    fn spawn(&self, request: &SpawnRequest) -> anyhow::Result<SpawnOutput> {
        self.calls.borrow_mut().push(request.clone());
        let line = request.argv.join(" ");
        for pattern in &self.fail_patterns {
            if line.contains(pattern) {
                return Ok(SpawnOutput {
                    success: false,
                    stdout: String::new(),
                    stderr: format!("scripted failure: {pattern}"),
                });
            }
        }
        Ok(SpawnOutput {
            success: true,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

/// Spawner that proves no process is ever spawned.
pub struct PanicSpawner;

impl CommandSpawner for PanicSpawner {
    fn spawn(&self, request: &SpawnRequest) -> anyhow::Result<SpawnOutput> {
        panic!("unexpected process spawn: {:?}", request.argv);
    }
}

/// Resolver with a fixed set of available tools.
pub struct StaticResolver(Vec<String>);

impl StaticResolver {
    pub fn with(tools: &[&str]) -> Self {
        Self(tools.iter().map(|t| t.to_string()).collect())
    }

    /// Every required tool present.
    pub fn complete() -> Self {
        Self::with(&REQUIRED_TOOLS)
    }

    /// Every required tool except one.
    pub fn without(missing: &str) -> Self {
        let tools: Vec<&str> = REQUIRED_TOOLS
            .iter()
            .copied()
            .filter(|t| *t != missing)
            .collect();
        Self::with(&tools)
    }
}

impl ToolResolver for StaticResolver {
    fn resolve(&self, name: &str) -> bool {
        self.0.iter().any(|t| t == name)
    }
}

/// Scripted interaction: fixed secret values and a fixed confirmation
/// answer, recording which secrets were prompted for.
pub struct ScriptedInteract {
    secrets: HashMap<String, String>,
    confirm: bool,
    pub prompted: RefCell<Vec<String>>,
}

impl ScriptedInteract {
    pub fn new(confirm: bool) -> Self {
        Self {
            secrets: HashMap::new(),
            confirm,
            prompted: RefCell::new(Vec::new()),
        }
    }

    pub fn with_secret(mut self, name: &str, value: &str) -> Self {
        self.secrets.insert(name.to_string(), value.to_string());
        self
    }
}

impl Interact for ScriptedInteract {
    fn prompt_secret(&self, name: &str) -> anyhow::Result<String> {
        self.prompted.borrow_mut().push(name.to_string());
        Ok(self.secrets.get(name).cloned().unwrap_or_default())
    }

    fn confirm(&self, _message: &str) -> anyhow::Result<bool> {
        Ok(self.confirm)
    }
}
