//! Shared core types used across the provisioning pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Execution mode for a whole pipeline run.
///
/// Established once at orchestration start and read-only thereafter.
/// Simulate guarantees zero external side effects: no file writes, no
/// process spawns beyond logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Dry-run: log what would happen, touch nothing.
    Simulate,
    /// Execute commands and write files for real.
    Live,
}

impl ExecutionMode {
    pub fn is_live(self) -> bool {
        matches!(self, ExecutionMode::Live)
    }
}

/// Target cloud project identifier, supplied by the user.
///
/// The core only requires it to be non-empty; format validation is left
/// to the provisioning tool, which may reject it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> anyhow::Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            anyhow::bail!("Project ID cannot be empty");
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Names of the provisioning steps, in their required pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepName {
    CreateProject,
    EnableServices,
    GenerateLocalConfig,
    InstallDependencies,
    ProvisionSecrets,
    Deploy,
}

impl StepName {
    /// All steps in pipeline order.
    pub const ORDERED: [StepName; 6] = [
        StepName::CreateProject,
        StepName::EnableServices,
        StepName::GenerateLocalConfig,
        StepName::InstallDependencies,
        StepName::ProvisionSecrets,
        StepName::Deploy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StepName::CreateProject => "create-project",
            StepName::EnableServices => "enable-services",
            StepName::GenerateLocalConfig => "generate-local-config",
            StepName::InstallDependencies => "install-dependencies",
            StepName::ProvisionSecrets => "provision-secrets",
            StepName::Deploy => "deploy",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of exactly one provisioning step invocation.
///
/// Immutable once created; collected in order into the run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub step: StepName,
    pub succeeded: bool,
    pub output: String,
    pub error: Option<String>,
}

impl StepResult {
    pub fn ok(step: StepName, output: impl Into<String>) -> Self {
        Self {
            step,
            succeeded: true,
            output: output.into(),
            error: None,
        }
    }

    pub fn failed(step: StepName, output: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            step,
            succeeded: false,
            output: output.into(),
            error: Some(error.into()),
        }
    }
}

/// A named secret the pipeline must provision.
///
/// Each request is handled independently; one failing does not block
/// the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRequest {
    pub name: String,
}

impl SecretRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
