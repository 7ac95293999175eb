//! Pipeline orchestration.
//!
//! Drives the provisioning steps in their fixed order, gated by the
//! prerequisite tool check. The design favors visibility over early
//! termination: every attempted step lands in the report, and only the
//! two true hard dependencies abort a run (missing tools, and project
//! creation failure in Live mode).

use std::path::Path;

use crate::check::{self, ToolResolver, check_tools};
use crate::exec::{CommandRunner, CommandSpawner};
use crate::prompt::Interact;
use crate::steps::{self, StepContext};
use crate::types::{ExecutionMode, ProjectId, StepName, StepResult};

/// Orchestrator state, advanced strictly forward during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    NotStarted,
    DependenciesChecked,
    Provisioning(usize),
    Completed,
    Aborted,
}

/// Why a run was aborted before completion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbortReason {
    #[error("missing prerequisite tools")]
    MissingTools,
    #[error("project creation failed: {0}")]
    ProjectCreateFailed(String),
}

/// Full record of one pipeline run.
#[derive(Debug)]
pub struct RunReport {
    pub state: PipelineState,
    pub steps: Vec<StepResult>,
    pub abort: Option<AbortReason>,
}

impl RunReport {
    pub fn all_succeeded(&self) -> bool {
        self.abort.is_none() && self.steps.iter().all(|s| s.succeeded)
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|s| !s.succeeded)
    }

    fn aborted(steps: Vec<StepResult>, reason: AbortReason) -> Self {
        Self {
            state: PipelineState::Aborted,
            steps,
            abort: Some(reason),
        }
    }
}

/// The provisioning orchestrator.
///
/// Holds the external capabilities (process spawning, tool resolution,
/// interactive prompting) and threads the read-only mode and project id
/// through every step.
pub struct Pipeline<'a> {
    mode: ExecutionMode,
    root: &'a Path,
    spawner: &'a dyn CommandSpawner,
    resolver: &'a dyn ToolResolver,
    prompt: &'a dyn Interact,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        mode: ExecutionMode,
        root: &'a Path,
        spawner: &'a dyn CommandSpawner,
        resolver: &'a dyn ToolResolver,
        prompt: &'a dyn Interact,
    ) -> Self {
        Self {
            mode,
            root,
            spawner,
            resolver,
            prompt,
        }
    }

    /// Run the full pipeline for a project.
    ///
    /// Returns a report for both completed and aborted runs; an `Err`
    /// only signals an unexpected fault (no retry semantics exist for
    /// those).
    pub fn run(&self, project_id: &ProjectId) -> anyhow::Result<RunReport> {
        let mut state = PipelineState::NotStarted;
        tracing::debug!(?state, mode = ?self.mode, project = %project_id, "pipeline starting");

        if !check_tools(self.resolver, &check::REQUIRED_TOOLS) {
            tracing::error!("prerequisite check failed, aborting before provisioning");
            return Ok(RunReport::aborted(Vec::new(), AbortReason::MissingTools));
        }
        state = PipelineState::DependenciesChecked;
        tracing::debug!(?state, "prerequisites resolved");

        let runner = CommandRunner::new(self.mode, self.spawner);
        let ctx = StepContext {
            project_id,
            mode: self.mode,
            root: self.root,
            runner: &runner,
            prompt: self.prompt,
        };

        let mut results = Vec::with_capacity(StepName::ORDERED.len());
        for (index, step) in StepName::ORDERED.into_iter().enumerate() {
            state = PipelineState::Provisioning(index);
            tracing::info!(?state, step = %step, "running step");

            let result = steps::run_step(step, &ctx)?;
            let succeeded = result.succeeded;
            let error = result.error.clone();
            results.push(result);

            // Every later step needs the project to exist; nothing else
            // is fatal to the run.
            if step == StepName::CreateProject && !succeeded && self.mode.is_live() {
                tracing::error!("project creation failed in live mode, aborting");
                return Ok(RunReport::aborted(
                    results,
                    AbortReason::ProjectCreateFailed(error.unwrap_or_default()),
                ));
            }
            if !succeeded {
                tracing::warn!(step = %step, "step failed, continuing");
            }
        }

        tracing::info!("pipeline completed");
        Ok(RunReport {
            state: PipelineState::Completed,
            steps: results,
            abort: None,
        })
    }
}
