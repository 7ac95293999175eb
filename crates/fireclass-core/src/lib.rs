//! fireClass Setup Core Library
//!
//! Provides the provisioning pipeline for the fireClass classroom
//! application: dependency checking, config artifact generation, the
//! ordered provisioning steps, and the orchestrator that drives them.
//!
//! Simulation is the default execution mode everywhere; real side
//! effects require an explicit opt-in to [`types::ExecutionMode::Live`].

pub mod artifact;
pub mod backup;
pub mod check;
pub mod exec;
pub mod health;
pub mod pipeline;
pub mod prompt;
pub mod steps;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::artifact::ConfigArtifact;
    pub use crate::check::{PathResolver, ToolResolver, check_tools};
    pub use crate::exec::{CommandRunner, CommandSpawner, SystemSpawner};
    pub use crate::pipeline::{AbortReason, Pipeline, PipelineState, RunReport};
    pub use crate::prompt::Interact;
    pub use crate::types::{ExecutionMode, ProjectId, SecretRequest, StepName, StepResult};
}
