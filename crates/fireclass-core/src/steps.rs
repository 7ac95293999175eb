//! The ordered provisioning steps.
//!
//! Each step is a function of a [`StepContext`] returning one
//! [`StepResult`]. Steps convert expected failures (non-zero exits on
//! captured commands, declined prompts) into results; only unexpected
//! faults propagate as errors.

use std::path::Path;

use crate::artifact;
use crate::exec::CommandRunner;
use crate::prompt::Interact;
use crate::types::{ExecutionMode, ProjectId, SecretRequest, StepName, StepResult};

/// Region for new projects.
pub const PROJECT_LOCATION: &str = "europe-west1";
/// Firestore multi-region.
pub const FIRESTORE_LOCATION: &str = "eur3";

/// Cloud services the functions backend needs, activated independently.
pub const REQUIRED_SERVICES: [&str; 4] = [
    "secretmanager.googleapis.com",
    "cloudfunctions.googleapis.com",
    "cloudbuild.googleapis.com",
    "artifactregistry.googleapis.com",
];

/// API key secrets the functions backend reads at runtime.
pub const SECRET_NAMES: [&str; 3] = ["OPENAI_API_KEY", "CLAUDE_API_KEY", "GEMINI_API_KEY"];

/// Subdirectory holding the functions backend and its package manifest.
const FUNCTIONS_DIR: &str = "functions";
const FUNCTIONS_MANIFEST: &str = "package.json";

/// Read-only state threaded through every step.
pub struct StepContext<'a> {
    pub project_id: &'a ProjectId,
    pub mode: ExecutionMode,
    pub root: &'a Path,
    pub runner: &'a CommandRunner<'a>,
    pub prompt: &'a dyn Interact,
}

impl StepContext<'_> {
    fn id(&self) -> &str {
        self.project_id.as_str()
    }
}

/// Dispatch a step by name.
pub fn run_step(step: StepName, ctx: &StepContext<'_>) -> anyhow::Result<StepResult> {
    match step {
        StepName::CreateProject => create_project(ctx),
        StepName::EnableServices => enable_services(ctx),
        StepName::GenerateLocalConfig => generate_local_config(ctx),
        StepName::InstallDependencies => install_dependencies(ctx),
        StepName::ProvisionSecrets => provision_secrets(ctx),
        StepName::Deploy => deploy(ctx),
    }
}

/// Create the target cloud project. The only step whose failure aborts
/// the whole run in Live mode.
pub fn create_project(ctx: &StepContext<'_>) -> anyhow::Result<StepResult> {
    let location = format!("--location={PROJECT_LOCATION}");
    let outcome = ctx.runner.run(
        &[
            "firebase",
            "projects:create",
            ctx.id(),
            "--display-name",
            ctx.id(),
            &location,
        ],
        true,
    )?;

    if outcome.succeeded {
        Ok(StepResult::ok(
            StepName::CreateProject,
            format!("project '{}' created", ctx.id()),
        ))
    } else {
        Ok(StepResult::failed(
            StepName::CreateProject,
            format!("failed to create project '{}'", ctx.id()),
            outcome.output,
        ))
    }
}

/// Enable the required cloud services and activate Firestore.
///
/// Each activation is independent: one failing service is recorded and
/// the rest are still attempted.
pub fn enable_services(ctx: &StepContext<'_>) -> anyhow::Result<StepResult> {
    let mut lines = Vec::new();
    let mut failures = Vec::new();

    for service in REQUIRED_SERVICES {
        let outcome = ctx.runner.run(
            &[
                "gcloud",
                "services",
                "enable",
                service,
                "--project",
                ctx.id(),
            ],
            true,
        )?;
        if outcome.succeeded {
            lines.push(format!("enabled {service}"));
        } else {
            lines.push(format!("failed to enable {service}"));
            failures.push(format!("{service}: {}", outcome.output));
        }
    }

    let firestore_location = format!("--location={FIRESTORE_LOCATION}");
    let outcome = ctx.runner.run(
        &[
            "gcloud",
            "firestore",
            "databases",
            "create",
            &firestore_location,
            "--project",
            ctx.id(),
        ],
        true,
    )?;
    if outcome.succeeded {
        lines.push("firestore database created".to_string());
    } else {
        lines.push("failed to create firestore database".to_string());
        failures.push(format!("firestore: {}", outcome.output));
    }

    // Anonymous auth has no CLI surface; the console step stays manual.
    lines.push("note: enable Anonymous Authentication manually in the console".to_string());

    let output = lines.join("\n");
    if failures.is_empty() {
        Ok(StepResult::ok(StepName::EnableServices, output))
    } else {
        Ok(StepResult::failed(
            StepName::EnableServices,
            output,
            failures.join("\n"),
        ))
    }
}

/// Generate the local configuration artifacts and fetch the platform
/// client credentials.
pub fn generate_local_config(ctx: &StepContext<'_>) -> anyhow::Result<StepResult> {
    artifact::write(ctx.root, &artifact::project_binding(ctx.project_id), ctx.mode)?;
    artifact::write(ctx.root, &artifact::hosting_manifest(), ctx.mode)?;
    artifact::write(ctx.root, &artifact::runtime_config(ctx.project_id), ctx.mode)?;

    // Opaque credentials emitted by the platform tool itself; copied
    // verbatim and excluded from the build's minification pass.
    let credentials_path = artifact::artifact_path(ctx.root, artifact::CLIENT_CREDENTIALS_PATH);
    let credentials = credentials_path.to_string_lossy();
    let outcome = ctx.runner.run(
        &[
            "firebase",
            "apps:sdkconfig",
            "WEB",
            "--project",
            ctx.id(),
            "-o",
            credentials.as_ref(),
        ],
        true,
    )?;

    let output = format!(
        "student app URL: {}",
        artifact::student_app_url(ctx.project_id)
    );
    if outcome.succeeded {
        Ok(StepResult::ok(StepName::GenerateLocalConfig, output))
    } else {
        Ok(StepResult::failed(
            StepName::GenerateLocalConfig,
            output,
            format!("failed to fetch client credentials: {}", outcome.output),
        ))
    }
}

/// Install the functions backend dependencies, if a backend exists.
///
/// A missing package manifest is not an error; some deployments omit
/// backend functions entirely.
pub fn install_dependencies(ctx: &StepContext<'_>) -> anyhow::Result<StepResult> {
    let functions_dir = ctx.root.join(FUNCTIONS_DIR);
    if !functions_dir.join(FUNCTIONS_MANIFEST).exists() {
        return Ok(StepResult::ok(
            StepName::InstallDependencies,
            format!("no {FUNCTIONS_DIR}/{FUNCTIONS_MANIFEST} found, skipping install"),
        ));
    }

    let outcome = ctx.runner.run_in(&["npm", "install"], &functions_dir, true)?;
    if outcome.succeeded {
        Ok(StepResult::ok(
            StepName::InstallDependencies,
            "function dependencies installed",
        ))
    } else {
        Ok(StepResult::failed(
            StepName::InstallDependencies,
            "npm install failed",
            outcome.output,
        ))
    }
}

/// Provision the API key secrets, one prompt + store call per secret.
///
/// Secrets are independent: a failure on one is recorded and the next
/// is still attempted. Simulate mode never prompts; it only logs the
/// command that would run.
pub fn provision_secrets(ctx: &StepContext<'_>) -> anyhow::Result<StepResult> {
    let requests: Vec<SecretRequest> = SECRET_NAMES.iter().copied().map(SecretRequest::new).collect();
    provision_secret_requests(ctx, &requests)
}

/// Provision an explicit set of secret requests.
pub fn provision_secret_requests(
    ctx: &StepContext<'_>,
    requests: &[SecretRequest],
) -> anyhow::Result<StepResult> {
    let mut lines = Vec::new();
    let mut failures = Vec::new();

    for request in requests {
        let name = request.name.as_str();
        let argv = [
            "firebase",
            "functions:secrets:set",
            name,
            "--project",
            ctx.id(),
        ];

        if !ctx.mode.is_live() {
            // Log the would-be command; no prompt, no spawn.
            ctx.runner.run(&argv, true)?;
            lines.push(format!("would prompt for {name}"));
            continue;
        }

        let value = ctx.prompt.prompt_secret(name)?;
        if value.is_empty() {
            lines.push(format!("skipped {name}, no value provided"));
            continue;
        }

        let outcome = ctx.runner.run_with_stdin(&argv, &value, true)?;
        if outcome.succeeded {
            artifact::record_secret(ctx.root, name, ctx.mode)?;
            lines.push(format!("secret {name} set"));
        } else {
            lines.push(format!("failed to set secret {name}"));
            failures.push(format!("{name}: {}", outcome.output));
        }
    }

    let output = lines.join("\n");
    if failures.is_empty() {
        Ok(StepResult::ok(StepName::ProvisionSecrets, output))
    } else {
        Ok(StepResult::failed(
            StepName::ProvisionSecrets,
            output,
            failures.join("\n"),
        ))
    }
}

/// Run the full deployment after explicit confirmation.
pub fn deploy(ctx: &StepContext<'_>) -> anyhow::Result<StepResult> {
    if !ctx.mode.is_live() {
        return Ok(StepResult::ok(
            StepName::Deploy,
            "[simulate] would confirm and run 'firebase deploy'",
        ));
    }

    let confirmed = ctx
        .prompt
        .confirm("Are you ready to deploy the entire project?")?;
    if !confirmed {
        return Ok(StepResult::ok(StepName::Deploy, "deployment cancelled by user"));
    }

    let outcome = ctx.runner.run(&["firebase", "deploy"], true)?;
    if outcome.succeeded {
        Ok(StepResult::ok(StepName::Deploy, "project deployed"))
    } else {
        Ok(StepResult::failed(
            StepName::Deploy,
            "deploy failed",
            outcome.output,
        ))
    }
}
