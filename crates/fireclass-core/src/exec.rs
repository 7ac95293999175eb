//! External command execution.
//!
//! Every provisioning step funnels its external-tool invocations through
//! [`CommandRunner`], which owns the mode policy:
//!
//! - Simulate: the command line is logged but never spawned, and the
//!   call reports success unconditionally so the rest of the pipeline
//!   can be exercised without real infrastructure.
//! - Live with `capture = false`: a failure is fatal and propagates as
//!   an error, signalling "cannot proceed without this side effect".
//! - Live with `capture = true`: a non-zero exit comes back as a
//!   non-succeeded [`RunOutcome`] carrying stderr, for the caller to
//!   classify as recoverable or not.
//!
//! The actual process spawn sits behind [`CommandSpawner`] so tests can
//! substitute scripted doubles.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context;

use crate::types::ExecutionMode;

/// Output placeholder returned for every simulated command.
pub const SIMULATED_OUTPUT: &str = "simulated_output";

/// A single process invocation request.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub argv: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub stdin: Option<String>,
}

/// Captured result of a finished process.
#[derive(Debug, Clone)]
pub struct SpawnOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Capability to spawn an external process and wait for it.
pub trait CommandSpawner {
    fn spawn(&self, request: &SpawnRequest) -> anyhow::Result<SpawnOutput>;
}

/// Real spawner backed by `std::process::Command`.
#[derive(Debug, Default)]
pub struct SystemSpawner;

impl CommandSpawner for SystemSpawner {
    fn spawn(&self, request: &SpawnRequest) -> anyhow::Result<SpawnOutput> {
        let (program, args) = request
            .argv
            .split_first()
            .context("Cannot spawn an empty command line")?;

        let mut command = Command::new(program);
        command.args(args);
        if let Some(cwd) = &request.cwd {
            command.current_dir(cwd);
        }

        let output = if let Some(payload) = &request.stdin {
            command.stdin(Stdio::piped());
            command.stdout(Stdio::piped());
            command.stderr(Stdio::piped());
            let mut child = command
                .spawn()
                .with_context(|| format!("Failed to spawn command: {program}"))?;
            child
                .stdin
                .take()
                .context("Child process has no stdin handle")?
                .write_all(payload.as_bytes())
                .context("Failed to write to child stdin")?;
            child
                .wait_with_output()
                .with_context(|| format!("Failed to wait for command: {program}"))?
        } else {
            command
                .output()
                .with_context(|| format!("Failed to spawn command: {program}"))?
        };

        Ok(SpawnOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Result of one [`CommandRunner::run`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub succeeded: bool,
    pub output: String,
}

impl RunOutcome {
    fn simulated() -> Self {
        Self {
            succeeded: true,
            output: SIMULATED_OUTPUT.to_string(),
        }
    }
}

/// Mode-aware command execution service shared by all steps.
pub struct CommandRunner<'a> {
    mode: ExecutionMode,
    spawner: &'a dyn CommandSpawner,
}

impl<'a> CommandRunner<'a> {
    pub fn new(mode: ExecutionMode, spawner: &'a dyn CommandSpawner) -> Self {
        Self { mode, spawner }
    }

    /// Run a command in the current directory.
    pub fn run(&self, argv: &[&str], capture: bool) -> anyhow::Result<RunOutcome> {
        self.dispatch(argv, None, None, capture)
    }

    /// Run a command with an explicit working directory.
    pub fn run_in(&self, argv: &[&str], cwd: &Path, capture: bool) -> anyhow::Result<RunOutcome> {
        self.dispatch(argv, Some(cwd), None, capture)
    }

    /// Run a command with a payload piped to its stdin.
    ///
    /// The payload never appears in the trace line.
    pub fn run_with_stdin(
        &self,
        argv: &[&str],
        stdin: &str,
        capture: bool,
    ) -> anyhow::Result<RunOutcome> {
        self.dispatch(argv, None, Some(stdin), capture)
    }

    fn dispatch(
        &self,
        argv: &[&str],
        cwd: Option<&Path>,
        stdin: Option<&str>,
        capture: bool,
    ) -> anyhow::Result<RunOutcome> {
        let command_line = argv.join(" ");
        // The trace line is the sole audit trail; emitted in every mode.
        tracing::info!(command = %command_line, "executing");

        if !self.mode.is_live() {
            tracing::info!("[simulate] command not executed");
            return Ok(RunOutcome::simulated());
        }

        let request = SpawnRequest {
            argv: argv.iter().map(|s| s.to_string()).collect(),
            cwd: cwd.map(Path::to_path_buf),
            stdin: stdin.map(str::to_string),
        };

        if capture {
            // Caller decides whether a failure is recoverable.
            let output = match self.spawner.spawn(&request) {
                Ok(output) => output,
                Err(err) => {
                    tracing::warn!(command = %command_line, error = %err, "command could not run");
                    return Ok(RunOutcome {
                        succeeded: false,
                        output: err.to_string(),
                    });
                }
            };
            if !output.success {
                tracing::warn!(command = %command_line, stderr = %output.stderr, "command failed");
                return Ok(RunOutcome {
                    succeeded: false,
                    output: output.stderr,
                });
            }
            Ok(RunOutcome {
                succeeded: true,
                output: output.stdout,
            })
        } else {
            let output = self
                .spawner
                .spawn(&request)
                .with_context(|| format!("Failed to run command: {command_line}"))?;
            if !output.success {
                anyhow::bail!("Command failed: {command_line}\n{}", output.stderr);
            }
            Ok(RunOutcome {
                succeeded: true,
                output: String::new(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Spawner double that records requests and replays scripted results.
    struct Scripted {
        calls: RefCell<Vec<SpawnRequest>>,
        results: RefCell<Vec<anyhow::Result<SpawnOutput>>>,
    }

    impl Scripted {
        fn new(results: Vec<anyhow::Result<SpawnOutput>>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                results: RefCell::new(results),
            }
        }
    }

    impl CommandSpawner for Scripted {
        fn spawn(&self, request: &SpawnRequest) -> anyhow::Result<SpawnOutput> {
            self.calls.borrow_mut().push(request.clone());
            self.results.borrow_mut().remove(0)
        }
    }

    fn ok_output(stdout: &str) -> SpawnOutput {
        SpawnOutput {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[test]
    fn simulate_never_spawns_and_always_succeeds() {
        let spawner = Scripted::new(Vec::new());
        let runner = CommandRunner::new(ExecutionMode::Simulate, &spawner);

        let outcome = runner.run(&["firebase", "deploy"], false).unwrap();
        assert!(outcome.succeeded);
        assert_eq!(outcome.output, SIMULATED_OUTPUT);
        assert!(spawner.calls.borrow().is_empty());
    }

    #[test]
    fn live_capture_reports_failure_without_error() {
        let spawner = Scripted::new(vec![Ok(SpawnOutput {
            success: false,
            stdout: String::new(),
            stderr: "permission denied".to_string(),
        })]);
        let runner = CommandRunner::new(ExecutionMode::Live, &spawner);

        let outcome = runner.run(&["gcloud", "services", "enable", "x"], true).unwrap();
        assert!(!outcome.succeeded);
        assert_eq!(outcome.output, "permission denied");
    }

    #[test]
    fn live_capture_reports_unspawnable_command_without_error() {
        let spawner = Scripted::new(vec![Err(anyhow::anyhow!("no such file"))]);
        let runner = CommandRunner::new(ExecutionMode::Live, &spawner);

        let outcome = runner.run(&["missing-tool"], true).unwrap();
        assert!(!outcome.succeeded);
        assert!(outcome.output.contains("no such file"));
    }

    #[test]
    fn live_without_capture_propagates_failure() {
        let spawner = Scripted::new(vec![Ok(SpawnOutput {
            success: false,
            stdout: String::new(),
            stderr: "boom".to_string(),
        })]);
        let runner = CommandRunner::new(ExecutionMode::Live, &spawner);

        let err = runner.run(&["firebase", "deploy"], false).unwrap_err();
        assert!(err.to_string().contains("firebase deploy"));
    }

    #[test]
    fn live_success_returns_captured_stdout() {
        let spawner = Scripted::new(vec![Ok(ok_output("project listing"))]);
        let runner = CommandRunner::new(ExecutionMode::Live, &spawner);

        let outcome = runner.run(&["firebase", "projects:list"], true).unwrap();
        assert!(outcome.succeeded);
        assert_eq!(outcome.output, "project listing");
    }

    #[test]
    fn stdin_and_cwd_reach_the_spawner() {
        let spawner = Scripted::new(vec![Ok(ok_output("")), Ok(ok_output(""))]);
        let runner = CommandRunner::new(ExecutionMode::Live, &spawner);

        runner
            .run_with_stdin(&["firebase", "functions:secrets:set", "K"], "value", true)
            .unwrap();
        runner
            .run_in(&["npm", "install"], Path::new("functions"), true)
            .unwrap();

        let calls = spawner.calls.borrow();
        assert_eq!(calls[0].stdin.as_deref(), Some("value"));
        assert_eq!(calls[1].cwd.as_deref(), Some(Path::new("functions")));
    }
}
