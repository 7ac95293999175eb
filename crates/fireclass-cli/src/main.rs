//! fireClass Setup - provisioning & deployment pipeline
//!
//! Usage:
//!   fireclass                 # Dry-run the full pipeline (default)
//!   fireclass --live          # Execute for real
//!   fireclass check           # Audit the project structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fireclass_core::check::PathResolver;
use fireclass_core::exec::SystemSpawner;
use fireclass_core::pipeline::{Pipeline, PipelineState, RunReport};
use fireclass_core::prompt::{Interact, NonInteractive};
use fireclass_core::types::{ExecutionMode, ProjectId};
use fireclass_core::{backup, health};

/// Project id used when simulating without an explicit --project.
const SIMULATED_PROJECT_ID: &str = "simulated-project-123";

#[derive(Parser)]
#[command(name = "fireclass")]
#[command(about = "fireClass provisioning & deployment pipeline", long_about = None)]
struct Cli {
    /// Run in live mode, executing commands and writing files.
    /// Without this flag every run is a side-effect-free simulation.
    #[arg(long)]
    live: bool,

    /// Target cloud project id (prompted for in live mode if omitted)
    #[arg(long)]
    project: Option<String>,

    /// Exit non-zero when any step fails, not only on aborted runs
    #[arg(long)]
    strict: bool,

    /// Project root directory
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the project has every required file
    Check,

    /// Copy the project tree to a timestamped sibling directory
    /// (honors --live; a simulated backup only prints the destination)
    Backup,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fireclass=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check) => run_check(&cli.root),
        Some(Commands::Backup) => run_backup(&cli),
        None => run_pipeline(&cli),
    }
}

fn execution_mode(cli: &Cli) -> ExecutionMode {
    if cli.live {
        ExecutionMode::Live
    } else {
        ExecutionMode::Simulate
    }
}

fn run_pipeline(cli: &Cli) -> Result<()> {
    let mode = execution_mode(cli);
    print_mode_banner(mode);

    let project_id = resolve_project_id(cli.project.as_deref(), mode)?;

    let spawner = SystemSpawner;
    let resolver = PathResolver;
    // Simulated runs never prompt, so they work without a terminal.
    let terminal = TerminalInteract::new();
    let silent = NonInteractive;
    let prompt: &dyn Interact = if mode.is_live() { &terminal } else { &silent };
    let pipeline = Pipeline::new(mode, &cli.root, &spawner, &resolver, prompt);

    let report = pipeline.run(&project_id)?;
    print_report(&report);

    if let Some(reason) = &report.abort {
        anyhow::bail!("run aborted: {reason}");
    }
    if cli.strict && !report.all_succeeded() {
        let failed: Vec<&str> = report.failed_steps().map(|s| s.step.as_str()).collect();
        anyhow::bail!("steps failed: {}", failed.join(", "));
    }
    Ok(())
}

fn run_backup(cli: &Cli) -> Result<()> {
    let mode = execution_mode(cli);
    let destination = backup::backup_project(&cli.root, mode)?;

    if mode.is_live() {
        println!(
            "{} backup created at {}",
            style("✓").green(),
            destination.display()
        );
    } else {
        println!(
            "Would back up to {} (use {} to copy)",
            style(destination.display()).cyan(),
            style("--live").cyan()
        );
    }
    Ok(())
}

fn run_check(root: &PathBuf) -> Result<()> {
    let report = health::check_project(root);

    if !report.has_locales {
        println!("{} no i18n structure found", style("!").yellow());
    }
    if report.is_healthy() {
        println!("{} project structure is healthy", style("✓").green());
        Ok(())
    } else {
        println!("{} missing required files:", style("✗").red());
        for file in &report.missing {
            println!("  - {file}");
        }
        anyhow::bail!("{} required file(s) missing", report.missing.len())
    }
}

fn resolve_project_id(arg: Option<&str>, mode: ExecutionMode) -> Result<ProjectId> {
    if let Some(id) = arg {
        return ProjectId::new(id);
    }
    if !mode.is_live() {
        println!(
            "No --project given, simulating with '{}'",
            style(SIMULATED_PROJECT_ID).cyan()
        );
        return ProjectId::new(SIMULATED_PROJECT_ID);
    }

    let id: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter a unique ID for your new project (e.g. 'my-class-123')")
        .interact_text()?;
    ProjectId::new(id)
}

fn print_mode_banner(mode: ExecutionMode) {
    match mode {
        ExecutionMode::Simulate => {
            println!("{}", style("RUNNING IN SIMULATION MODE").bold());
            println!("Commands are printed, not executed; no files are written.");
            println!("Use {} to run the installation for real.", style("--live").cyan());
        }
        ExecutionMode::Live => {
            println!("{}", style("RUNNING IN LIVE MODE").bold().red());
            println!("Commands will execute and files will be created or modified.");
        }
    }
    println!();
}

fn print_report(report: &RunReport) {
    println!();
    println!("{}", style("Run report").bold());
    for result in &report.steps {
        let marker = if result.succeeded {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("  {marker} {}", result.step);
        for line in result.output.lines() {
            println!("      {line}");
        }
        if let Some(error) = &result.error {
            for line in error.lines() {
                println!("      {} {line}", style("error:").red());
            }
        }
    }

    match report.state {
        PipelineState::Completed => {
            let summary = if report.all_succeeded() {
                style("all steps succeeded").green().to_string()
            } else {
                let failed = report.failed_steps().count();
                style(format!("{failed} step(s) failed")).yellow().to_string()
            };
            println!("\nCompleted: {summary}");
        }
        PipelineState::Aborted => {
            println!("\n{}", style("Aborted before completion").red());
        }
        _ => {}
    }
}

/// Terminal prompts backed by dialoguer.
struct TerminalInteract {
    theme: ColorfulTheme,
}

impl TerminalInteract {
    fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Interact for TerminalInteract {
    fn prompt_secret(&self, name: &str) -> Result<String> {
        let value = Password::with_theme(&self.theme)
            .with_prompt(format!("Enter your {name} (leave empty to skip)"))
            .allow_empty_password(true)
            .interact()?;
        Ok(value)
    }

    fn confirm(&self, message: &str) -> Result<bool> {
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }
}
