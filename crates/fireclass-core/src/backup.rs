//! Timestamped project backups.
//!
//! Copies the whole project tree to a sibling directory named after the
//! current time, skipping version-control and build directories. Like
//! every other side effect, the copy only happens in Live mode.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;

use crate::types::ExecutionMode;

/// Directory names excluded from backups, at any depth.
pub const BACKUP_EXCLUDES: [&str; 3] = [".git", "node_modules", "BUILD"];

const BACKUP_PREFIX: &str = "fireclass_backup_";

/// Back up the project tree to a sibling directory.
///
/// The destination is `<parent>/fireclass_backup_<YYYYmmdd_HHMMSS>`.
/// Returns the destination path; in Simulate mode it is only computed
/// and logged, nothing is copied.
pub fn backup_project(root: &Path, mode: ExecutionMode) -> anyhow::Result<PathBuf> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Project root not found: {}", root.display()))?;
    let parent = root
        .parent()
        .context("Project root has no parent directory to back up into")?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let destination = parent.join(format!("{BACKUP_PREFIX}{timestamp}"));

    if !mode.is_live() {
        tracing::info!(
            destination = %destination.display(),
            "[simulate] would copy project tree, nothing copied"
        );
        return Ok(destination);
    }

    copy_tree(&root, &destination)?;
    tracing::info!(destination = %destination.display(), "backup created");
    Ok(destination)
}

fn copy_tree(src: &Path, dst: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create backup directory: {}", dst.display()))?;

    for entry in std::fs::read_dir(src)
        .with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let name = entry.file_name();
        if BACKUP_EXCLUDES.iter().any(|e| name == *e) {
            continue;
        }

        let from = entry.path();
        let to = dst.join(&name);
        if entry.file_type()?.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            std::fs::copy(&from, &to)
                .with_context(|| format!("Failed to copy file: {}", from.display()))?;
        }
    }
    Ok(())
}
