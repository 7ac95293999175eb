//! Project structure health check.
//!
//! Verifies that the files the classroom app needs are present under
//! the project root. Read-only in every mode.

use std::path::Path;

/// Files a complete fireClass project ships with.
pub const REQUIRED_FILES: [&str; 9] = [
    "public/index.html",
    "public/student-app.html",
    "public/js/ClassroomSDK.js",
    "public/js/teacher-dashboard.js",
    "public/js/student-app.js",
    "public/config.json",
    "functions/index.js",
    "functions/package.json",
    "firebase.json",
];

/// Outcome of a health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub missing: Vec<String>,
    pub has_locales: bool,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check the project structure under `root`.
pub fn check_project(root: &Path) -> HealthReport {
    let missing = REQUIRED_FILES
        .iter()
        .filter(|file| !root.join(file).exists())
        .map(|file| file.to_string())
        .collect::<Vec<_>>();

    let has_locales = root.join("public/locales").is_dir();
    if has_locales {
        tracing::info!("i18n structure found");
    } else {
        tracing::warn!("no i18n structure found");
    }

    for file in &missing {
        tracing::error!(%file, "required file missing");
    }

    HealthReport {
        missing,
        has_locales,
    }
}
