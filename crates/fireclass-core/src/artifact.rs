//! Generated configuration artifacts.
//!
//! Each artifact is built fresh every run from a fixed template plus the
//! project id, so regeneration is idempotent: the same project id yields
//! byte-identical content. In Simulate mode artifacts are computed and
//! logged but never persisted; in Live mode they overwrite the previous
//! version at a well-known path under the project root.
//!
//! The one exception to plain overwriting is the secret-name registry,
//! which is merged: provisioned names are appended to the existing set.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::{Value, json};

use crate::types::{ExecutionMode, ProjectId};

/// Project binding file consumed by the firebase CLI.
pub const PROJECT_BINDING_PATH: &str = ".firebaserc";
/// Hosting/functions/firestore manifest.
pub const HOSTING_MANIFEST_PATH: &str = "firebase.json";
/// Runtime configuration served to the web app.
pub const RUNTIME_CONFIG_PATH: &str = "public/config.json";
/// Platform-generated client credentials, copied verbatim and exempt
/// from the build's minification pass.
pub const CLIENT_CREDENTIALS_PATH: &str = "public/firebase-config.js";
/// Registry of secret names already provisioned for this project.
pub const SECRET_REGISTRY_PATH: &str = ".fireclass/secrets.json";

const HOST_SUFFIX: &str = "web.app";
const STUDENT_APP_PAGE: &str = "student-app.html";

/// A named structured configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigArtifact {
    pub relative_path: &'static str,
    pub content: Value,
}

impl ConfigArtifact {
    /// Pretty-printed JSON bytes, exactly as persisted in Live mode.
    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.content)
            .with_context(|| format!("Failed to serialize artifact: {}", self.relative_path))
    }
}

/// Canonical URL of the student app for a project.
pub fn student_app_url(project_id: &ProjectId) -> String {
    format!("https://{project_id}.{HOST_SUFFIX}/{STUDENT_APP_PAGE}")
}

/// Build the `.firebaserc` project binding.
pub fn project_binding(project_id: &ProjectId) -> ConfigArtifact {
    ConfigArtifact {
        relative_path: PROJECT_BINDING_PATH,
        content: json!({
            "projects": { "default": project_id.as_str() }
        }),
    }
}

/// Build the `firebase.json` hosting manifest.
pub fn hosting_manifest() -> ConfigArtifact {
    ConfigArtifact {
        relative_path: HOSTING_MANIFEST_PATH,
        content: json!({
            "firestore": {
                "rules": "firestore.rules",
                "indexes": "firestore.indexes.json"
            },
            "functions": { "source": "functions" },
            "hosting": {
                "public": "public",
                "ignore": ["firebase.json", "**/.*", "**/node_modules/**"],
                "rewrites": [{ "source": "**", "destination": "/index.html" }]
            }
        }),
    }
}

/// Build the `public/config.json` runtime configuration.
///
/// Embeds the derived student-app URL and the fixed list of linked
/// sub-applications.
pub fn runtime_config(project_id: &ProjectId) -> ConfigArtifact {
    ConfigArtifact {
        relative_path: RUNTIME_CONFIG_PATH,
        content: json!({
            "studentAppUrl": student_app_url(project_id),
            "games": [
                {
                    "name": "Poker Game",
                    "description": "Game Theory Poker",
                    "icon": "🃏",
                    "url": "YOUR_POKER_GAME_URL_HERE"
                },
                {
                    "name": "Homer Face Rec",
                    "description": "Face Recognition",
                    "icon": "👨",
                    "url": "https://meir.world/face-recognition/"
                }
            ]
        }),
    }
}

/// Persist an artifact under the project root, honoring the mode.
///
/// Simulate logs the computed content and touches nothing. Live creates
/// intermediate directories as needed and overwrites the destination.
pub fn write(root: &Path, artifact: &ConfigArtifact, mode: ExecutionMode) -> anyhow::Result<()> {
    let bytes = artifact.to_bytes()?;

    if !mode.is_live() {
        tracing::info!(
            artifact = %artifact.relative_path,
            content = %String::from_utf8_lossy(&bytes),
            "[simulate] artifact computed, not written"
        );
        return Ok(());
    }

    let path = root.join(artifact.relative_path);
    write_bytes(&path, &bytes)?;
    tracing::info!(artifact = %artifact.relative_path, "artifact written");
    Ok(())
}

/// Record a provisioned secret name in the registry artifact.
///
/// The registry tracks a set, not a sequence: an existing on-disk
/// registry is extended, and duplicate names are not re-added. Returns
/// true when the name was newly recorded. Assumes no concurrent runs
/// against the same registry file.
pub fn record_secret(root: &Path, name: &str, mode: ExecutionMode) -> anyhow::Result<bool> {
    if !mode.is_live() {
        tracing::info!(secret = %name, "[simulate] would record secret in registry");
        return Ok(true);
    }

    let path = root.join(SECRET_REGISTRY_PATH);
    let mut registry = load_registry(&path)?;
    if registry.contains(&name.to_string()) {
        return Ok(false);
    }
    registry.push(name.to_string());
    registry.sort();

    let content = json!({ "secrets": registry });
    let bytes = serde_json::to_vec_pretty(&content).context("Failed to serialize registry")?;
    write_bytes(&path, &bytes)?;
    Ok(true)
}

/// Read the set of secret names already recorded, empty if absent.
pub fn recorded_secrets(root: &Path) -> anyhow::Result<Vec<String>> {
    load_registry(&root.join(SECRET_REGISTRY_PATH))
}

fn load_registry(path: &Path) -> anyhow::Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read secret registry: {}", path.display()))?;
    let value: Value =
        serde_json::from_slice(&bytes).context("Failed to parse secret registry")?;
    let names = value
        .get("secrets")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Ok(names)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(())
}

/// Destination path of an artifact for a given project root.
pub fn artifact_path(root: &Path, relative: &str) -> PathBuf {
    root.join(relative)
}
