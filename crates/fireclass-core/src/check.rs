//! Prerequisite tool checking.
//!
//! A pure gate: the orchestrator aborts before any provisioning step if
//! a required tool is missing, so no partial provisioning is attempted.

/// Command-line tools the pipeline requires on the search path.
pub const REQUIRED_TOOLS: [&str; 4] = ["node", "npm", "firebase", "gcloud"];

/// Capability to resolve a tool name on the execution search path.
///
/// No version check; presence is enough.
pub trait ToolResolver {
    fn resolve(&self, name: &str) -> bool;
}

/// Real resolver backed by the `which` lookup.
#[derive(Debug, Default)]
pub struct PathResolver;

impl ToolResolver for PathResolver {
    fn resolve(&self, name: &str) -> bool {
        which::which(name).is_ok()
    }
}

/// Check that every named tool resolves.
///
/// All tools are checked (and logged) even after the first miss, so the
/// user sees the complete list of what needs installing. The check runs
/// identically in both modes; it spawns nothing.
pub fn check_tools(resolver: &dyn ToolResolver, names: &[&str]) -> bool {
    let mut all_found = true;
    for name in names {
        if resolver.resolve(name) {
            tracing::info!(tool = %name, "found prerequisite");
        } else {
            tracing::error!(tool = %name, "prerequisite not found on PATH");
            all_found = false;
        }
    }
    all_found
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<&'static str>);

    impl ToolResolver for Fixed {
        fn resolve(&self, name: &str) -> bool {
            self.0.contains(&name)
        }
    }

    #[test]
    fn all_present_passes() {
        let resolver = Fixed(vec!["a", "b"]);
        assert!(check_tools(&resolver, &["a", "b"]));
    }

    #[test]
    fn any_missing_fails() {
        let resolver = Fixed(vec!["a"]);
        assert!(!check_tools(&resolver, &["a", "b"]));
        assert!(!check_tools(&resolver, &["b", "a"]));
    }

    #[test]
    fn empty_tool_list_passes() {
        let resolver = Fixed(vec![]);
        assert!(check_tools(&resolver, &[]));
    }
}
