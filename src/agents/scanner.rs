//! Plugin directory scanner
//!
//! Enumerates candidate agent artifacts at the top level of the agents
//! directory. Read-only and idempotent: re-scanning an unchanged
//! directory yields the same descriptor set. A candidate counts as an
//! agent only if a factory is registered under its file stem; anything
//! else is silently skipped, since not being an agent is not an error.

use super::{AgentDescriptor, AgentRegistry};
use std::path::Path;
use tracing::debug;

/// Scan `dir` for files with `extension` whose stem has a registered
/// factory. Descriptors are returned sorted by name.
pub fn scan_directory(dir: &Path, extension: &str, registry: &AgentRegistry) -> Vec<AgentDescriptor> {
    if !dir.is_dir() {
        debug!("Agents directory does not exist: {:?}", dir);
        return Vec::new();
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Failed to read agents directory {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut descriptors = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };

        // Skip hidden files
        if name.starts_with('.') {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != extension {
            continue;
        }

        if !registry.contains(&name) {
            debug!("Skipping '{}': no registered factory", name);
            continue;
        }

        descriptors.push(AgentDescriptor::new(name, path));
    }

    descriptors.sort_by(|a, b| a.name.cmp(&b.name));
    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{AgentRegistry, EchoAgent};
    use tempfile::TempDir;

    fn registry_with(names: &[&str]) -> AgentRegistry {
        let mut registry = AgentRegistry::new();
        for name in names {
            registry.register(name, Box::new(|| Box::new(EchoAgent::new("x"))));
        }
        registry
    }

    fn touch(dir: &TempDir, name: &str) {
        std::fs::write(dir.path().join(name), "// agent source\n").unwrap();
    }

    #[test]
    fn test_scan_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(&["EchoAgent"]);

        let found = scan_directory(temp_dir.path(), "rs", &registry);
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_missing_dir() {
        let registry = registry_with(&["EchoAgent"]);
        let found = scan_directory(Path::new("/nonexistent/agents"), "rs", &registry);
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_filters_by_extension_and_factory() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir, "EchoAgent.rs");
        touch(&temp_dir, "EchoAgent.txt"); // wrong extension
        touch(&temp_dir, "Unregistered.rs"); // no factory
        touch(&temp_dir, ".hidden.rs");

        let registry = registry_with(&["EchoAgent"]);
        let found = scan_directory(temp_dir.path(), "rs", &registry);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "EchoAgent");
        assert_eq!(found[0].source, temp_dir.path().join("EchoAgent.rs"));
    }

    #[test]
    fn test_scan_top_level_only() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("EchoAgent.rs"), "").unwrap();

        let registry = registry_with(&["EchoAgent"]);
        let found = scan_directory(temp_dir.path(), "rs", &registry);
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir, "EchoAgent.rs");
        touch(&temp_dir, "ReasoningAgent.rs");

        let registry = registry_with(&["EchoAgent", "ReasoningAgent"]);
        let first = scan_directory(temp_dir.path(), "rs", &registry);
        let second = scan_directory(temp_dir.path(), "rs", &registry);

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
