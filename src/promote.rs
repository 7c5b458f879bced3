//! Promotion pipeline
//!
//! Copies a successfully-run agent's source artifact from the
//! untrusted agents area into the trusted tools area. This is an
//! append-only transform: the artifact is copied, never moved, so the
//! original stays discoverable on the next scan. A copy failure is
//! the caller's to log; it never unwinds a completed execution.

use crate::agents::AgentDescriptor;
use crate::error::PromoteError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Copy `descriptor`'s source artifact into `tools_dir`.
///
/// Returns the destination path of the promoted artifact.
pub fn promote_artifact(
    descriptor: &AgentDescriptor,
    tools_dir: &Path,
) -> Result<PathBuf, PromoteError> {
    if !descriptor.source.is_file() {
        return Err(PromoteError::MissingSource(descriptor.name.clone()));
    }

    let file_name = descriptor
        .source
        .file_name()
        .ok_or_else(|| PromoteError::MissingSource(descriptor.name.clone()))?;

    std::fs::create_dir_all(tools_dir).map_err(|e| PromoteError::Copy {
        name: descriptor.name.clone(),
        reason: format!("{}: {}", tools_dir.display(), e),
    })?;

    let destination = tools_dir.join(file_name);
    std::fs::copy(&descriptor.source, &destination).map_err(|e| PromoteError::Copy {
        name: descriptor.name.clone(),
        reason: e.to_string(),
    })?;

    info!(
        "Promoted agent '{}' to {:?}",
        descriptor.name, destination
    );
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_promote_copies_and_keeps_original() {
        let temp_dir = TempDir::new().unwrap();
        let agents_dir = temp_dir.path().join("agents");
        let tools_dir = temp_dir.path().join("tools");
        std::fs::create_dir_all(&agents_dir).unwrap();

        let source = agents_dir.join("EchoAgent.rs");
        std::fs::write(&source, "// echo agent\n").unwrap();

        let descriptor = AgentDescriptor::new("EchoAgent", &source);
        let destination = promote_artifact(&descriptor, &tools_dir).unwrap();

        assert_eq!(destination, tools_dir.join("EchoAgent.rs"));
        assert!(destination.is_file());
        // Copy, not move: the original remains discoverable
        assert!(source.is_file());
        assert_eq!(
            std::fs::read_to_string(&destination).unwrap(),
            "// echo agent\n"
        );
    }

    #[test]
    fn test_promote_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let descriptor =
            AgentDescriptor::new("Ghost", temp_dir.path().join("agents/Ghost.rs"));

        let result = promote_artifact(&descriptor, &temp_dir.path().join("tools"));
        assert!(matches!(result, Err(PromoteError::MissingSource(_))));
    }

    #[test]
    fn test_promote_unwritable_destination() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("EchoAgent.rs");
        std::fs::write(&source, "").unwrap();

        // A plain file where the tools directory should be
        let blocked = temp_dir.path().join("tools");
        std::fs::write(&blocked, "not a directory").unwrap();

        let descriptor = AgentDescriptor::new("EchoAgent", &source);
        let result = promote_artifact(&descriptor, &blocked);
        assert!(matches!(result, Err(PromoteError::Copy { .. })));
    }
}
