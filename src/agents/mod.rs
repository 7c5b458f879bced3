//! Agent subsystem for overmind
//!
//! Defines the four-operation capability contract every agent
//! implements, the descriptor identifying a discoverable agent, the
//! compiled name-to-factory registry, and the directory scanner that
//! pairs candidate source artifacts with registered factories.

#![allow(dead_code)]

mod builtin;
mod registry;
mod scanner;

pub use builtin::{default_registry, EchoAgent, PredictionAgent, ReasoningAgent};
pub use registry::{AgentFactory, AgentRegistry};
pub use scanner::scan_directory;

use crate::store::Payload;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Capability contract at the plugin boundary.
///
/// The controller assumes nothing else about an agent's shape. Within
/// one agent the call order is fixed: `initialize` precedes `execute`,
/// which precedes `get_data`, which precedes `shutdown`.
pub trait Agent: Send {
    /// Prepare internal state for execution.
    fn initialize(&mut self) -> anyhow::Result<()>;

    /// Perform the unit of work.
    fn execute(&mut self) -> anyhow::Result<()>;

    /// Return the produced output.
    fn get_data(&self) -> Payload;

    /// Release resources. Must be safe to call after a failed run.
    fn shutdown(&mut self);
}

/// Shared handle to a live agent. The lifecycle manager owns the
/// instance; the execution engine borrows it through this handle for
/// the duration of a run.
pub type SharedAgent = Arc<Mutex<Box<dyn Agent>>>;

/// Identity of a discoverable unit of work. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDescriptor {
    /// Unique name, derived from the source artifact's file stem.
    pub name: String,
    /// Location of the source artifact in the untrusted agents area.
    pub source: PathBuf,
}

impl AgentDescriptor {
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}
