//! Compiled agent factory registry
//!
//! Maps agent names to constructors, populated at startup. This is the
//! single place code arrives from: the rest of the controller never
//! reasons about how an implementation came to exist, only whether a
//! factory is registered for a name.

use super::Agent;
use std::collections::HashMap;
use tracing::warn;

/// Constructor for a fresh agent instance.
pub type AgentFactory = Box<dyn Fn() -> Box<dyn Agent> + Send + Sync>;

/// Name-to-factory registry.
#[derive(Default)]
pub struct AgentRegistry {
    factories: HashMap<String, AgentFactory>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`. A duplicate registration is
    /// rejected and the original kept.
    pub fn register(&mut self, name: &str, factory: AgentFactory) -> bool {
        if self.factories.contains_key(name) {
            warn!("Factory '{}' is already registered; keeping the original", name);
            return false;
        }
        self.factories.insert(name.to_string(), factory);
        true
    }

    /// Whether a factory exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Construct a fresh instance of the named agent.
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn Agent>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Registered names, sorted for stable output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
