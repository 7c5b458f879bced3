//! Security validator
//!
//! A pure allow-list lookup over agent names. The list fails closed:
//! a name absent from the list is rejected, and a configuration that
//! could not be loaded yields an empty list that permits nothing.
//! Rejections are logged by the caller and never abort a load cycle.

#![allow(dead_code)]

use crate::config::Config;
use std::collections::HashSet;

/// Set of agent names permitted to load. Read-only for the
/// controller's lifetime; reloading requires a fresh load cycle.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    names: HashSet<String>,
}

impl AllowList {
    /// Build an allow-list from an explicit set of names.
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// An allow-list that permits nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the allow-list from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.allowed_agents.iter().cloned())
    }

    /// Whether loading and executing the named agent is permitted.
    pub fn is_allowed(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
