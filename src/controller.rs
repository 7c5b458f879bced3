//! Agent lifecycle controller
//!
//! Owns the live agent registry and the result store, and drives each
//! agent through its state machine:
//!
//! `Unloaded -> Initialized -> Executing -> {Completed | Failed} -> ShutDown`
//!
//! Terminal states are monotonic: once an agent has completed or
//! failed, the only remaining transition is `ShutDown`. Every per-agent
//! failure is caught here or in the execution engine and converted to a
//! log line plus a state transition; batch operations always complete
//! and return a possibly-partial result set.

#![allow(dead_code)]

use crate::agents::{scan_directory, AgentDescriptor, AgentRegistry, SharedAgent};
use crate::config::Config;
use crate::error::{LoadError, StoreError, UnloadError};
use crate::executor::ExecutionEngine;
use crate::promote::promote_artifact;
use crate::store::{Payload, ResultStore};
use crate::validator::AllowList;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, TryLockError};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle state of a live agent instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Unloaded,
    Initialized,
    Executing,
    Completed,
    Failed,
    ShutDown,
}

impl AgentState {
    /// Whether this is a terminal per-run state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentState::Completed | AgentState::Failed | AgentState::ShutDown)
    }

    /// Legal transitions of the lifecycle machine. `ShutDown` is
    /// reachable from every other state and leads nowhere.
    pub fn can_advance(from: AgentState, to: AgentState) -> bool {
        use AgentState::*;
        match (from, to) {
            (ShutDown, _) => false,
            (_, ShutDown) => true,
            (Unloaded, Initialized) => true,
            (Initialized, Executing) => true,
            (Executing, Completed) | (Executing, Failed) => true,
            _ => false,
        }
    }
}

/// A live agent bound to its descriptor and lifecycle state. Owned
/// exclusively by the controller.
pub struct AgentInstance {
    descriptor: AgentDescriptor,
    agent: SharedAgent,
    state: AgentState,
}

impl AgentInstance {
    pub fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    /// Invoke the agent's `shutdown`, recovering the guard when a
    /// panicking run poisoned the lock. An agent still holding the
    /// lock past its deadline is skipped with a log line: blocking
    /// here would reintroduce the unbounded wait the deadline removed.
    fn shutdown_agent(&self) {
        match self.agent.try_lock() {
            Ok(mut agent) => agent.shutdown(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().shutdown(),
            Err(TryLockError::WouldBlock) => {
                warn!(
                    "Agent '{}' is still running past its deadline; skipping shutdown",
                    self.descriptor.name
                );
            }
        }
    }

    /// Advance the state machine; illegal transitions are ignored so a
    /// terminal state can never regress.
    fn advance(&mut self, to: AgentState) {
        if AgentState::can_advance(self.state, to) {
            self.state = to;
        } else {
            debug!(
                "Ignoring illegal transition {:?} -> {:?} for '{}'",
                self.state, to, self.descriptor.name
            );
        }
    }
}

/// Per-batch outcome counts from one execution cycle. Counts cover
/// only the agents launched in that cycle, not earlier ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub completed: usize,
    pub failed: usize,
}

/// The orchestration controller.
pub struct Controller {
    config: Config,
    allowlist: AllowList,
    registry: AgentRegistry,
    instances: HashMap<String, AgentInstance>,
    store: ResultStore,
    engine: ExecutionEngine,
}

impl Controller {
    pub fn new(config: Config, registry: AgentRegistry) -> Self {
        let allowlist = AllowList::from_config(&config);
        let engine = ExecutionEngine::new(Duration::from_secs(config.execution.timeout_secs));
        Self {
            config,
            allowlist,
            registry,
            instances: HashMap::new(),
            store: ResultStore::new(),
            engine,
        }
    }

    /// Replace the default accept-all result validation.
    pub fn set_store(&mut self, store: ResultStore) {
        self.store = store;
    }

    /// One load cycle: scan the agents directory, validate each
    /// candidate against the allow-list, construct and initialize it,
    /// and register the instance. Per-candidate failures are logged and
    /// skipped; the cycle always completes.
    pub fn load_agents(&mut self) -> usize {
        let candidates = scan_directory(
            &self.config.paths.agents,
            &self.config.scanner.extension,
            &self.registry,
        );
        debug!("Scan found {} candidate(s)", candidates.len());

        let mut loaded = 0;
        for descriptor in candidates {
            match self.load_agent(descriptor) {
                Ok(name) => {
                    info!("Loaded agent '{}'", name);
                    loaded += 1;
                }
                Err(e) => warn!("{}", e),
            }
        }
        loaded
    }

    /// Load one validated candidate. An instance enters the registry
    /// only if the allow-list admits it and `initialize` succeeds; a
    /// name already present is rejected as a conflict.
    fn load_agent(&mut self, descriptor: AgentDescriptor) -> Result<String, LoadError> {
        let name = descriptor.name.clone();

        if !self.allowlist.is_allowed(&name) {
            return Err(LoadError::Rejected(name));
        }
        if self.instances.contains_key(&name) {
            return Err(LoadError::Conflict(name));
        }

        let mut agent = self
            .registry
            .instantiate(&name)
            .ok_or_else(|| LoadError::NoFactory(name.clone()))?;

        agent.initialize().map_err(|e| LoadError::Init {
            name: name.clone(),
            reason: e.to_string(),
        })?;

        let mut instance = AgentInstance {
            descriptor,
            agent: Arc::new(Mutex::new(agent)),
            state: AgentState::Unloaded,
        };
        instance.advance(AgentState::Initialized);
        self.instances.insert(name.clone(), instance);
        Ok(name)
    }

    /// Unload an agent by name, invoking its `shutdown`. An unknown
    /// name is logged as not found and leaves the registry unchanged.
    pub fn unload_agent(&mut self, name: &str) -> bool {
        match self.instances.remove(name) {
            Some(mut instance) => {
                instance.shutdown_agent();
                instance.advance(AgentState::ShutDown);
                info!("Unloaded agent '{}'", name);
                true
            }
            None => {
                warn!("{}", UnloadError::NotFound(name.to_string()));
                false
            }
        }
    }

    /// Execute every currently initialized agent in parallel and fold
    /// the outcomes back into states, the result store, and the
    /// promotion pipeline. Returns the outcome counts for this batch.
    pub async fn execute_agents(&mut self) -> CycleSummary {
        let mut batch: Vec<(String, SharedAgent)> = Vec::new();
        for (name, instance) in &mut self.instances {
            if instance.state == AgentState::Initialized {
                instance.advance(AgentState::Executing);
                batch.push((name.clone(), Arc::clone(&instance.agent)));
            }
        }

        if batch.is_empty() {
            debug!("No initialized agents to execute");
            return CycleSummary::default();
        }

        let cycle = Uuid::new_v4();
        info!("Execution cycle {} started with {} agent(s)", cycle, batch.len());

        let outcomes = self.engine.run(batch).await;

        let mut summary = CycleSummary::default();
        for outcome in outcomes {
            let instance = match self.instances.get_mut(&outcome.name) {
                Some(instance) => instance,
                None => continue,
            };

            match outcome.result {
                Ok(payload) => {
                    instance.advance(AgentState::Completed);
                    summary.completed += 1;

                    if let Err(e) = self.store.record(&outcome.name, payload) {
                        warn!("{}", e);
                    }

                    // Promotion happens only after a completed run; a
                    // copy failure never unwinds the execution.
                    if let Err(e) =
                        promote_artifact(instance.descriptor(), &self.config.paths.tools)
                    {
                        warn!("{}", e);
                    }
                }
                Err(_) => {
                    instance.advance(AgentState::Failed);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Execution cycle {} finished: {} completed, {} failed",
            cycle, summary.completed, summary.failed
        );
        summary
    }

    /// Shut down every remaining instance. Called at controller
    /// teardown; `shutdown` runs exactly once per instance, including
    /// those that failed or panicked. The one exception is an agent
    /// still running past its deadline: its lock is held by the
    /// detached worker, so it is skipped with a log line rather than
    /// blocking teardown indefinitely.
    pub fn shutdown_all(&mut self) {
        for (name, mut instance) in self.instances.drain() {
            instance.shutdown_agent();
            instance.advance(AgentState::ShutDown);
            debug!("Shut down agent '{}'", name);
        }
    }

    /// Persist the result store to the configured path.
    pub fn persist(&self) -> Result<(), StoreError> {
        self.store.persist(&self.config.store.path)
    }

    /// Stored result for one agent, if any.
    pub fn data(&self, name: &str) -> Option<&Payload> {
        self.store.query(name)
    }

    /// Lifecycle state of a loaded agent.
    pub fn agent_state(&self, name: &str) -> Option<AgentState> {
        self.instances.get(name).map(|i| i.state)
    }

    /// Names currently present in the live registry, sorted.
    pub fn loaded_agents(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.instances.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
