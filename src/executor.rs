//! Concurrent execution engine
//!
//! Runs every agent in a batch on its own dedicated thread of control
//! and returns once all of them have reached a terminal per-run
//! outcome. Agents are assumed independent, so each one gets a
//! blocking worker thread for its `execute` + `get_data` pair and no
//! cross-agent coordination is attempted.
//!
//! Outcomes fan in over a channel to a single collector that
//! exclusively owns the result list; no shared mutable map is written
//! from worker threads. A per-agent deadline bounds the collection
//! phase: an agent that has not reported by then is marked failed with
//! a timeout reason and its worker thread is left to finish in the
//! background, its late result discarded.

use crate::agents::SharedAgent;
use crate::error::ExecutionError;
use crate::store::Payload;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Terminal per-run outcome for one agent.
#[derive(Debug)]
pub struct RunOutcome {
    pub name: String,
    pub result: Result<Payload, ExecutionError>,
}

/// Engine running one batch of agents in parallel.
pub struct ExecutionEngine {
    timeout: Duration,
}

impl ExecutionEngine {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run all `agents` to completion in parallel.
    ///
    /// Completion order between agents is unspecified; the only
    /// guarantee is that every agent has a terminal outcome in the
    /// returned list. A failure in one agent never cancels, delays, or
    /// otherwise affects a sibling.
    pub async fn run(&self, agents: Vec<(String, SharedAgent)>) -> Vec<RunOutcome> {
        let total = agents.len();
        if total == 0 {
            return Vec::new();
        }

        let (tx, mut rx) = mpsc::channel::<RunOutcome>(total);
        let mut pending: HashSet<String> = HashSet::with_capacity(total);

        for (name, agent) in agents {
            pending.insert(name.clone());
            let tx = tx.clone();

            tokio::spawn(async move {
                let worker_name = name.clone();
                let handle = tokio::task::spawn_blocking(move || {
                    let mut guard = match agent.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    guard.execute()?;
                    Ok::<Payload, anyhow::Error>(guard.get_data())
                });

                let result = match handle.await {
                    Ok(Ok(payload)) => Ok(payload),
                    Ok(Err(e)) => Err(ExecutionError::Failed {
                        name: name.clone(),
                        reason: e.to_string(),
                    }),
                    Err(join_err) => Err(ExecutionError::Failed {
                        name: name.clone(),
                        reason: if join_err.is_panic() {
                            "agent panicked during execution".to_string()
                        } else {
                            join_err.to_string()
                        },
                    }),
                };

                // The receiver may have given up at the deadline; a
                // late result is simply dropped.
                let _ = tx
                    .send(RunOutcome {
                        name: worker_name,
                        result,
                    })
                    .await;
            });
        }
        drop(tx);

        // Single collector: exclusive owner of the outcome list.
        let deadline = tokio::time::Instant::now() + self.timeout;
        let mut outcomes = Vec::with_capacity(total);

        while !pending.is_empty() {
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(Some(outcome)) => {
                    pending.remove(&outcome.name);
                    match &outcome.result {
                        Ok(_) => debug!("Agent '{}' completed", outcome.name),
                        Err(e) => error!("{}", e),
                    }
                    outcomes.push(outcome);
                }
                Ok(None) => break,
                Err(_) => {
                    // Deadline passed with agents still running.
                    break;
                }
            }
        }

        for name in pending {
            error!("Agent '{}' exceeded its deadline; marking failed", name);
            outcomes.push(RunOutcome {
                name: name.clone(),
                result: Err(ExecutionError::DeadlineExceeded(name)),
            });
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Agent;
    use anyhow::bail;
    use std::sync::{Arc, Mutex};

    struct OkAgent;

    impl Agent for OkAgent {
        fn initialize(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        fn execute(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        fn get_data(&self) -> Payload {
            Payload::text("ok")
        }
        fn shutdown(&mut self) {}
    }

    struct FailingAgent;

    impl Agent for FailingAgent {
        fn initialize(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        fn execute(&mut self) -> anyhow::Result<()> {
            bail!("deliberate failure")
        }
        fn get_data(&self) -> Payload {
            Payload::text("unreachable")
        }
        fn shutdown(&mut self) {}
    }

    struct PanickyAgent;

    impl Agent for PanickyAgent {
        fn initialize(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        fn execute(&mut self) -> anyhow::Result<()> {
            panic!("boom")
        }
        fn get_data(&self) -> Payload {
            Payload::text("unreachable")
        }
        fn shutdown(&mut self) {}
    }

    struct SlowAgent(Duration);

    impl Agent for SlowAgent {
        fn initialize(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        fn execute(&mut self) -> anyhow::Result<()> {
            std::thread::sleep(self.0);
            Ok(())
        }
        fn get_data(&self) -> Payload {
            Payload::text("slow")
        }
        fn shutdown(&mut self) {}
    }

    fn shared(agent: impl Agent + 'static) -> SharedAgent {
        Arc::new(Mutex::new(Box::new(agent)))
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let engine = ExecutionEngine::new(Duration::from_secs(1));
        let outcomes = engine.run(vec![]).await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_all_agents_reach_terminal_outcome() {
        let engine = ExecutionEngine::new(Duration::from_secs(5));
        let batch = vec![
            ("a".to_string(), shared(OkAgent)),
            ("b".to_string(), shared(OkAgent)),
            ("c".to_string(), shared(OkAgent)),
        ];

        let outcomes = engine.run(batch).await;
        assert_eq!(outcomes.len(), 3);

        let mut names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let engine = ExecutionEngine::new(Duration::from_secs(5));
        let batch = vec![
            ("good".to_string(), shared(OkAgent)),
            ("bad".to_string(), shared(FailingAgent)),
        ];

        let outcomes = engine.run(batch).await;
        assert_eq!(outcomes.len(), 2);

        let good = outcomes.iter().find(|o| o.name == "good").unwrap();
        let bad = outcomes.iter().find(|o| o.name == "bad").unwrap();
        assert!(good.result.is_ok());
        assert!(matches!(bad.result, Err(ExecutionError::Failed { .. })));
    }

    #[tokio::test]
    async fn test_panic_is_captured() {
        let engine = ExecutionEngine::new(Duration::from_secs(5));
        let batch = vec![
            ("panicky".to_string(), shared(PanickyAgent)),
            ("good".to_string(), shared(OkAgent)),
        ];

        let outcomes = engine.run(batch).await;
        let panicky = outcomes.iter().find(|o| o.name == "panicky").unwrap();
        let good = outcomes.iter().find(|o| o.name == "good").unwrap();

        assert!(matches!(panicky.result, Err(ExecutionError::Failed { .. })));
        assert!(good.result.is_ok());
    }

    #[tokio::test]
    async fn test_deadline_marks_laggard_failed() {
        let engine = ExecutionEngine::new(Duration::from_millis(100));
        let batch = vec![
            ("slow".to_string(), shared(SlowAgent(Duration::from_secs(1)))),
            ("fast".to_string(), shared(OkAgent)),
        ];

        let outcomes = engine.run(batch).await;
        assert_eq!(outcomes.len(), 2);

        let slow = outcomes.iter().find(|o| o.name == "slow").unwrap();
        let fast = outcomes.iter().find(|o| o.name == "fast").unwrap();
        assert!(matches!(
            slow.result,
            Err(ExecutionError::DeadlineExceeded(_))
        ));
        assert!(fast.result.is_ok());
    }
}
