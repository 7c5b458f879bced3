//! Built-in example agents
//!
//! Small, self-contained agents shipped with the controller. Each is
//! an independent implementer of the capability contract; there is no
//! shared base type beyond the trait itself. They double as the seed
//! entries of the default factory registry.

use super::{Agent, AgentRegistry};
use crate::store::Payload;
use anyhow::bail;
use serde_json::json;

/// Build the registry the controller starts with.
pub fn default_registry() -> AgentRegistry {
    let mut registry = AgentRegistry::new();
    registry.register("EchoAgent", Box::new(|| Box::new(EchoAgent::default())));
    registry.register(
        "ReasoningAgent",
        Box::new(|| Box::new(ReasoningAgent::default())),
    );
    registry.register(
        "PredictionAgent",
        Box::new(|| Box::new(PredictionAgent::default())),
    );
    registry
}

/// Echoes its configured message back as a text payload.
pub struct EchoAgent {
    message: String,
    output: Option<String>,
}

impl EchoAgent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            output: None,
        }
    }
}

impl Default for EchoAgent {
    fn default() -> Self {
        Self::new("echo")
    }
}

impl Agent for EchoAgent {
    fn initialize(&mut self) -> anyhow::Result<()> {
        self.output = None;
        Ok(())
    }

    fn execute(&mut self) -> anyhow::Result<()> {
        self.output = Some(self.message.clone());
        Ok(())
    }

    fn get_data(&self) -> Payload {
        Payload::text(self.output.clone().unwrap_or_default())
    }

    fn shutdown(&mut self) {
        self.output = None;
    }
}

/// Draws a conclusion from a fixed set of premises.
///
/// A toy deliberation: the "conclusion" is just a restatement that the
/// premises hold together. The point is the payload shape (a flat map),
/// not the logic.
pub struct ReasoningAgent {
    premises: Vec<String>,
    conclusion: Option<String>,
}

impl ReasoningAgent {
    pub fn new(premises: Vec<String>) -> Self {
        Self {
            premises,
            conclusion: None,
        }
    }

    /// Remove a premise if present.
    pub fn challenge_premise(&mut self, premise: &str) -> bool {
        let before = self.premises.len();
        self.premises.retain(|p| p != premise);
        self.premises.len() != before
    }
}

impl Default for ReasoningAgent {
    fn default() -> Self {
        Self::new(vec![
            "all agents are validated before loading".to_string(),
            "validated agents may be promoted".to_string(),
        ])
    }
}

impl Agent for ReasoningAgent {
    fn initialize(&mut self) -> anyhow::Result<()> {
        self.conclusion = None;
        Ok(())
    }

    fn execute(&mut self) -> anyhow::Result<()> {
        if self.premises.is_empty() {
            bail!("no premises available for drawing a conclusion");
        }
        self.conclusion = Some(format!(
            "given {} premise(s), further deliberation is warranted",
            self.premises.len()
        ));
        Ok(())
    }

    fn get_data(&self) -> Payload {
        Payload::map([
            ("premises".to_string(), json!(self.premises)),
            (
                "conclusion".to_string(),
                json!(self.conclusion.clone().unwrap_or_default()),
            ),
        ])
    }

    fn shutdown(&mut self) {
        self.conclusion = None;
    }
}

/// Extrapolates the next value of a numeric series.
pub struct PredictionAgent {
    samples: Vec<f64>,
    predicted: Option<f64>,
}

impl PredictionAgent {
    pub fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            predicted: None,
        }
    }
}

impl Default for PredictionAgent {
    fn default() -> Self {
        Self::new(vec![1.0, 2.0, 3.0, 4.0])
    }
}

impl Agent for PredictionAgent {
    fn initialize(&mut self) -> anyhow::Result<()> {
        if self.samples.len() < 2 {
            bail!("need at least two samples to extrapolate");
        }
        self.predicted = None;
        Ok(())
    }

    fn execute(&mut self) -> anyhow::Result<()> {
        let last = self.samples[self.samples.len() - 1];
        let deltas: f64 = self
            .samples
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .sum::<f64>()
            / (self.samples.len() - 1) as f64;
        self.predicted = Some(last + deltas);
        Ok(())
    }

    fn get_data(&self) -> Payload {
        Payload::map([
            ("samples".to_string(), json!(self.samples)),
            ("predicted".to_string(), json!(self.predicted)),
        ])
    }

    fn shutdown(&mut self) {
        self.predicted = None;
    }
}
