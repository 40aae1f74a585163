//! Construction of the agent set from a provider configuration.

use std::sync::Arc;

use quill_core::{Arbiter, Error, Fixer, Planner, Result};
use rig::completion::CompletionModel;
use rig::prelude::CompletionClient;
use rig::providers::{anthropic, openai};

use crate::TRACING_TARGET;
use crate::agent::{ArbiterAgent, FixerAgent, PlannerAgent};
use crate::config::{CompletionConfig, ProviderKind};

/// The planner, fixer and arbiter, sharing one completion model.
#[derive(Clone)]
pub struct Agents {
    /// Proposes initial plans.
    pub planner: Arc<dyn Planner>,
    /// Rewrites failing plans.
    pub fixer: Arc<dyn Fixer>,
    /// Picks among repeated matches.
    pub arbiter: Arc<dyn Arbiter>,
}

impl Agents {
    /// Creates all three agents over the same model.
    pub fn new<M: CompletionModel + 'static>(model: M, temperature: Option<f64>) -> Self {
        Self {
            planner: Arc::new(PlannerAgent::new(model.clone(), temperature)),
            fixer: Arc::new(FixerAgent::new(model.clone(), temperature)),
            arbiter: Arc::new(ArbiterAgent::new(model, temperature)),
        }
    }

    /// Connects to the configured provider and creates the agents.
    pub fn connect(config: &CompletionConfig) -> Result<Self> {
        let api_key = config.api_key()?;

        let agents = match config.provider {
            ProviderKind::OpenAi => {
                let client: openai::CompletionsClient = openai::Client::new(api_key)
                    .map_err(|e| Error::config(format!("openai client: {e}")))?
                    .completions_api();
                Self::new(client.completion_model(&config.model), config.temperature)
            }
            ProviderKind::Anthropic => {
                let client: anthropic::Client = anthropic::Client::new(api_key)
                    .map_err(|e| Error::config(format!("anthropic client: {e}")))?;
                Self::new(client.completion_model(&config.model), config.temperature)
            }
        };

        tracing::info!(
            target: TRACING_TARGET,
            provider = %config.provider,
            model = %config.model,
            "connected completion agents",
        );

        Ok(agents)
    }
}

impl std::fmt::Debug for Agents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agents").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_requires_an_api_key() {
        let config = CompletionConfig::builder().build().unwrap();
        let error = Agents::connect(&config).unwrap_err();
        assert!(error.to_string().contains("no API key"));
    }

    #[tokio::test]
    async fn connect_builds_anthropic_agents() {
        let config = CompletionConfig::builder()
            .with_provider(ProviderKind::Anthropic)
            .with_model("claude-sonnet-4-5")
            .with_api_key("sk-test")
            .build()
            .unwrap();

        assert!(Agents::connect(&config).is_ok());
    }
}
