//! Configuration for the model-backed collaborators.

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use derive_builder::Builder;
use quill_core::{Error, Result};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Default model when none is configured.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Completion provider backing the agents.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString)]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[cfg_attr(feature = "config", value(name = "openai"))]
    OpenAi,
    Anthropic,
}

/// Provider, model and credentials for the planner, fixer and arbiter agents.
#[derive(Clone, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[builder(
    name = "CompletionConfigBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct CompletionConfig {
    /// Completion provider.
    #[cfg_attr(
        feature = "config",
        arg(long = "provider", env = "QUILL_PROVIDER", value_enum, default_value_t = ProviderKind::OpenAi)
    )]
    #[builder(default)]
    pub provider: ProviderKind,

    /// Model name passed to the provider.
    #[cfg_attr(
        feature = "config",
        arg(long = "model", env = "QUILL_MODEL", default_value = DEFAULT_MODEL)
    )]
    #[builder(default = "DEFAULT_MODEL.to_string()")]
    pub model: String,

    /// Provider API key.
    #[cfg_attr(
        feature = "config",
        arg(long = "api-key", env = "QUILL_API_KEY", hide_env_values = true)
    )]
    #[serde(skip_serializing, default)]
    #[builder(default)]
    pub api_key: Option<String>,

    /// Sampling temperature for every agent.
    #[cfg_attr(feature = "config", arg(long = "temperature", env = "QUILL_TEMPERATURE"))]
    #[builder(default)]
    pub temperature: Option<f64>,
}

impl CompletionConfigBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(model) = &self.model
            && model.trim().is_empty()
        {
            return Err("model name must not be empty".into());
        }
        if let Some(Some(temperature)) = self.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(format!("temperature {temperature} is outside 0.0..=2.0"));
        }
        Ok(())
    }
}

impl CompletionConfig {
    /// Returns a new builder.
    pub fn builder() -> CompletionConfigBuilder {
        CompletionConfigBuilder::default()
    }

    /// Returns the API key, or a configuration error if none is set.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::config(format!("no API key configured for {}", self.provider)))
    }
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = CompletionConfig::builder().build().unwrap();

        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.api_key().is_err());
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let result = CompletionConfig::builder().with_temperature(3.5).build();
        assert!(result.is_err());
    }

    #[test]
    fn api_key_is_never_printed_or_serialized() {
        let config = CompletionConfig::builder()
            .with_provider(ProviderKind::Anthropic)
            .with_api_key("sk-secret")
            .build()
            .unwrap();

        assert_eq!(config.api_key().unwrap(), "sk-secret");
        assert!(!format!("{config:?}").contains("sk-secret"));
        assert!(!serde_json::to_string(&config).unwrap().contains("sk-secret"));
    }

    #[test]
    fn provider_names() {
        assert_eq!(ProviderKind::OpenAi.as_ref(), "openai");
        assert_eq!("anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
    }
}
