//! Agent configuration (explicit value > prefixed env > plain env > default).

use crate::error::{JoaoError, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Round-trip bound applied when none is configured.
pub const DEFAULT_MAX_ROUND_TRIPS: usize = 20;

/// Resolved, immutable configuration for an [`Agent`](crate::agent::Agent).
///
/// Built once via [`AgentConfig::builder`]; no component performs hidden
/// environment lookups after construction.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub system_prompt: Option<String>,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub tenant_prefix: Option<String>,
    pub debug: bool,
    /// Bound on tool round-trips per request; exceeding it fails the
    /// request with [`JoaoError::RoundTripLimit`].
    pub max_round_trips: usize,
}

impl AgentConfig {
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    system_prompt: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f64>,
    tenant_prefix: Option<String>,
    debug: bool,
    max_round_trips: Option<usize>,
}

impl AgentConfigBuilder {
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Prefix for environment variables, e.g. `ALIBABA` for
    /// `ALIBABA_OPENAI_API_KEY`.
    pub fn tenant_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tenant_prefix = Some(prefix.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn max_round_trips(mut self, limit: usize) -> Self {
        self.max_round_trips = Some(limit);
        self
    }

    /// Resolve the configuration from explicit values, then `{PREFIX}_OPENAI_*`
    /// variables, then unprefixed `OPENAI_*` variables, then built-in
    /// defaults. Loads `.env` if present.
    pub fn build(self) -> Result<AgentConfig> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        self.build_with(&|name| std::env::var(name).ok())
    }

    /// Resolution against an injected lookup so precedence is testable
    /// without touching the process environment.
    fn build_with(self, env: &dyn Fn(&str) -> Option<String>) -> Result<AgentConfig> {
        let prefix = self.tenant_prefix.as_deref();

        let api_key = self
            .api_key
            .or_else(|| lookup(env, prefix, "OPENAI_API_KEY"))
            .ok_or_else(|| {
                JoaoError::Configuration(format!(
                    "missing API key: provide one explicitly or via {}OPENAI_API_KEY",
                    prefix.map(|p| format!("{p}_")).unwrap_or_default()
                ))
            })?;

        let base_url = self
            .base_url
            .or_else(|| lookup(env, prefix, "OPENAI_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        reqwest::Url::parse(&base_url).map_err(|e| {
            JoaoError::Configuration(format!("malformed base URL '{base_url}': {e}"))
        })?;

        let model = self
            .model
            .or_else(|| lookup(env, prefix, "OPENAI_MODEL"))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(AgentConfig {
            system_prompt: self.system_prompt,
            api_key,
            base_url,
            model,
            temperature: self.temperature.unwrap_or(0.0),
            tenant_prefix: self.tenant_prefix,
            debug: self.debug,
            max_round_trips: self.max_round_trips.unwrap_or(DEFAULT_MAX_ROUND_TRIPS),
        })
    }
}

/// Check the tenant-prefixed variable first, then the plain one.
fn lookup(env: &dyn Fn(&str) -> Option<String>, prefix: Option<&str>, name: &str) -> Option<String> {
    if let Some(prefix) = prefix {
        if let Some(value) = env(&format!("{prefix}_{name}")) {
            return Some(value);
        }
    }
    env(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn explicit_value_overrides_env() {
        let env = env_of(&[
            ("OPENAI_API_KEY", "env-key"),
            ("OPENAI_MODEL", "env-model"),
        ]);
        let config = AgentConfig::builder()
            .api_key("explicit-key")
            .model("explicit-model")
            .build_with(&env)
            .unwrap();
        assert_eq!(config.api_key, "explicit-key");
        assert_eq!(config.model, "explicit-model");
    }

    #[test]
    fn prefixed_env_overrides_plain_env() {
        let env = env_of(&[
            ("ACME_OPENAI_API_KEY", "acme-key"),
            ("OPENAI_API_KEY", "plain-key"),
            ("ACME_OPENAI_BASE_URL", "https://acme.example/v1"),
            ("OPENAI_BASE_URL", "https://plain.example/v1"),
        ]);
        let config = AgentConfig::builder()
            .tenant_prefix("ACME")
            .build_with(&env)
            .unwrap();
        assert_eq!(config.api_key, "acme-key");
        assert_eq!(config.base_url, "https://acme.example/v1");
    }

    #[test]
    fn plain_env_overrides_default() {
        let env = env_of(&[
            ("OPENAI_API_KEY", "plain-key"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
        ]);
        let config = AgentConfig::builder().build_with(&env).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let env = env_of(&[("OPENAI_API_KEY", "k")]);
        let config = AgentConfig::builder().build_with(&env).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_round_trips, DEFAULT_MAX_ROUND_TRIPS);
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let env = env_of(&[]);
        let err = AgentConfig::builder().build_with(&env).unwrap_err();
        assert!(matches!(err, JoaoError::Configuration(_)));
    }

    #[test]
    fn missing_prefixed_key_names_the_prefixed_variable() {
        let env = env_of(&[]);
        let err = AgentConfig::builder()
            .tenant_prefix("ACME")
            .build_with(&env)
            .unwrap_err();
        assert!(err.to_string().contains("ACME_OPENAI_API_KEY"));
    }

    #[test]
    fn malformed_base_url_is_a_configuration_error() {
        let env = env_of(&[("OPENAI_API_KEY", "k")]);
        let err = AgentConfig::builder()
            .base_url("not a url")
            .build_with(&env)
            .unwrap_err();
        assert!(matches!(err, JoaoError::Configuration(_)));
    }

    #[test]
    fn unprefixed_key_still_resolves_under_a_prefix() {
        let env = env_of(&[("OPENAI_API_KEY", "plain-key")]);
        let config = AgentConfig::builder()
            .tenant_prefix("ACME")
            .build_with(&env)
            .unwrap();
        assert_eq!(config.api_key, "plain-key");
    }
}
