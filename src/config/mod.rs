//! Model API configuration.
//!
//! The augmentation routes talk to an Azure OpenAI deployment. Its four
//! settings are read once at startup (from flags or the environment, see
//! [`crate::cli`]) and validated together: if any is missing the service
//! refuses to start and names every missing variable.
//!
//! ## Variables
//!
//! - `AZURE_OPENAI_API_KEY` - API key sent in the `api-key` header
//! - `AZURE_OPENAI_ENDPOINT` - Resource endpoint, e.g. `https://myres.openai.azure.com`
//! - `AZURE_OPENAI_DEPLOYMENT` - Deployment name of the chat model
//! - `AZURE_OPENAI_API_VERSION` - REST API version, e.g. `2024-02-01`

use std::fmt;

pub const API_KEY_ENV: &str = "AZURE_OPENAI_API_KEY";
pub const ENDPOINT_ENV: &str = "AZURE_OPENAI_ENDPOINT";
pub const DEPLOYMENT_ENV: &str = "AZURE_OPENAI_DEPLOYMENT";
pub const API_VERSION_ENV: &str = "AZURE_OPENAI_API_VERSION";

/// Errors raised while assembling configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

/// Immutable connection settings for the model API.
#[derive(Clone, PartialEq, Eq)]
pub struct ModelConfig {
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
}

impl ModelConfig {
    /// Build a config, failing if any value is absent or blank.
    pub fn new(
        endpoint: Option<String>,
        api_key: Option<String>,
        deployment: Option<String>,
        api_version: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut take = |value: Option<String>, name: &'static str| -> String {
            match value.map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => v,
                _ => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let api_key = take(api_key, API_KEY_ENV);
        let endpoint = take(endpoint, ENDPOINT_ENV);
        let deployment = take(deployment, DEPLOYMENT_ENV);
        let api_version = take(api_version, API_VERSION_ENV);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            deployment,
            api_version,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Full URL of the chat completions endpoint for this deployment.
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

// The API key must never end up in logs.
impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .finish()
    }
}
