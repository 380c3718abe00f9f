//! Client for the text-generation API.
//!
//! [`CompletionModel`] is the seam the augmentation flows depend on; the
//! production implementation, [`AzureOpenAiClient`], calls an Azure OpenAI
//! chat-completions deployment with a blocking HTTP request. There is no
//! retry and no streaming: the first failure is returned to the caller.

use serde::Deserialize;
use serde_json::json;

use super::ModelError;
use crate::config::ModelConfig;

/// Sampling temperature for every request
const TEMPERATURE: f64 = 0.7;

/// Upper bound on generated tokens per request
const MAX_TOKENS: u32 = 500;

/// User-Agent header sent with every request
const USER_AGENT: &str = concat!("taskdeck/", env!("CARGO_PKG_VERSION"));

/// A text-generation model.
///
/// Implementations block until the model has answered.
pub trait CompletionModel: Send + Sync {
    /// Generate a reply to `prompt` under the given system role.
    fn complete(&self, system_role: &str, prompt: &str) -> Result<String, ModelError>;
}

/// Response from the chat completions endpoint (only fields we care about).
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Azure OpenAI chat-completions client.
pub struct AzureOpenAiClient {
    config: ModelConfig,
    agent: ureq::Agent,
}

impl AzureOpenAiClient {
    pub fn new(config: ModelConfig) -> Self {
        let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).build();
        Self { config, agent }
    }
}

impl CompletionModel for AzureOpenAiClient {
    fn complete(&self, system_role: &str, prompt: &str) -> Result<String, ModelError> {
        let body = json!({
            "messages": [
                { "role": "system", "content": system_role },
                { "role": "user", "content": prompt },
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        tracing::debug!(deployment = %self.config.deployment(), "calling model");

        let response = self
            .agent
            .post(&self.config.chat_completions_url())
            .set("api-key", self.config.api_key())
            .set("Accept", "application/json")
            .send_json(body);

        match response {
            Ok(resp) => {
                let completion: ChatCompletionResponse = resp
                    .into_json()
                    .map_err(|e| ModelError::Response(e.to_string()))?;
                extract_content(completion)
            }
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(ModelError::Status { status, body })
            }
            Err(e) => Err(ModelError::Transport(e.to_string())),
        }
    }
}

/// Pull the trimmed text of the first choice out of a completion.
fn extract_content(completion: ChatCompletionResponse) -> Result<String, ModelError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| ModelError::Response("no message content in completion".to_string()))
}
