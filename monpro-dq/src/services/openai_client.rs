//! OpenAI-compatible chat completion client
//!
//! Thin HTTP client over the chat completions API with explicit
//! timeouts. The response contract is a single assistant message whose
//! content the battlecard generator parses; this client only handles
//! transport and status concerns.

use monpro_common::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

/// Chat completions response (only the fields the pipeline reads)
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

/// Chat completion client with configured timeouts
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_key` - bearer credential for the API
    /// * `model` - chat model identifier (default: gpt-4o)
    /// * `base_url` - OpenAI-compatible API root (default: api.openai.com)
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be built (should not happen with
    /// valid defaults)
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(45))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// Run one system+user chat exchange and return the raw assistant text
    ///
    /// # Errors
    /// Returns error if the request fails (network, timeout), the API
    /// responds non-2xx, or the response carries no choices.
    pub async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": 0.7,
            "max_tokens": 1500,
        });

        tracing::debug!(model = %self.model, "Calling chat completions API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Internal(format!("LLM API request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Internal(format!(
                "LLM API returned error status: {}",
                status
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Failed to parse LLM response: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(Error::Internal("LLM response contained no content".to_string()));
        }

        Ok(content)
    }

    /// Model identifier this client is configured for
    pub fn model(&self) -> &str {
        &self.model
    }
}
