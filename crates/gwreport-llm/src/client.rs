// Local LLM client for the Ollama generate endpoint.
//
// Sends the assembled prompt with `stream: false` and returns the generated
// text in one piece. Failures are reported to the caller, never retried.

use anyhow::{bail, Context};
use serde_json::Value;
use tracing::{debug, info};

use gwreport_core::config::Config;

// ---------------------------------------------------------------------------
// OllamaClient
// ---------------------------------------------------------------------------

/// Low-level client for one model on one generate endpoint.
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a completion for `prompt`.
    pub async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        debug!(endpoint = %self.endpoint, model = %self.model, "POST generate");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("failed to reach LLM endpoint {}", self.endpoint))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("failed to read LLM response body")?;
        if !status.is_success() {
            bail!("LLM endpoint returned status {status}: {text}");
        }

        let generated = parse_generate_response(&text)?;
        info!(chars = generated.len(), "LLM generation complete");
        Ok(generated)
    }
}

// ---------------------------------------------------------------------------
// LlmClient wrapper
// ---------------------------------------------------------------------------

/// Either an active Ollama client or disabled.
pub enum LlmClient {
    Active(OllamaClient),
    /// `llm.enabled = false` in config.
    Disabled,
}

impl LlmClient {
    /// `Active` when `llm.enabled` is set, otherwise `Disabled`.
    pub fn from_config(config: &Config) -> Self {
        if config.llm.enabled {
            LlmClient::Active(OllamaClient::new(
                config.llm.endpoint.clone(),
                config.llm.model.clone(),
            ))
        } else {
            LlmClient::Disabled
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, LlmClient::Active(_))
    }

    pub async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        match self {
            LlmClient::Active(client) => client.generate(prompt).await,
            LlmClient::Disabled => bail!("LLM not configured"),
        }
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Extract `response` from a non-streaming generate reply.
///
/// Expected shape: `{ "model": "...", "response": "...", "done": true }`
pub(crate) fn parse_generate_response(data: &str) -> anyhow::Result<String> {
    let v: Value = serde_json::from_str(data).context("LLM reply is not valid JSON")?;
    match v.get("response").and_then(Value::as_str) {
        Some(text) => Ok(text.to_string()),
        None => bail!("LLM reply has no `response` field"),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
