// Claude API client for trade explanations.
//
// Explanations are short (a 150-word cap is baked into the prompt), so a
// single non-streaming Messages API call is enough.

use anyhow::{bail, Context};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::db::TradeReportRow;
use crate::llm::prompt;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

// ---------------------------------------------------------------------------
// ClaudeClient
// ---------------------------------------------------------------------------

/// Low-level Claude Messages API client.
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeClient {
    /// Create a new client with the given API key, model identifier, and
    /// response token cap.
    pub fn new(api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            max_tokens,
        }
    }

    /// Send one message and return the concatenated text content of the
    /// response.
    pub async fn send_message(&self, system: &str, user_content: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": system,
            "messages": [{ "role": "user", "content": user_content }]
        });

        let response = self
            .http
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("failed to send message request")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("message request failed with status {status}: {detail}");
        }

        let value: Value = response
            .json()
            .await
            .context("failed to parse message response")?;
        debug!(model = %self.model, "message response received");

        extract_text(&value)
            .context("message response contained no text content")
    }
}

/// Pull the text blocks out of a Messages API response body.
fn extract_text(value: &Value) -> Option<String> {
    let blocks = value.get("content")?.as_array()?;
    let text: String = blocks
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|b| b.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("");
    (!text.is_empty()).then(|| text.trim().to_string())
}

// ---------------------------------------------------------------------------
// LlmClient
// ---------------------------------------------------------------------------

/// Trade explanation client. Disabled when no API key is configured, in
/// which case callers simply skip the explanation.
pub enum LlmClient {
    Active(ClaudeClient),
    Disabled,
}

impl LlmClient {
    /// Build a client from config: active only when an API key is present.
    pub fn from_config(config: &Config) -> Self {
        match config.credentials.anthropic_api_key.as_deref() {
            Some(key) if !key.is_empty() => LlmClient::Active(ClaudeClient::new(
                key.to_string(),
                config.llm.model.clone(),
                config.llm.max_tokens,
            )),
            _ => LlmClient::Disabled,
        }
    }

    /// Generate a plain-language explanation for a persisted trade report.
    /// Returns None when the client is disabled.
    pub async fn explain_trade(&self, report: &TradeReportRow) -> anyhow::Result<Option<String>> {
        match self {
            LlmClient::Disabled => Ok(None),
            LlmClient::Active(client) => {
                let text = client
                    .send_message(
                        &prompt::system_prompt(),
                        &prompt::build_trade_explanation_prompt(report),
                    )
                    .await?;
                Ok(Some(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_joins_text_blocks() {
        let value = serde_json::json!({
            "content": [
                { "type": "text", "text": "Good trade. " },
                { "type": "tool_use", "id": "x" },
                { "type": "text", "text": "RB improves." }
            ]
        });
        assert_eq!(
            extract_text(&value).as_deref(),
            Some("Good trade. RB improves.")
        );
    }

    #[test]
    fn extract_text_rejects_empty_content() {
        assert!(extract_text(&serde_json::json!({ "content": [] })).is_none());
        assert!(extract_text(&serde_json::json!({})).is_none());
    }

    #[tokio::test]
    async fn disabled_client_returns_none() {
        let report = TradeReportRow {
            id: 1,
            other_roster: "Rivals".into(),
            give: vec![],
            receive: vec![],
            before_strength: 0.0,
            after_strength: 0.0,
            delta: 0.0,
            rationale: String::new(),
            created_at: chrono::Utc::now(),
        };
        let client = LlmClient::Disabled;
        assert!(client.explain_trade(&report).await.unwrap().is_none());
    }
}
