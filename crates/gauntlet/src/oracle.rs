//! Comparator oracle adapter.
//!
//! Wraps the external chat-completion service behind the narrow [`Oracle`]
//! trait so the tournament core never sees the provider's wire format, and
//! tests can substitute a deterministic stub.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.cerebras.ai/v1";
const DEFAULT_MODEL: &str = "qwen-3-32b";
const API_KEY_VAR: &str = "CEREBRAS_API_KEY";

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

/// Errors from oracle configuration and calls.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("{0} environment variable is not set")]
    MissingApiKey(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("oracle API error: {0}")]
    RequestFailed(String),

    #[error("malformed oracle reply: {0}")]
    MalformedReply(String),
}

/// A stripped oracle reply: the usable answer text, plus the optional
/// rationale the model emitted inside a think block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub answer: String,
    pub rationale: Option<String>,
}

/// Narrow comparator interface: one prompt in, one verdict out.
///
/// No retry policy lives here; a transport failure is returned as-is and
/// retrying (if desired) belongs to the caller.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn judge(&self, prompt: &str) -> Result<Verdict, OracleError>;
}

/// Configuration for the Cerebras-backed oracle.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl OracleConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Load the credential from `CEREBRAS_API_KEY`; absence is a hard
    /// configuration error, surfaced immediately.
    pub fn from_env() -> Result<Self, OracleError> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| OracleError::MissingApiKey(API_KEY_VAR.to_string()))?;
        Ok(Self::new(api_key))
    }
}

/// Oracle backed by the Cerebras OpenAI-compatible chat-completions API.
pub struct CerebrasOracle {
    config: OracleConfig,
    client: reqwest::Client,
}

impl CerebrasOracle {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::ClientBuild(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self, OracleError> {
        Self::new(OracleConfig::from_env()?)
    }
}

#[async_trait]
impl Oracle for CerebrasOracle {
    async fn judge(&self, prompt: &str) -> Result<Verdict, OracleError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": prompt,
            }],
        });

        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| OracleError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::RequestFailed(format!(
                "oracle returned {}: {}",
                status, body
            )));
        }

        let resp_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OracleError::MalformedReply(e.to_string()))?;

        let content = resp_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                OracleError::MalformedReply("no message content in completion".to_string())
            })?;

        let (answer, rationale) = split_rationale(content);
        debug!(
            answer_len = answer.len(),
            has_rationale = rationale.is_some(),
            "Oracle replied"
        );

        Ok(Verdict { answer, rationale })
    }
}

/// Split a raw reply into `(answer, rationale)`.
///
/// The rationale is the text between the first `<think>` marker and its
/// closing `</think>`; the answer is whatever follows the last `</think>`.
/// Without markers the whole trimmed reply is the answer.
pub fn split_rationale(content: &str) -> (String, Option<String>) {
    let rationale = content.find(THINK_OPEN).and_then(|start| {
        let after = &content[start + THINK_OPEN.len()..];
        after
            .find(THINK_CLOSE)
            .map(|end| after[..end].trim().to_string())
    });

    let answer = match content.rfind(THINK_CLOSE) {
        Some(end) => content[end + THINK_CLOSE.len()..].trim().to_string(),
        None => content.trim().to_string(),
    };

    (answer, rationale)
}
