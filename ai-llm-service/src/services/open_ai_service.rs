//! OpenAI (ChatGPT) service for text generation.
//!
//! Minimal, non-streaming client around an OpenAI-compatible REST API:
//! - POST {endpoint}/v1/chat/completions
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::OpenAI`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    completion::CompletionService,
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Thin client for `/v1/chat/completions`.
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    timeout: Duration,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider`, `MissingApiKey`,
    ///   `InvalidApiKey` or `InvalidEndpoint`
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::OpenAI {
            return Err(fail(ProviderErrorKind::InvalidProvider));
        }

        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| fail(ProviderErrorKind::MissingApiKey))?;

        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(fail(ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone())));
        }

        let timeout = cfg.timeout();

        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|e| fail(ProviderErrorKind::InvalidApiKey(e.to_string())))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_chat = format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'));

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            timeout,
        })
    }

    /// Performs a **non-streaming** chat completion with one user message.
    ///
    /// # Errors
    /// - [`AiLlmError::Timeout`] / [`AiLlmError::HttpTransport`] for client failures
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::Provider`] with `Decode` or `EmptyCandidates` when no
    ///   choice carries content
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, prompt);

        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            "POST {}", self.url_chat
        );

        let resp = self
            .client
            .post(&self.url_chat)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiLlmError::from_transport(e, self.timeout))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "OpenAI /v1/chat/completions returned non-success status"
            );

            return Err(fail(ProviderErrorKind::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AiLlmError::from_transport(e, self.timeout))?;
        let out: ChatCompletionResponse = serde_json::from_slice(&bytes).map_err(|e| {
            error!(
                error = %e,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "failed to decode /v1/chat/completions response"
            );
            fail(ProviderErrorKind::Decode(format!(
                "serde error: {e}; expected `choices[0].message.content`"
            )))
        })?;

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or_else(|| fail(ProviderErrorKind::EmptyCandidates))?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            answer_len = content.len(),
            "chat completion completed"
        );

        Ok(content)
    }
}

#[async_trait]
impl CompletionService for OpenAiService {
    async fn complete(&self, prompt: &str) -> Result<String, AiLlmError> {
        self.generate(prompt).await
    }

    fn model(&self) -> &str {
        &self.cfg.model
    }
}

fn fail(kind: ProviderErrorKind) -> AiLlmError {
    ProviderError::new(LlmProvider::OpenAI, kind).into()
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str) -> Self {
        Self {
            model: &cfg.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}
