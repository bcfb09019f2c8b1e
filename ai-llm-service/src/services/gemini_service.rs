//! Google Gemini service for text generation.
//!
//! Minimal, non-streaming client around the Gemini REST API:
//! - POST {endpoint}/v1beta/models/{model}:generateContent
//!
//! Auth uses the `x-goog-api-key` header. The prompt is sent as one user
//! turn; the answer is the concatenated text parts of the first candidate.
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::Gemini`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::{
    completion::CompletionService,
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Thin client for the Gemini `generateContent` endpoint.
#[derive(Debug)]
pub struct GeminiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    timeout: Duration,
}

impl GeminiService {
    /// Creates a new [`GeminiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider`, `MissingApiKey`,
    ///   `InvalidApiKey` or `InvalidEndpoint`
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Gemini {
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
        let mut key_value = header::HeaderValue::from_str(api_key.trim())
            .map_err(|e| fail(ProviderErrorKind::InvalidApiKey(e.to_string())))?;
        key_value.set_sensitive(true);
        headers.insert("x-goog-api-key", key_value);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_generate = format!(
            "{}/v1beta/models/{}:generateContent",
            endpoint.trim_end_matches('/'),
            cfg.model
        );

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "GeminiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_generate,
            timeout,
        })
    }

    /// Performs one **non-streaming** `generateContent` call.
    ///
    /// # Errors
    /// - [`AiLlmError::Timeout`] when the request exceeds the configured timeout
    /// - [`AiLlmError::HttpTransport`] for other client/network failures
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::Provider`] with `Decode`, `EmptyCandidates` or `Blocked`
    ///   when the payload carries no usable text
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = GenerateContentRequest::from_cfg(&self.cfg, prompt);

        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            "POST {}", self.url_generate
        );

        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiLlmError::from_transport(e, self.timeout))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_generate.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Gemini generateContent returned non-success status"
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
        let out: GenerateContentResponse = serde_json::from_slice(&bytes).map_err(|e| {
            error!(
                error = %e,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "failed to decode generateContent response"
            );
            fail(ProviderErrorKind::Decode(format!(
                "serde error: {e}; expected `candidates[0].content.parts[].text`"
            )))
        })?;

        let text = out.into_text()?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            answer_len = text.len(),
            "generateContent completed"
        );

        Ok(text)
    }
}

#[async_trait]
impl CompletionService for GeminiService {
    async fn complete(&self, prompt: &str) -> Result<String, AiLlmError> {
        self.generate(prompt).await
    }

    fn model(&self) -> &str {
        &self.cfg.model
    }
}

fn fail(kind: ProviderErrorKind) -> AiLlmError {
    ProviderError::new(LlmProvider::Gemini, kind).into()
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_cfg(cfg: &LlmModelConfig, prompt: &'a str) -> Self {
        let generation_config = (cfg.temperature.is_some()
            || cfg.top_p.is_some()
            || cfg.max_tokens.is_some())
        .then(|| GenerationConfig {
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_output_tokens: cfg.max_tokens,
        });

        Self {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
            generation_config,
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, AiLlmError> {
        let Some(first) = self.candidates.into_iter().next() else {
            return Err(match self.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => {
                    warn!(%reason, "Gemini blocked the prompt");
                    fail(ProviderErrorKind::Blocked(reason))
                }
                None => fail(ProviderErrorKind::EmptyCandidates),
            });
        };

        let parts: Vec<String> = first
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if parts.is_empty() {
            return Err(fail(ProviderErrorKind::Decode(format!(
                "candidate has no text parts (finishReason: {})",
                first.finish_reason.as_deref().unwrap_or("unknown")
            ))));
        }

        Ok(parts.concat())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Debug, Deserialize)]
struct PartOut {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: "gemini-test".into(),
            endpoint: endpoint.into(),
            api_key: Some("key-123".into()),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(2),
        }
    }

    const GEN_PATH: &str = "/v1beta/models/gemini-test:generateContent";

    #[tokio::test]
    async fn sends_prompt_as_single_user_turn_and_joins_parts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GEN_PATH))
            .and(header("x-goog-api-key", "key-123"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "What is 2+2?" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "  Four" }, { "text": ".\n" }] },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let svc = GeminiService::new(cfg(&server.uri())).unwrap();
        let out = svc.complete("What is 2+2?").await.unwrap();
        assert_eq!(out, "  Four.\n");
    }

    #[tokio::test]
    async fn non_success_status_is_http_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GEN_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": { "code": 429, "message": "Resource has been exhausted" }
            })))
            .mount(&server)
            .await;

        let svc = GeminiService::new(cfg(&server.uri())).unwrap();
        let err = svc.generate("q").await.unwrap_err();

        match &err {
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::HttpStatus(http),
                ..
            }) => {
                assert_eq!(http.status.as_u16(), 429);
                assert!(http.snippet.contains("Resource has been exhausted"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn blocked_prompt_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let svc = GeminiService::new(cfg(&server.uri())).unwrap();
        let err = svc.generate("q").await.unwrap_err();
        assert!(err.to_string().contains("prompt blocked: SAFETY"));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let svc = GeminiService::new(cfg(&server.uri())).unwrap();
        let err = svc.generate("q").await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::Decode(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let mut c = cfg(&server.uri());
        c.timeout_secs = Some(1);
        let svc = GeminiService::new(c).unwrap();

        let err = svc.generate("q").await.unwrap_err();
        assert!(matches!(err, AiLlmError::Timeout(d) if d == Duration::from_secs(1)));
    }

    #[test]
    fn generation_config_only_when_tuned() {
        let plain = cfg("http://x");
        let body = serde_json::to_value(GenerateContentRequest::from_cfg(&plain, "p")).unwrap();
        assert!(body.get("generationConfig").is_none());

        let mut tuned = cfg("http://x");
        tuned.temperature = Some(0.2);
        tuned.max_tokens = Some(256);
        let body = serde_json::to_value(GenerateContentRequest::from_cfg(&tuned, "p")).unwrap();
        assert_eq!(
            body["generationConfig"],
            json!({ "temperature": 0.2f32, "maxOutputTokens": 256 })
        );
    }

    #[test]
    fn rejects_wrong_provider_and_missing_key() {
        let mut c = cfg("http://x");
        c.provider = LlmProvider::OpenAI;
        assert!(GeminiService::new(c).is_err());

        let mut c = cfg("http://x");
        c.api_key = None;
        assert!(matches!(
            GeminiService::new(c),
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::MissingApiKey,
                ..
            }))
        ));
    }

    #[test]
    fn key_with_control_characters_is_invalid_key() {
        let mut c = cfg("http://x");
        c.api_key = Some("key\r\n123".into());
        assert!(matches!(
            GeminiService::new(c),
            Err(AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::InvalidApiKey(_),
                ..
            }))
        ));
    }
}
