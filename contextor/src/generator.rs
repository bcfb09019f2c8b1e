//! Answer generation: prompt assembly + one completion call + outcome mapping.
//!
//! Every outcome is a plain [`Answer`]. Failures never escape as errors;
//! they become fixed in-band text plus an [`AnswerStatus`] that callers can
//! surface as a machine-readable code.

use std::{sync::Arc, time::Instant};

use ai_llm_service::CompletionService;
use tracing::{error, info, warn};

use crate::prompt::PromptTemplate;

/// Answer returned when no completion service is configured.
pub const CONFIG_ERROR_ANSWER: &str = "System configuration error: API Key missing.";

/// Prefix of answers produced when the completion call fails.
pub const GENERATION_ERROR_PREFIX: &str = "Error generating response: ";

/// How an [`Answer`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStatus {
    /// Model output, verbatim.
    Answered,
    /// No credential: fixed message, no network call made.
    ConfigurationError,
    /// The completion call failed; the text embeds the cause.
    GenerationFailure,
}

impl AnswerStatus {
    /// Stable code for API clients; `None` for successful answers.
    pub fn error_code(self) -> Option<&'static str> {
        match self {
            AnswerStatus::Answered => None,
            AnswerStatus::ConfigurationError => Some("CONFIG_ERROR"),
            AnswerStatus::GenerationFailure => Some("GENERATION_FAILED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub status: AnswerStatus,
}

/// Stateless per call; cheap to share behind `Arc`.
pub struct AnswerGenerator {
    completion: Option<Arc<dyn CompletionService>>,
    template: PromptTemplate,
}

impl AnswerGenerator {
    /// `completion = None` puts the generator in configuration-error mode.
    pub fn new(completion: Option<Arc<dyn CompletionService>>, template: PromptTemplate) -> Self {
        Self {
            completion,
            template,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.completion.is_some()
    }

    /// Answers `query` from `context` with a single completion call.
    pub async fn generate(&self, query: &str, context: &str) -> Answer {
        let Some(completion) = self.completion.as_ref() else {
            warn!("chat request rejected: completion service not configured");
            return Answer {
                text: CONFIG_ERROR_ANSWER.to_string(),
                status: AnswerStatus::ConfigurationError,
            };
        };

        if context.is_empty() {
            warn!("no policy document loaded; answering with an empty context");
        }

        let prompt = self.template.build(context, query);
        let started = Instant::now();

        match completion.complete(&prompt).await {
            Ok(text) => {
                info!(
                    model = completion.model(),
                    prompt_len = prompt.len(),
                    answer_len = text.len(),
                    latency_ms = started.elapsed().as_millis(),
                    "answer generated"
                );
                Answer {
                    text,
                    status: AnswerStatus::Answered,
                }
            }
            Err(err) => {
                error!(
                    model = completion.model(),
                    error = %err,
                    latency_ms = started.elapsed().as_millis(),
                    "answer generation failed"
                );
                Answer {
                    text: format!("{GENERATION_ERROR_PREFIX}{err}"),
                    status: AnswerStatus::GenerationFailure,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::Path,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use ai_llm_service::AiLlmError;
    use async_trait::async_trait;

    use super::*;

    /// Records prompts and replies with a canned result.
    struct MockCompletion {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
        reply: Result<String, Duration>,
    }

    impl MockCompletion {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                reply: Ok(reply.to_string()),
            })
        }

        fn timing_out() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                reply: Err(Duration::from_secs(30)),
            })
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl CompletionService for MockCompletion {
        async fn complete(&self, prompt: &str) -> Result<String, AiLlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(d) => Err(AiLlmError::Timeout(*d)),
            }
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }

    fn generator(mock: &Arc<MockCompletion>) -> AnswerGenerator {
        let svc: Arc<dyn CompletionService> = mock.clone();
        AnswerGenerator::new(Some(svc), PromptTemplate::new("Test Org"))
    }

    #[tokio::test]
    async fn loaded_text_reaches_prompt_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.txt");
        let body = "Rule 1: keep receipts.\n\n  Rule 2: ✈ needs approval.  \n";
        std::fs::write(&path, body).unwrap();

        let context = policy_ingest::load_txt_text(Path::new(&path)).unwrap();
        let mock = MockCompletion::ok("ok");
        generator(&mock).generate("What about receipts?", &context).await;

        let prompt = mock.last_prompt();
        assert!(prompt.contains(&format!("CONTEXT:\n{body}\n\nUSER QUESTION:\n")));
        assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn model_output_is_returned_verbatim() {
        let mock = MockCompletion::ok("  Yes, see Section 4.2.\n\n");
        let answer = generator(&mock).generate("q", "ctx").await;

        assert_eq!(answer.text, "  Yes, see Section 4.2.\n\n");
        assert_eq!(answer.status, AnswerStatus::Answered);
        assert_eq!(answer.status.error_code(), None);
    }

    #[tokio::test]
    async fn missing_service_fails_fast() {
        let generator = AnswerGenerator::new(None, PromptTemplate::default());
        assert!(!generator.is_configured());

        let answer = generator.generate("q", "ctx").await;
        assert_eq!(answer.text, CONFIG_ERROR_ANSWER);
        assert_eq!(answer.status, AnswerStatus::ConfigurationError);
        assert_eq!(answer.status.error_code(), Some("CONFIG_ERROR"));
    }

    #[tokio::test]
    async fn failures_become_in_band_text() {
        let mock = MockCompletion::timing_out();
        let answer = generator(&mock).generate("q", "ctx").await;

        assert!(answer.text.starts_with("Error generating response: "));
        assert!(answer.text.contains("timed out after 30s"), "{}", answer.text);
        assert_eq!(answer.status, AnswerStatus::GenerationFailure);
        assert_eq!(answer.status.error_code(), Some("GENERATION_FAILED"));
        assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_context_is_still_sent() {
        let mock = MockCompletion::ok("I cannot find the answer in the provided policy documents.");
        let answer = generator(&mock).generate("anything?", "").await;

        assert_eq!(answer.status, AnswerStatus::Answered);
        assert!(mock.last_prompt().contains("CONTEXT:\n\n\nUSER QUESTION:\nanything?\n"));
    }
}
