use contextor::Answer;
use serde::{Deserialize, Serialize};

/// Request body for `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's question, passed to the model as-is.
    pub query: String,
}

/// Response body for `POST /chat`.
///
/// Always sent with status 200; failures are carried in-band by `answer`
/// and flagged by `error`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    /// Reserved for citations. Currently always empty.
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl From<Answer> for ChatResponse {
    fn from(answer: Answer) -> Self {
        Self {
            error: answer.status.error_code(),
            answer: answer.text,
            sources: Vec::new(),
        }
    }
}
