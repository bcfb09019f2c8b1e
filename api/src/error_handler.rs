use ai_llm_service::AiLlmError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contextor::ContextorError;
use policy_ingest::IngestError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Http { status, .. } => *status,
            AppError::Llm(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Llm(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Http { code, .. } => code,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Keeps axum's own status (400 syntax, 415 content type, 422 shape).
impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        let status = err.status();
        let code = match status {
            StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_ENTITY",
            StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
            _ => "BAD_REQUEST",
        };
        AppError::Http {
            status,
            code,
            message: err.body_text(),
        }
    }
}

/// Reload failures: a vanished file is 404, anything else 500.
impl From<ContextorError> for AppError {
    fn from(err: ContextorError) -> Self {
        match err {
            ContextorError::Ingest(IngestError::NotFound(path)) => AppError::Http {
                status: StatusCode::NOT_FOUND,
                code: "POLICY_NOT_FOUND",
                message: format!("policy file not found at {}", path.display()),
            },
            ContextorError::Ingest(e @ IngestError::LoadFailure { .. }) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "POLICY_LOAD_FAILED",
                message: e.to_string(),
            },
            ContextorError::Join(e) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "POLICY_LOAD_FAILED",
                message: format!("background load task failed: {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn vanished_policy_maps_to_404() {
        let err = AppError::from(ContextorError::Ingest(IngestError::NotFound(PathBuf::from(
            "data/p.txt",
        ))));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "POLICY_NOT_FOUND");
        assert!(err.to_string().contains("data/p.txt"));
    }

    #[test]
    fn infrastructure_errors_are_500() {
        let err = AppError::Bind(std::io::Error::other("in use"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "BIND_ERROR");
    }
}
