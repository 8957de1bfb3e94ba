use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::web::models::ErrorBody;

pub const MISSING_KEY_MESSAGE: &str =
    "Missing OpenAI API key. Set OPENAI_API_KEY in your environment.";
pub const UPSTREAM_MESSAGE: &str = "Failed to generate placeholder values. Please try again.";

/// Failures on the provider side of a generation call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("provider call failed: {0}")]
    Call(String),
    #[error("empty response from provider")]
    Empty,
    #[error("provider output is not a JSON object of strings: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Call(format!("timed out: {}", e))
        } else {
            UpstreamError::Call(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{}", MISSING_KEY_MESSAGE)]
    ServerMisconfigured,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl GenerationError {
    /// The message shown to the client. Upstream causes stay server-side.
    pub fn public_message(&self) -> String {
        match self {
            GenerationError::BadRequest(msg) => msg.clone(),
            GenerationError::ServerMisconfigured => MISSING_KEY_MESSAGE.to_string(),
            GenerationError::Upstream(_) => UPSTREAM_MESSAGE.to_string(),
        }
    }
}

impl ResponseError for GenerationError {
    fn status_code(&self) -> StatusCode {
        match self {
            GenerationError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GenerationError::ServerMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            GenerationError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorBody {
            status_code: status.as_u16(),
            status_message: self.public_message(),
        })
    }
}
