//! Caller-side requester for `POST /api/generate`.
//!
//! [`GenerateClient`] keeps its own loading flag and error slot; nothing is
//! global, so independent clients never observe each other's state. Calls on
//! one client are taken in turn.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use log::{debug, error};
use reqwest::Client;
use thiserror::Error;

use crate::web::models::{ErrorBody, GenerationRequest, GenerationResult};

pub const FALLBACK_ERROR: &str = "Unable to contact the AI service. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Error)]
enum RequestError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("server responded with {status}")]
    Status { status: u16, message: Option<String> },
}

impl RequestError {
    fn user_message(&self) -> String {
        match self {
            RequestError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => FALLBACK_ERROR.to_string(),
        }
    }
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct GenerateClient {
    http: Client,
    endpoint: String,
    turn: tokio::sync::Mutex<()>,
    loading: AtomicBool,
    error: Mutex<Option<String>>,
}

impl GenerateClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http(Client::new(), base_url)
    }

    pub fn with_http(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
            turn: tokio::sync::Mutex::new(()),
            loading: AtomicBool::new(false),
            error: Mutex::new(None),
        }
    }

    pub fn status(&self) -> RequestStatus {
        RequestStatus {
            loading: self.loading.load(Ordering::SeqCst),
            error: self.error_slot().clone(),
        }
    }

    /// Returns `None` on any failure; the reason is left in [`Self::status`].
    pub async fn generate(&self, request: &GenerationRequest) -> Option<GenerationResult> {
        let _turn = self.turn.lock().await;

        *self.error_slot() = None;
        self.loading.store(true, Ordering::SeqCst);
        let _loading = LoadingGuard(&self.loading);

        match self.send(request).await {
            Ok(result) => Some(result),
            Err(e) => {
                error!("AI generation failed: {}", e);
                *self.error_slot() = Some(e.user_message());
                None
            }
        }
    }

    async fn send(&self, request: &GenerationRequest) -> Result<GenerationResult, RequestError> {
        debug!("POST {}", self.endpoint);
        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .map(|body| body.status_message)
                .filter(|m| !m.is_empty());
            return Err(RequestError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    fn error_slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.error.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = GenerateClient::new("http://localhost:8080/");
        assert_eq!(client.endpoint, "http://localhost:8080/api/generate");
    }

    #[test]
    fn fresh_client_is_idle() {
        let client = GenerateClient::new("http://localhost:8080");
        assert_eq!(client.status(), RequestStatus::default());
    }

    #[test]
    fn status_message_preferred_over_fallback() {
        let with_message = RequestError::Status {
            status: 400,
            message: Some("Template is required.".to_string()),
        };
        assert_eq!(with_message.user_message(), "Template is required.");

        let without = RequestError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(without.user_message(), FALLBACK_ERROR);
    }
}
