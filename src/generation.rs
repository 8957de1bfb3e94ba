//! Placeholder generation: prompt construction, the provider round trip and
//! turning the provider's text back into a [`GenerationResult`].

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, error, info};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{GenerationError, UpstreamError};
use crate::model::CompletionProvider;
use crate::web::models::{ChatMessage, GenerationRequest, GenerationResult, PlaceholderMap};

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant that only responds with JSON objects mapping placeholder names to filled values. Do not include any additional commentary.";

pub const NO_CONVERSATION: &str = "No conversation provided.";
pub const NOTHING_FILLED: &str = "No placeholders were filled.";

pub fn format_conversation(messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return NO_CONVERSATION.to_string();
    }
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str().to_uppercase(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(request: &GenerationRequest) -> String {
    let existing =
        serde_json::to_string(&request.placeholders).unwrap_or_else(|_| "{}".to_string());

    format!(
        "Fill the following placeholders based on the user input.\n\
         Template:\n{}\n\
         Existing placeholder values (if any): {}\n\
         User context: {}\n\
         Return valid JSON with placeholder names as keys and filled values as strings.",
        request.template,
        existing,
        format_conversation(&request.messages)
    )
}

// Models sometimes answer numbers or booleans unquoted
#[derive(Deserialize)]
#[serde(untagged)]
enum FilledValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl From<FilledValue> for String {
    fn from(value: FilledValue) -> Self {
        match value {
            FilledValue::Text(text) => text,
            FilledValue::Number(n) => n.to_string(),
            FilledValue::Flag(b) => b.to_string(),
        }
    }
}

/// Decodes a JSON object whose values are strings, numbers or booleans.
/// Anything else (nulls, nested values, non-objects) is a parse failure.
pub fn parse_placeholders(text: &str) -> Result<PlaceholderMap, UpstreamError> {
    let raw: IndexMap<String, FilledValue> = serde_json::from_str(text)?;
    Ok(raw.into_iter().map(|(k, v)| (k, v.into())).collect())
}

pub fn summarize(placeholders: &PlaceholderMap) -> String {
    if placeholders.is_empty() {
        return NOTHING_FILLED.to_string();
    }
    placeholders
        .iter()
        .map(|(key, value)| format!("{{{{{}}}}}: {}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Stateless per-call pipeline. `provider` is `None` when no credential is
/// configured; every call then fails as misconfigured.
#[derive(Clone)]
pub struct Generator {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl Generator {
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { provider }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(GenerationError::ServerMisconfigured)?;

        if request.template.is_empty() {
            return Err(GenerationError::BadRequest("Template is required.".to_string()));
        }

        let request_id = Uuid::new_v4();
        info!(
            "[{}] generating with {} ({} placeholders, {} messages)",
            request_id,
            provider.name(),
            request.placeholders.len(),
            request.messages.len()
        );

        let prompt = build_prompt(request);
        debug!("[{}] prompt: {}", request_id, prompt);

        match Self::fill(provider.as_ref(), &prompt).await {
            Ok(placeholders) => {
                info!("[{}] filled {} placeholders", request_id, placeholders.len());
                Ok(GenerationResult {
                    assistant_message: summarize(&placeholders),
                    placeholders,
                })
            }
            Err(e) => {
                error!("[{}] provider request failed: {}", request_id, e);
                Err(e.into())
            }
        }
    }

    async fn fill(
        provider: &dyn CompletionProvider,
        prompt: &str,
    ) -> Result<PlaceholderMap, UpstreamError> {
        let output = provider.complete(SYSTEM_INSTRUCTION, prompt).await?;
        let text = output.into_text()?;
        parse_placeholders(&text)
    }
}
