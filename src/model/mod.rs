pub mod openai;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::UpstreamError;

pub use openai::OpenAiProvider;

/// A chat-completion backend that answers a system + user turn pair.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, system: &str, user: &str) -> Result<ProviderOutput, UpstreamError>;
}

/// What a provider hands back: either a ready text field or a list of
/// structured output items that still need to be flattened.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutput {
    Text(String),
    Items(Vec<OutputItem>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum OutputItem {
    #[serde(rename = "message")]
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum OutputContent {
    #[serde(rename = "output_text")]
    OutputText { text: String },
    #[serde(other)]
    Other,
}

impl ProviderOutput {
    pub fn into_text(self) -> Result<String, UpstreamError> {
        let text = match self {
            ProviderOutput::Text(text) => text,
            ProviderOutput::Items(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    OutputItem::Message { content } => Some(content),
                    OutputItem::Other => None,
                })
                .flatten()
                .filter_map(|part| match part {
                    OutputContent::OutputText { text } => Some(text),
                    OutputContent::Other => None,
                })
                .collect::<String>(),
        };

        if text.is_empty() {
            return Err(UpstreamError::Empty);
        }
        Ok(text)
    }
}

/// Raw response body; both shapes may be present.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseBody {
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

impl From<ResponseBody> for ProviderOutput {
    fn from(body: ResponseBody) -> Self {
        match body.output_text {
            Some(text) if !text.is_empty() => ProviderOutput::Text(text),
            _ => ProviderOutput::Items(body.output),
        }
    }
}
