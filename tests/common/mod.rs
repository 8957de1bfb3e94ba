#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tera::Tera;

use template_fill::error::UpstreamError;
use template_fill::generation::Generator;
use template_fill::model::{CompletionProvider, OutputContent, OutputItem, ProviderOutput};
use template_fill::AppState;

pub enum Reply {
    Output(ProviderOutput),
    Fail(String),
    Slow(ProviderOutput, Duration),
}

/// In-process provider that records every prompt it is given.
pub struct FakeProvider {
    reply: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn text(text: &str) -> Arc<Self> {
        Self::new(Reply::Output(ProviderOutput::Text(text.to_string())))
    }

    pub fn message_items(parts: &[&str]) -> Arc<Self> {
        let content = parts
            .iter()
            .map(|p| OutputContent::OutputText { text: p.to_string() })
            .collect();
        Self::new(Reply::Output(ProviderOutput::Items(vec![OutputItem::Message { content }])))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, _system: &str, user: &str) -> Result<ProviderOutput, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(user.to_string());
        match &self.reply {
            Reply::Output(output) => Ok(output.clone()),
            Reply::Fail(msg) => Err(UpstreamError::Call(msg.clone())),
            Reply::Slow(output, delay) => {
                tokio::time::sleep(*delay).await;
                Ok(output.clone())
            }
        }
    }
}

pub fn app_state(provider: Option<Arc<FakeProvider>>) -> AppState {
    let tera = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*")).unwrap();
    AppState {
        tera,
        generator: Generator::new(provider.map(|p| p as Arc<dyn CompletionProvider>)),
        model_name: "gpt-4o-mini".to_string(),
    }
}
