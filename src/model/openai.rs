use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde_json::json;

use crate::config::ProviderConfig;
use crate::error::UpstreamError;
use crate::model::{CompletionProvider, ProviderOutput, ResponseBody};

// Wrapper around the OpenAI Responses API
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, config: &ProviderConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!(
            "Using OpenAI at {} with model {} (timeout {}s)",
            config.api_base, config.model, config.timeout_secs
        );

        Ok(Self {
            client,
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<ProviderOutput, UpstreamError> {
        let url = format!("{}/responses", self.api_base);

        let payload = json!({
            "model": self.model,
            "input": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "text": { "format": { "type": "json_object" } }
        });

        debug!("Payload: {}", payload);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI returned {}: {}", status, error_text);
            return Err(UpstreamError::Call(format!("status {}", status)));
        }

        let body: ResponseBody = response.json().await?;
        Ok(body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

    async fn responses(req: HttpRequest, body: web::Json<serde_json::Value>) -> HttpResponse {
        let auth = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if auth != "Bearer sk-test" {
            return HttpResponse::Unauthorized().body("bad key");
        }
        if body["text"]["format"]["type"] != "json_object" || body["input"][0]["role"] != "system" {
            return HttpResponse::BadRequest().finish();
        }
        HttpResponse::Ok().json(serde_json::json!({
            "output": [{
                "type": "message",
                "content": [{"type": "output_text", "text": body["input"][1]["content"]}]
            }]
        }))
    }

    async fn slow() -> HttpResponse {
        actix_web::rt::time::sleep(Duration::from_secs(5)).await;
        HttpResponse::Ok().finish()
    }

    fn spawn_fake() -> String {
        let server = HttpServer::new(|| {
            App::new()
                .route("/v1/responses", web::post().to(responses))
                .route("/slow/responses", web::post().to(slow))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }

    fn config(api_base: String, timeout_secs: u64) -> ProviderConfig {
        ProviderConfig {
            api_base,
            model: "gpt-4o-mini".to_string(),
            timeout_secs,
        }
    }

    #[actix_web::test]
    async fn sends_system_and_user_turns() {
        let base = spawn_fake();
        let provider =
            OpenAiProvider::new("sk-test".to_string(), &config(format!("{}/v1", base), 10)).unwrap();

        let output = provider.complete("only json", "{\"k\":\"v\"}").await.unwrap();
        assert_eq!(output.into_text().unwrap(), "{\"k\":\"v\"}");
    }

    #[actix_web::test]
    async fn non_success_status_is_a_call_failure() {
        let base = spawn_fake();
        let provider =
            OpenAiProvider::new("sk-wrong".to_string(), &config(format!("{}/v1/", base), 10)).unwrap();

        let err = provider.complete("s", "u").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Call(msg) if !msg.contains("bad key")));
    }

    #[actix_web::test]
    async fn timeout_fails_closed() {
        let base = spawn_fake();
        let provider =
            OpenAiProvider::new("sk-test".to_string(), &config(format!("{}/slow", base), 1)).unwrap();

        let err = provider.complete("s", "u").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Call(_)));
    }
}
