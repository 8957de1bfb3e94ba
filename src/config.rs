use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Checked per request, so the server still starts without one.
    pub api_key: Option<String>,
    pub provider: ProviderConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match lookup("PORT") {
            Some(v) => v.parse::<u16>().with_context(|| format!("invalid PORT: {}", v))?,
            None => 8080,
        };
        let timeout_secs = match lookup("OPENAI_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .with_context(|| format!("invalid OPENAI_TIMEOUT_SECS: {}", v))?,
            None => 60,
        };

        Ok(Self {
            host,
            port,
            api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            provider: ProviderConfig {
                api_base: lookup("OPENAI_API_BASE")
                    .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                model: lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
                timeout_secs,
            },
        })
    }
}
