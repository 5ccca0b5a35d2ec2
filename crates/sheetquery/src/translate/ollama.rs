//! Translator backed by an Ollama server's `/api/chat` endpoint.
//!
//! Requests ask for `format: json` so the reply body is the plan itself.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{Result, SheetQueryError};

use super::prompts;
use super::provider::{QueryPlan, TableCatalog, Translator, TranslatorConfig};

const DEFAULT_HOST: &str = "http://localhost:11434";

/// Model used when none is configured.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Ollama translator.
pub struct OllamaProvider {
    client: Client,
    api_url: String,
    config: TranslatorConfig,
}

impl OllamaProvider {
    /// Translator against `localhost:11434` with [`DEFAULT_OLLAMA_MODEL`].
    pub fn new() -> Result<Self> {
        Self::with_host(DEFAULT_HOST, Self::default_config())
    }

    /// Translator against a specific host, e.g. `http://gpu-box:11434`.
    pub fn with_host(host: &str, config: TranslatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| SheetQueryError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: format!("{}/api/chat", host.trim_end_matches('/')),
            config,
        })
    }

    /// Host from `OLLAMA_HOST` if set.
    pub fn from_env_with_config(config: TranslatorConfig) -> Result<Self> {
        let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        Self::with_host(&host, config)
    }

    pub fn default_config() -> TranslatorConfig {
        TranslatorConfig {
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            ..TranslatorConfig::default()
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request_body(&self, question_prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "stream": false,
            "format": "json",
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.max_tokens
            },
            "messages": [
                {"role": "system", "content": prompts::system_prompt()},
                {"role": "user", "content": question_prompt}
            ]
        })
    }

    /// Post one question prompt and return the model's reply text.
    fn complete(&self, question_prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .json(&self.request_body(question_prompt))
            .send()
            .map_err(|e| {
                let reason = if e.is_connect() {
                    format!("no Ollama server at {}", self.api_url)
                } else {
                    e.to_string()
                };
                SheetQueryError::Translation(format!("Ollama request failed: {}", reason))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SheetQueryError::Translation(format!(
                "Ollama returned {} for model '{}': {}",
                status, self.config.model, body
            )));
        }

        let reply: OllamaResponse = response.json().map_err(|e| {
            SheetQueryError::Translation(format!("Unreadable Ollama response: {}", e))
        })?;
        Ok(reply.message.content)
    }
}

impl Translator for OllamaProvider {
    fn translate(&self, question: &str, catalog: &TableCatalog) -> Result<QueryPlan> {
        let reply = self.complete(&prompts::query_prompt(question, catalog)?)?;
        QueryPlan::from_reply(&reply)
    }

    fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_from_host() {
        let provider =
            OllamaProvider::with_host("http://gpu-box:11434/", OllamaProvider::default_config())
                .unwrap();
        assert_eq!(provider.api_url(), "http://gpu-box:11434/api/chat");
        assert_eq!(provider.config().model, "llama3.2");
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_request_body_asks_for_json() {
        let provider = OllamaProvider::new().unwrap();
        let body = provider.request_body("User question: \"how many?\"");

        assert_eq!(body["format"], "json");
        assert_eq!(body["stream"], false);
        assert_eq!(body["model"], DEFAULT_OLLAMA_MODEL);
        assert_eq!(body["messages"][0]["content"], prompts::system_prompt());
        assert_eq!(body["messages"][1]["role"], "user");
    }

    #[test]
    fn test_unreachable_host_is_a_translation_error() {
        let provider =
            OllamaProvider::with_host("http://127.0.0.1:1", OllamaProvider::default_config())
                .unwrap();
        let err = provider.translate("q", &TableCatalog::default()).unwrap_err();
        assert!(matches!(err, SheetQueryError::Translation(_)));
    }
}
