//! Translator backed by the OpenAI chat completions API.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{Result, SheetQueryError};

use super::prompts;
use super::provider::{QueryPlan, TableCatalog, Translator, TranslatorConfig};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI translator.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    config: TranslatorConfig,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, TranslatorConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: TranslatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SheetQueryError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Key from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_config(TranslatorConfig::default())
    }

    /// Key from `OPENAI_API_KEY`, with custom model settings.
    pub fn from_env_with_config(config: TranslatorConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            SheetQueryError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Self::with_config(api_key, config)
    }

    fn request_body(&self, question_prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                {"role": "system", "content": prompts::system_prompt()},
                {"role": "user", "content": question_prompt}
            ]
        })
    }

    /// Post one question prompt and return the first choice's text.
    fn complete(&self, question_prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(question_prompt))
            .send()
            .map_err(|e| SheetQueryError::Translation(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SheetQueryError::Translation(format!(
                "OpenAI returned {}: {}",
                status, body
            )));
        }

        let reply: OpenAIResponse = response.json().map_err(|e| {
            SheetQueryError::Translation(format!("Unreadable OpenAI response: {}", e))
        })?;
        reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| SheetQueryError::Translation("OpenAI returned no choices".to_string()))
    }
}

impl Translator for OpenAIProvider {
    fn translate(&self, question: &str, catalog: &TableCatalog) -> Result<QueryPlan> {
        let reply = self.complete(&prompts::query_prompt(question, catalog)?)?;
        QueryPlan::from_reply(&reply)
    }

    fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_uses_config() {
        let provider = OpenAIProvider::with_config(
            "sk-test",
            TranslatorConfig {
                model: "gpt-4o-mini".to_string(),
                ..TranslatorConfig::default()
            },
        )
        .unwrap();
        let body = provider.request_body("User question: \"total?\"");

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "User question: \"total?\"");
        assert_eq!(provider.name(), "openai");
    }
}
