// src/providers/anthropic.rs
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use log::warn;
use reqwest::Client;
use serde_json::{Value, json};

use super::{CompletionRequest, ModelProvider, TEMPERATURE, send_json};
use crate::config::ProviderConfig;
use crate::errors::BeforeAfterError;
use crate::models::{Provider, Task};
use crate::services::image_processor::detect_mime_type;

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig, client: Client) -> Self {
        if config.api_key.is_none() {
            warn!("Anthropic API key not provided - Anthropic features will be unavailable");
        }
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            client,
        }
    }

    fn message_content(request: &CompletionRequest<'_>) -> Value {
        if request.images.is_empty() {
            return json!(request.prompt);
        }

        let mut parts = vec![json!({
            "type": "text",
            "text": request.prompt
        })];
        parts.extend(request.images.iter().map(|image| {
            json!({
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": detect_mime_type(image),
                    "data": general_purpose::STANDARD.encode(image)
                }
            })
        }));
        Value::Array(parts)
    }

    fn reply_text(result: &Value) -> Result<String, BeforeAfterError> {
        let block = &result["content"][0];
        match block["type"].as_str() {
            Some("text") | None => Ok(block["text"].as_str().unwrap_or_default().to_string()),
            Some(other) => Err(BeforeAfterError::upstream(
                Provider::Anthropic,
                format!("Unexpected response type from Anthropic: {}", other),
            )),
        }
    }
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn default_model(&self, _task: Task) -> &'static str {
        DEFAULT_MODEL
    }

    fn default_api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    async fn complete(
        &self,
        api_key: &str,
        model: &str,
        request: CompletionRequest<'_>,
    ) -> Result<String, BeforeAfterError> {
        let body = json!({
            "model": model,
            "max_tokens": request.task.max_tokens(),
            "temperature": TEMPERATURE,
            "messages": [{
                "role": "user",
                "content": Self::message_content(&request)
            }]
        });

        let result = send_json(
            Provider::Anthropic,
            self.client
                .post(format!("{}/v1/messages", self.base_url))
                .header("x-api-key", api_key)
                .header("anthropic-version", API_VERSION)
                .json(&body),
        )
        .await?;

        Self::reply_text(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_become_base64_blocks() {
        let request = CompletionRequest {
            prompt: "compare".to_string(),
            images: vec![&b"one"[..], &b"two"[..]],
            task: Task::ImageAnalysis,
        };
        let content = AnthropicProvider::message_content(&request);
        assert_eq!(content.as_array().unwrap().len(), 3);
        assert_eq!(content[1]["source"]["type"], "base64");
        assert_eq!(content[1]["source"]["media_type"], "image/jpeg");
        assert_eq!(content[2]["source"]["data"], general_purpose::STANDARD.encode(b"two"));
    }

    #[test]
    fn non_text_replies_are_rejected() {
        let reply = json!({"content": [{"type": "tool_use", "id": "x"}]});
        assert!(AnthropicProvider::reply_text(&reply).is_err());

        let reply = json!({"content": [{"type": "text", "text": "{\"confidence\": 1}"}]});
        assert_eq!(AnthropicProvider::reply_text(&reply).unwrap(), "{\"confidence\": 1}");
    }
}
