// src/providers/google.rs
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

pub const VISION_MODEL: &str = "gemini-1.5-pro";
pub const TEXT_MODEL: &str = "gemini-2.0-flash";

pub struct GoogleProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GoogleProvider {
    pub fn new(config: &ProviderConfig, client: Client) -> Self {
        if config.api_key.is_none() {
            warn!("Google API key not provided - Google AI features will be unavailable");
        }
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            client,
        }
    }

    fn parts(request: &CompletionRequest<'_>) -> Vec<Value> {
        let mut parts = vec![json!({ "text": request.prompt })];
        parts.extend(request.images.iter().map(|image| {
            json!({
                "inline_data": {
                    "mime_type": detect_mime_type(image),
                    "data": general_purpose::STANDARD.encode(image)
                }
            })
        }));
        parts
    }

    /// Gemini may split a reply over several text parts.
    fn reply_text(result: &Value) -> String {
        result["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn default_model(&self, task: Task) -> &'static str {
        match task {
            Task::ImageAnalysis => VISION_MODEL,
            Task::TechStack | Task::CodeGeneration | Task::Probe => TEXT_MODEL,
        }
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
            "contents": [{
                "role": "user",
                "parts": Self::parts(&request)
            }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": request.task.max_tokens()
            }
        });

        let result = send_json(
            Provider::Google,
            self.client
                .post(format!(
                    "{}/v1beta/models/{}:generateContent",
                    self.base_url, model
                ))
                .header("x-goog-api-key", api_key)
                .json(&body),
        )
        .await?;

        Ok(Self::reply_text(&result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_text_parts() {
        let reply = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Result: {\"a\":"}, {"text": " 1}"}]}
            }]
        });
        assert_eq!(GoogleProvider::reply_text(&reply), "Result: {\"a\": 1}");
        assert_eq!(GoogleProvider::reply_text(&json!({"candidates": []})), "");
    }

    #[test]
    fn images_become_inline_data() {
        let request = CompletionRequest {
            prompt: "compare".to_string(),
            images: vec![&b"one"[..], &b"two"[..]],
            task: Task::ImageAnalysis,
        };
        let parts = GoogleProvider::parts(&request);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["text"], "compare");
        assert_eq!(parts[2]["inline_data"]["mime_type"], "image/jpeg");
    }
}
