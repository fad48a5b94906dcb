// src/providers/openai.rs
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

pub const DEFAULT_MODEL: &str = "gpt-4o";

pub struct OpenAIProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(config: &ProviderConfig, client: Client) -> Self {
        if config.api_key.is_none() {
            warn!("OpenAI API key not provided - OpenAI features will be unavailable");
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
                "type": "image_url",
                "image_url": {
                    "url": format!(
                        "data:{};base64,{}",
                        detect_mime_type(image),
                        general_purpose::STANDARD.encode(image)
                    ),
                    "detail": "high"
                }
            })
        }));
        Value::Array(parts)
    }
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
    fn provider(&self) -> Provider {
        Provider::OpenAI
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
            "messages": [{
                "role": "user",
                "content": Self::message_content(&request)
            }],
            "max_tokens": request.task.max_tokens(),
            "temperature": TEMPERATURE
        });

        let result = send_json(
            Provider::OpenAI,
            self.client
                .post(format!("{}/v1/chat/completions", self.base_url))
                .bearer_auth(api_key)
                .json(&body),
        )
        .await?;

        Ok(result["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }
}
