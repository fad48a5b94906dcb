// src/providers/mod.rs
// Vendor adapters. Each one knows a single wire format; prompts and the
// capability surface are shared through the `ModelProvider` default methods.
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::BeforeAfterError;
use crate::models::{CodeFile, GenerateCodeOptions, Provider, Task};

pub mod anthropic;
pub mod google;
pub mod openai;
pub mod prompts;

pub use anthropic::AnthropicProvider;
pub use google::GoogleProvider;
pub use openai::OpenAIProvider;

pub const TEMPERATURE: f64 = 0.1;

/// One prompt with optional inline images, sent as a single user turn.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub prompt: String,
    pub images: Vec<&'a [u8]>,
    pub task: Task,
}

impl<'a> CompletionRequest<'a> {
    pub fn text(prompt: impl Into<String>, task: Task) -> Self {
        Self {
            prompt: prompt.into(),
            images: Vec::new(),
            task,
        }
    }
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn provider(&self) -> Provider;

    fn default_model(&self, task: Task) -> &'static str;

    fn default_api_key(&self) -> Option<&str>;

    /// Issues one request to the vendor and returns the reply text, which may
    /// be empty if the vendor answered without any text content.
    async fn complete(
        &self,
        api_key: &str,
        model: &str,
        request: CompletionRequest<'_>,
    ) -> Result<String, BeforeAfterError>;

    /// A per-call key wins over the startup default. Blank keys count as absent.
    fn resolve_api_key<'a>(&'a self, api_key: Option<&'a str>) -> Result<&'a str, BeforeAfterError> {
        api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .or_else(|| self.default_api_key())
            .ok_or(BeforeAfterError::CredentialMissing {
                provider: self.provider(),
            })
    }

    fn resolve_model(&self, model: Option<&str>, task: Task) -> String {
        model
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| self.default_model(task))
            .to_string()
    }

    async fn analyze_images(
        &self,
        current: &[u8],
        target: &[u8],
        framework: Option<&str>,
        model: &str,
        api_key: Option<&str>,
    ) -> Result<String, BeforeAfterError> {
        let api_key = self.resolve_api_key(api_key)?;
        let request = CompletionRequest {
            prompt: prompts::image_comparison(framework),
            images: vec![current, target],
            task: Task::ImageAnalysis,
        };
        let text = self.complete(api_key, model, request).await?;
        require_text(self.provider(), text)
    }

    async fn detect_tech_stack(
        &self,
        files: &[CodeFile],
        model: &str,
        api_key: Option<&str>,
    ) -> Result<String, BeforeAfterError> {
        let api_key = self.resolve_api_key(api_key)?;
        let request = CompletionRequest::text(prompts::tech_stack(files), Task::TechStack);
        let text = self.complete(api_key, model, request).await?;
        require_text(self.provider(), text)
    }

    async fn generate_code(
        &self,
        options: &GenerateCodeOptions,
        model: &str,
        api_key: Option<&str>,
    ) -> Result<String, BeforeAfterError> {
        let api_key = self.resolve_api_key(api_key)?;
        let request =
            CompletionRequest::text(prompts::code_generation(options), Task::CodeGeneration);
        let text = self.complete(api_key, model, request).await?;
        require_text(self.provider(), text)
    }

    /// Smallest possible request, used to check that a model answers at all.
    async fn probe(&self, model: &str, api_key: Option<&str>) -> Result<(), BeforeAfterError> {
        let api_key = self.resolve_api_key(api_key)?;
        self.complete(api_key, model, CompletionRequest::text("Test", Task::Probe))
            .await
            .map(|_| ())
    }
}

fn require_text(provider: Provider, text: String) -> Result<String, BeforeAfterError> {
    if text.trim().is_empty() {
        return Err(BeforeAfterError::upstream(
            provider,
            format!("No response from {}", provider),
        ));
    }
    Ok(text)
}

/// Sends a JSON request and decodes the JSON reply, mapping every transport,
/// status and decoding problem to `UpstreamCallFailed`.
pub(crate) async fn send_json(
    provider: Provider,
    request: RequestBuilder,
) -> Result<Value, BeforeAfterError> {
    let response = request
        .send()
        .await
        .map_err(|e| BeforeAfterError::upstream(provider, format!("request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(BeforeAfterError::upstream(
            provider,
            format!("{} {}", status, error_text.trim()),
        ));
    }

    response.json().await.map_err(|e| {
        BeforeAfterError::upstream(provider, format!("Failed to parse response: {}", e))
    })
}

pub fn build_providers(config: &AppConfig) -> Vec<Arc<dyn ModelProvider>> {
    let client = Client::new();
    vec![
        Arc::new(OpenAIProvider::new(&config.openai, client.clone())),
        Arc::new(AnthropicProvider::new(&config.anthropic, client.clone())),
        Arc::new(GoogleProvider::new(&config.google, client)),
    ]
}
