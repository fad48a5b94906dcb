//! Shared fixtures for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use beforeafter::errors::BeforeAfterError;
use beforeafter::models::{Provider, Task};
use beforeafter::providers::{CompletionRequest, ModelProvider};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Adapter that answers every request with a canned reply.
pub struct StubProvider {
    provider: Provider,
    api_key: Option<String>,
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn replying(provider: Provider, reply: &str) -> Self {
        Self {
            provider,
            api_key: Some("stub-key".to_string()),
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(provider: Provider, cause: &str) -> Self {
        Self {
            reply: Err(cause.to_string()),
            ..Self::replying(provider, "")
        }
    }

    pub fn without_key(provider: Provider) -> Self {
        Self {
            api_key: None,
            ..Self::replying(provider, "{}")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelProvider for StubProvider {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn default_model(&self, _task: Task) -> &'static str {
        "stub-model"
    }

    fn default_api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    async fn complete(
        &self,
        _api_key: &str,
        _model: &str,
        _request: CompletionRequest<'_>,
    ) -> Result<String, BeforeAfterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .map_err(|cause| BeforeAfterError::upstream(self.provider, cause))
    }
}

/// Solid-colour JPEG of the given size.
pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([59u8, 130, 246])));
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Jpeg)
        .expect("encode jpeg");
    out
}

pub const REACT_REPLY: &str = r#"Analysis: {"framework":"react","language":"typescript","platform":"web","confidence":0.9,"autoDetected":true,"detectedFiles":[{"filename":"App.tsx","type":"react-component","confidence":0.9}]}"#;
