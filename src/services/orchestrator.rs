// src/services/orchestrator.rs
use log::{error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::BeforeAfterError;
use crate::models::*;
use crate::providers::{self, ModelProvider};
use crate::services::normalizer::{self, detected_by_extension};

/// Dispatches requests to the registered provider adapters.
///
/// Only an unregistered provider is reported as an error. Every failure after
/// dispatch (missing key, vendor error, unparseable reply) still produces a
/// canonical result, with zero confidence for the failures the caller can fix.
pub struct Orchestrator {
    providers: HashMap<Provider, Arc<dyn ModelProvider>>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        providers::build_providers(config)
            .into_iter()
            .fold(Self::new(), Self::with_provider)
    }

    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.providers.insert(provider.provider(), provider);
        self
    }

    fn adapter(&self, provider: Provider) -> Result<&Arc<dyn ModelProvider>, BeforeAfterError> {
        self.providers
            .get(&provider)
            .ok_or_else(|| BeforeAfterError::UnsupportedProvider(provider.as_str().to_string()))
    }

    pub async fn analyze_images(
        &self,
        request: &AnalysisRequest,
    ) -> Result<ProviderOutput<AnalysisResult>, BeforeAfterError> {
        let adapter = self.adapter(request.provider)?;
        let model = adapter.resolve_model(request.model.as_deref(), Task::ImageAnalysis);
        let framework = request.framework.as_deref();

        info!("Analyzing screenshots with {} ({})", request.provider, model);

        let result = match adapter
            .analyze_images(
                &request.current,
                &request.target,
                framework,
                &model,
                request.api_key.as_deref(),
            )
            .await
        {
            Ok(raw) => normalizer::normalize_analysis(&raw, framework),
            Err(e) => degraded_analysis(&e, framework),
        };

        Ok(ProviderOutput::new(result, request.provider, model))
    }

    pub async fn detect_tech_stack(
        &self,
        request: &TechStackRequest,
    ) -> Result<ProviderOutput<TechStackResult>, BeforeAfterError> {
        let adapter = self.adapter(request.provider)?;
        let model = adapter.resolve_model(request.model.as_deref(), Task::TechStack);

        info!(
            "Detecting tech stack of {} file(s) with {} ({})",
            request.files.len(),
            request.provider,
            model
        );

        let result = match adapter
            .detect_tech_stack(&request.files, &model, request.api_key.as_deref())
            .await
        {
            Ok(raw) => normalizer::normalize_tech_stack(&raw, &request.files),
            Err(e) => degraded_tech_stack(&e, &request.files),
        };

        Ok(ProviderOutput::new(result, request.provider, model))
    }

    pub async fn generate_code(
        &self,
        request: &CodeGenRequest,
    ) -> Result<ProviderOutput<CodeGenResult>, BeforeAfterError> {
        let adapter = self.adapter(request.provider)?;
        let model = adapter.resolve_model(request.model.as_deref(), Task::CodeGeneration);
        let framework = request.options.framework.as_str();

        info!("Generating {} code with {} ({})", framework, request.provider, model);

        let result = match adapter
            .generate_code(&request.options, &model, request.api_key.as_deref())
            .await
        {
            Ok(raw) => normalizer::normalize_code_gen(&raw, framework),
            Err(e) => degraded_code_gen(&e, framework),
        };

        Ok(ProviderOutput::new(result, request.provider, model))
    }

    /// Checks that `model` answers a one-token request. Never fails.
    pub async fn test_model(
        &self,
        provider: &str,
        model: &str,
        api_key: Option<&str>,
    ) -> ModelAvailability {
        let adapter = match provider
            .parse::<Provider>()
            .and_then(|provider| self.adapter(provider))
        {
            Ok(adapter) => adapter,
            Err(_) => {
                return ModelAvailability {
                    available: false,
                    tested: false,
                    error: Some("Unknown provider".to_string()),
                };
            }
        };

        match adapter.probe(model, api_key).await {
            Ok(()) => ModelAvailability {
                available: true,
                tested: true,
                error: None,
            },
            Err(e) => {
                warn!("Model {} unavailable: {}", model, e);
                ModelAvailability {
                    available: false,
                    tested: true,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

fn log_degraded(e: &BeforeAfterError) {
    match e {
        BeforeAfterError::CredentialMissing { .. } => warn!("{}; returning degraded result", e),
        _ => error!("{}; returning degraded result", e),
    }
}

fn failure_text(e: &BeforeAfterError) -> (String, String) {
    match e {
        BeforeAfterError::CredentialMissing { provider } => (
            format!(
                "{} API key not provided. Supply an apiKey with the request or set {}.",
                provider,
                provider.api_key_env()
            ),
            format!("Configure a {} API key and run the analysis again", provider),
        ),
        other => (
            format!("Analysis failed: {}", other),
            "Review the screenshots manually or retry with another provider".to_string(),
        ),
    }
}

pub fn degraded_analysis(e: &BeforeAfterError, framework: Option<&str>) -> AnalysisResult {
    log_degraded(e);
    let (description, remedy) = failure_text(e);
    AnalysisResult {
        differences: vec![Difference {
            id: "1".to_string(),
            kind: DifferenceType::Error,
            severity: Level::High,
            description,
            current_value: String::new(),
            target_value: String::new(),
            coordinates: None,
        }],
        suggestions: vec![Suggestion {
            id: "1".to_string(),
            kind: SuggestionType::Manual,
            description: remedy,
            code: String::new(),
            framework: framework.unwrap_or("css").to_string(),
            priority: Level::High,
            estimated_effort: Effort::Manual,
        }],
        confidence: 0.0,
        raw_analysis: None,
    }
}

pub fn degraded_tech_stack(e: &BeforeAfterError, files: &[CodeFile]) -> TechStackResult {
    log_degraded(e);
    let (description, _) = failure_text(e);
    TechStackResult {
        framework: "unknown".to_string(),
        language: "unknown".to_string(),
        platform: Platform::Web,
        confidence: 0.0,
        auto_detected: false,
        detected_files: detected_by_extension(files, 0.0),
        reasoning: Some(description),
    }
}

pub fn degraded_code_gen(e: &BeforeAfterError, framework: &str) -> CodeGenResult {
    log_degraded(e);
    let (description, remedy) = failure_text(e);
    CodeGenResult {
        framework: framework.to_string(),
        suggestions: vec![CodeSuggestion {
            file: String::new(),
            code: String::new(),
            description,
            kind: "manual".to_string(),
        }],
        dependencies: Vec::new(),
        notes: remedy,
    }
}
