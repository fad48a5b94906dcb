// src/models.rs
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::BeforeAfterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Anthropic,
    Google,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAI, Provider::Anthropic, Provider::Google];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
        }
    }

    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Google => "GOOGLE_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::OpenAI => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Google => "Google",
        })
    }
}

impl FromStr for Provider {
    type Err = BeforeAfterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "anthropic" => Ok(Provider::Anthropic),
            "google" => Ok(Provider::Google),
            _ => Err(BeforeAfterError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// What a single model call is for. Drives default model and output budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    ImageAnalysis,
    TechStack,
    CodeGeneration,
    Probe,
}

impl Task {
    pub fn max_tokens(&self) -> u32 {
        match self {
            Task::ImageAnalysis => 4000,
            Task::TechStack => 1000,
            Task::CodeGeneration => 2000,
            Task::Probe => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub current: Bytes,
    pub target: Bytes,
    pub framework: Option<String>,
    pub provider: Provider,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFile {
    pub filename: String,
    pub content: String,
}

impl CodeFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TechStackRequest {
    pub files: Vec<CodeFile>,
    pub provider: Provider,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeOptions {
    pub framework: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_element: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub differences: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub struct CodeGenRequest {
    pub options: GenerateCodeOptions,
    pub provider: Provider,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifferenceType {
    Color,
    Spacing,
    Typography,
    Layout,
    Component,
    Analysis,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Difference {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DifferenceType,
    #[serde(default)]
    pub severity: Level,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub current_value: String,
    #[serde(default)]
    pub target_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<BoundingBox>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Css,
    Component,
    Layout,
    Styling,
    General,
    Manual,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Quick,
    #[default]
    Moderate,
    Complex,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub framework: String,
    #[serde(default)]
    pub priority: Level,
    #[serde(default)]
    pub estimated_effort: Effort,
}

fn default_confidence() -> f64 {
    0.7
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub differences: Vec<Difference>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_analysis: Option<String>,
}

fn unknown() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Web,
    Mobile,
    Desktop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFile {
    pub filename: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStackResult {
    #[serde(default = "unknown")]
    pub framework: String,
    #[serde(default = "unknown")]
    pub language: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub auto_detected: bool,
    #[serde(default)]
    pub detected_files: Vec<DetectedFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSuggestion {
    #[serde(default)]
    pub file: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default = "default_code_kind")]
    pub kind: String,
}

fn default_code_kind() -> String {
    "component".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeGenResult {
    #[serde(default)]
    pub framework: String,
    #[serde(default)]
    pub suggestions: Vec<CodeSuggestion>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// A canonical body annotated with where and when it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOutput<T> {
    #[serde(flatten)]
    pub result: T,
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub processed_at: DateTime<Utc>,
}

impl<T> ProviderOutput<T> {
    pub fn new(result: T, provider: Provider, model: impl Into<String>) -> Self {
        Self {
            result,
            provider,
            model: Some(model.into()),
            processed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelAvailability {
    pub available: bool,
    pub tested: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
