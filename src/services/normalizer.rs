// src/services/normalizer.rs
// Turns free-form model replies into canonical results. Parsing never fails
// the call: an unusable reply becomes a low-confidence fallback carrying the
// original text.
use log::warn;
use serde::de::DeserializeOwned;

use crate::errors::BeforeAfterError;
use crate::models::*;

pub const PREVIEW_CHARS: usize = 200;
pub const FALLBACK_CONFIDENCE: f64 = 0.7;

/// Span from the first `{` to the last `}` in `text`, inclusive.
///
/// Greedy on purpose: prose around the object is dropped, but two separate
/// objects in one reply are captured together and will then fail to parse.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

pub fn parse_embedded<T: DeserializeOwned>(text: &str) -> Result<T, BeforeAfterError> {
    let candidate = extract_json_object(text)
        .ok_or_else(|| BeforeAfterError::ParseFailure("no JSON object in reply".to_string()))?;
    serde_json::from_str(candidate).map_err(|e| BeforeAfterError::ParseFailure(e.to_string()))
}

/// First `PREVIEW_CHARS` characters, with an ellipsis only when cut.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

pub fn normalize_analysis(raw: &str, framework: Option<&str>) -> AnalysisResult {
    match parse_embedded::<AnalysisResult>(raw) {
        Ok(mut result) => {
            for (index, diff) in result.differences.iter_mut().enumerate() {
                if diff.id.is_empty() {
                    diff.id = (index + 1).to_string();
                }
            }
            for (index, suggestion) in result.suggestions.iter_mut().enumerate() {
                if suggestion.id.is_empty() {
                    suggestion.id = (index + 1).to_string();
                }
                if suggestion.framework.is_empty() {
                    suggestion.framework = framework.unwrap_or("css").to_string();
                }
            }
            result.confidence = clamp_confidence(result.confidence);
            result
        }
        Err(e) => {
            warn!("{}; using fallback analysis", e);
            fallback_analysis(raw, framework)
        }
    }
}

pub fn fallback_analysis(raw: &str, framework: Option<&str>) -> AnalysisResult {
    AnalysisResult {
        differences: vec![Difference {
            id: "1".to_string(),
            kind: DifferenceType::Analysis,
            severity: Level::Medium,
            description: preview(raw),
            current_value: "Current UI state".to_string(),
            target_value: "Target design state".to_string(),
            coordinates: Some(BoundingBox {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 100.0,
            }),
        }],
        suggestions: vec![Suggestion {
            id: "1".to_string(),
            kind: SuggestionType::General,
            description: "Review the detailed analysis and apply suggested changes".to_string(),
            code: "/* See detailed analysis above */".to_string(),
            framework: framework.unwrap_or("css").to_string(),
            priority: Level::Medium,
            estimated_effort: Effort::Moderate,
        }],
        confidence: FALLBACK_CONFIDENCE,
        raw_analysis: Some(raw.to_string()),
    }
}

pub fn normalize_tech_stack(raw: &str, files: &[CodeFile]) -> TechStackResult {
    match parse_embedded::<TechStackResult>(raw) {
        Ok(mut result) => {
            result.confidence = clamp_confidence(result.confidence);
            for file in result.detected_files.iter_mut() {
                file.confidence = clamp_confidence(file.confidence);
            }
            result
        }
        Err(e) => {
            warn!("{}; using fallback tech stack", e);
            TechStackResult {
                framework: "unknown".to_string(),
                language: "unknown".to_string(),
                platform: Platform::Web,
                confidence: FALLBACK_CONFIDENCE,
                auto_detected: false,
                detected_files: detected_by_extension(files, FALLBACK_CONFIDENCE),
                reasoning: Some(preview(raw)),
            }
        }
    }
}

pub fn normalize_code_gen(raw: &str, framework: &str) -> CodeGenResult {
    match parse_embedded::<CodeGenResult>(raw) {
        Ok(mut result) => {
            if result.framework.is_empty() {
                result.framework = framework.to_string();
            }
            result
        }
        Err(e) => {
            warn!("{}; using fallback code generation", e);
            CodeGenResult {
                framework: framework.to_string(),
                suggestions: vec![CodeSuggestion {
                    file: String::new(),
                    code: raw.to_string(),
                    description: preview(raw),
                    kind: "manual".to_string(),
                }],
                dependencies: Vec::new(),
                notes: "The model reply was not structured; review the generated text manually"
                    .to_string(),
            }
        }
    }
}

/// File classification from the extension alone.
pub fn file_type(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "tsx" | "jsx" => "react-component",
        "ts" => "typescript",
        "js" => "javascript",
        "vue" => "vue-component",
        "dart" => "flutter",
        "swift" => "ios",
        "kt" => "android",
        _ => "unknown",
    }
}

pub fn detected_by_extension(files: &[CodeFile], confidence: f64) -> Vec<DetectedFile> {
    files
        .iter()
        .map(|file| DetectedFile {
            filename: file.filename.clone(),
            kind: file_type(&file.filename).to_string(),
            confidence,
        })
        .collect()
}
