// src/services/catalog.rs
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Provider;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub capabilities: &'static [&'static str],
    pub context_length: u64,
    pub recommended: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub experimental: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderCatalog {
    pub name: &'static str,
    pub models: &'static [ModelInfo],
}

const TEXT_VISION_CODE: &[&str] = &["text", "vision", "code"];
const TEXT_CODE: &[&str] = &["text", "code"];
const WITH_AUDIO: &[&str] = &["text", "vision", "code", "audio"];

const fn model(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    capabilities: &'static [&'static str],
    context_length: u64,
    recommended: bool,
) -> ModelInfo {
    ModelInfo {
        id,
        name,
        description,
        capabilities,
        context_length,
        recommended,
        experimental: false,
    }
}

const OPENAI_MODELS: &[ModelInfo] = &[
    model("gpt-4o", "GPT-4o", "Latest multimodal model with vision capabilities", TEXT_VISION_CODE, 128_000, true),
    model("gpt-4o-mini", "GPT-4o Mini", "Fast and cost-effective version of GPT-4o", TEXT_VISION_CODE, 128_000, false),
    model("gpt-4-turbo", "GPT-4 Turbo", "High-performance model with 128k context", TEXT_CODE, 128_000, false),
    model("gpt-4-vision-preview", "GPT-4 Vision", "GPT-4 with vision capabilities", TEXT_VISION_CODE, 128_000, false),
    model("gpt-4", "GPT-4", "Original GPT-4 model", TEXT_CODE, 8_192, false),
    model("gpt-3.5-turbo", "GPT-3.5 Turbo", "Fast and efficient model", TEXT_CODE, 16_385, false),
];

const GOOGLE_MODELS: &[ModelInfo] = &[
    model("gemini-1.5-pro", "Gemini 1.5 Pro", "Most capable model with 2M context window", WITH_AUDIO, 2_000_000, true),
    model("gemini-1.5-flash", "Gemini 1.5 Flash", "Fast model with 1M context window", TEXT_VISION_CODE, 1_000_000, false),
    model("gemini-1.5-flash-8b", "Gemini 1.5 Flash-8B", "Lightweight and fast model", TEXT_VISION_CODE, 1_000_000, false),
    model("gemini-2.0-flash", "Gemini 2.0 Flash", "Default model for code tasks", TEXT_VISION_CODE, 1_000_000, false),
    ModelInfo {
        experimental: true,
        ..model("gemini-2.0-flash-exp", "Gemini 2.0 Flash (Experimental)", "Next-generation experimental model", WITH_AUDIO, 1_000_000, false)
    },
];

const ANTHROPIC_MODELS: &[ModelInfo] = &[
    model("claude-3-5-sonnet-20241022", "Claude 3.5 Sonnet", "Latest and most capable Claude model", TEXT_VISION_CODE, 200_000, true),
    model("claude-3-5-haiku-20241022", "Claude 3.5 Haiku", "Fast and efficient Claude model", TEXT_VISION_CODE, 200_000, false),
    model("claude-3-opus-20240229", "Claude 3 Opus", "Most capable Claude 3 model", TEXT_VISION_CODE, 200_000, false),
    model("claude-3-sonnet-20240229", "Claude 3 Sonnet", "Balanced performance and speed", TEXT_VISION_CODE, 200_000, false),
    model("claude-3-haiku-20240307", "Claude 3 Haiku", "Fast and cost-effective", TEXT_VISION_CODE, 200_000, false),
];

pub fn provider_catalog(provider: Provider) -> ProviderCatalog {
    match provider {
        Provider::OpenAI => ProviderCatalog {
            name: "OpenAI",
            models: OPENAI_MODELS,
        },
        Provider::Google => ProviderCatalog {
            name: "Google Gemini",
            models: GOOGLE_MODELS,
        },
        Provider::Anthropic => ProviderCatalog {
            name: "Anthropic Claude",
            models: ANTHROPIC_MODELS,
        },
    }
}

/// Every provider's catalog keyed by provider name.
pub fn full_catalog() -> BTreeMap<&'static str, ProviderCatalog> {
    Provider::ALL
        .iter()
        .map(|provider| (provider.as_str(), provider_catalog(*provider)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_provider_recommends_exactly_one_model() {
        for provider in Provider::ALL {
            let catalog = provider_catalog(provider);
            assert_eq!(catalog.models.iter().filter(|m| m.recommended).count(), 1);
        }
    }

    #[test]
    fn default_models_are_listed() {
        let ids = |p| provider_catalog(p).models.iter().map(|m| m.id).collect::<Vec<_>>();
        assert!(ids(Provider::OpenAI).contains(&crate::providers::openai::DEFAULT_MODEL));
        assert!(ids(Provider::Anthropic).contains(&crate::providers::anthropic::DEFAULT_MODEL));
        assert!(ids(Provider::Google).contains(&crate::providers::google::VISION_MODEL));
        assert!(ids(Provider::Google).contains(&crate::providers::google::TEXT_MODEL));
    }

    #[test]
    fn serializes_wire_names() {
        let value = serde_json::to_value(full_catalog()).unwrap();
        assert_eq!(value["openai"]["models"][0]["contextLength"], 128_000);
        assert!(value["google"]["models"][0].get("experimental").is_none());
        assert_eq!(value["google"]["models"][4]["experimental"], true);
    }
}
