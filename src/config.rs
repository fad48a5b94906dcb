// src/config.rs
use crate::errors::BeforeAfterError;
use crate::models::Provider;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl ProviderConfig {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub openai: ProviderConfig,
    pub anthropic: ProviderConfig,
    pub google: ProviderConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, BeforeAfterError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, BeforeAfterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| BeforeAfterError::Config(format!("Invalid PORT '{}': {}", raw, e)))?,
            None => 3001,
        };

        let provider = |provider: Provider, base_var: &str, default_base: &str| {
            ProviderConfig::new(
                lookup(provider.api_key_env()),
                lookup(base_var).unwrap_or_else(|| default_base.to_string()),
            )
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            openai: provider(Provider::OpenAI, "OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            anthropic: provider(
                Provider::Anthropic,
                "ANTHROPIC_BASE_URL",
                DEFAULT_ANTHROPIC_BASE_URL,
            ),
            google: provider(Provider::Google, "GOOGLE_BASE_URL", DEFAULT_GOOGLE_BASE_URL),
        })
    }

    pub fn provider(&self, provider: Provider) -> &ProviderConfig {
        match provider {
            Provider::OpenAI => &self.openai,
            Provider::Anthropic => &self.anthropic,
            Provider::Google => &self.google,
        }
    }
}
