//! Data models and structures
//!
//! Defines the generation request/result pair, the postcard built from them,
//! provider credentials and the environment configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Everything a provider needs for one generation attempt.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub name: String,
    pub profession: String,
    pub source_image: Vec<u8>,
}

impl GenerationRequest {
    pub fn new(name: impl Into<String>, profession: impl Into<String>, source_image: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            profession: profession.into(),
            source_image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Absolute URL or `data:` URI.
    pub image_url: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Postcard {
    pub name: String,
    pub profession: String,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl Postcard {
    pub fn new(request: &GenerationRequest, result: GenerationResult) -> Self {
        Self {
            name: request.name.clone(),
            profession: request.profession.clone(),
            description: result.description,
            image_url: result.image_url,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionConfig {
    pub id: String,
    pub label: String,
    pub scenario: String,
}

/// Known generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    /// Image + chat completion API, text-to-image.
    OpenAi,
    /// Same API, image variations of the source photo.
    OpenAiVariations,
    /// Image-to-image diffusion API.
    Stability,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::OpenAiVariations => "openai-variations",
            ProviderId::Stability => "stability",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderId::OpenAi),
            "openai-variations" => Ok(ProviderId::OpenAiVariations),
            "stability" => Ok(ProviderId::Stability),
            other => Err(format!("unsupported provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub provider: ProviderId,
    pub api_key: String,
    pub base_url: Option<String>,
}

/// Per-call provider selection handed to the orchestrator.
///
/// The provider is kept as a raw identifier so that a misconfigured value
/// reaches the factory and fails there.
#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    pub provider_id: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl GenerationConfig {
    pub fn demo() -> Self {
        Self::default()
    }

    /// The key, unless it is absent or blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn provider_id(&self) -> &str {
        self.provider_id
            .as_deref()
            .unwrap_or(DEFAULT_PROVIDER)
    }
}

pub const DEFAULT_PROVIDER: &str = "openai";

/// Behaviour of the offline generator.
#[derive(Debug, Clone)]
pub struct MockSettings {
    pub latency: Duration,
    /// Fixed seed for reproducible picks; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            latency: Duration::from_secs(2),
            seed: None,
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub generation: GenerationConfig,
    pub mock: MockSettings,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        let mut mock = MockSettings::default();
        if let Some(ms) = non_empty("EPIC_MOCK_DELAY_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                crate::Error::Config(format!("EPIC_MOCK_DELAY_MS is not a number: {}", ms))
            })?;
            mock.latency = Duration::from_millis(ms);
        }
        if let Some(seed) = non_empty("EPIC_SEED") {
            mock.seed = Some(seed.trim().parse().map_err(|_| {
                crate::Error::Config(format!("EPIC_SEED is not a number: {}", seed))
            })?);
        }

        Ok(Self {
            generation: GenerationConfig {
                provider_id: non_empty("EPIC_PROVIDER"),
                api_key: non_empty("EPIC_API_KEY"),
                base_url: non_empty("EPIC_BASE_URL"),
            },
            mock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_parsing() {
        assert_eq!("openai".parse::<ProviderId>(), Ok(ProviderId::OpenAi));
        assert_eq!(" Stability ".parse::<ProviderId>(), Ok(ProviderId::Stability));
        assert_eq!(
            "OPENAI-VARIATIONS".parse::<ProviderId>(),
            Ok(ProviderId::OpenAiVariations)
        );
        assert!("midjourney".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_blank_api_key_counts_as_absent() {
        let config = GenerationConfig {
            api_key: Some("   ".to_string()),
            ..GenerationConfig::default()
        };
        assert_eq!(config.api_key(), None);
        assert_eq!(config.provider_id(), DEFAULT_PROVIDER);

        let config = GenerationConfig {
            api_key: Some(" sk-test ".to_string()),
            provider_id: Some("stability".to_string()),
            base_url: None,
        };
        assert_eq!(config.api_key(), Some("sk-test"));
        assert_eq!(config.provider_id(), "stability");
    }

    #[test]
    fn test_postcard_serialization_uses_camel_case() {
        let request = GenerationRequest::new("Ada Lovelace", "Engineer", vec![]);
        let postcard = Postcard::new(
            &request,
            GenerationResult {
                image_url: "https://example.com/a.png".to_string(),
                description: "Una pionera".to_string(),
            },
        );

        let json = serde_json::to_string(&postcard).unwrap();
        assert!(json.contains("\"imageUrl\":\"https://example.com/a.png\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"name\":\"Ada Lovelace\""));
    }
}
