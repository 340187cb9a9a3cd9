use super::openai::{ImageMode, OpenAiAdapter};
use super::{Generator, MockGenerator, StabilityAdapter};
use crate::error::AdapterError;
use crate::models::{MockSettings, ProviderCredentials, ProviderId};
use tracing::{error, info};

/// Builds the adapter for a provider identifier.
#[derive(Debug, Clone, Default)]
pub struct GeneratorFactory {
    mock: MockSettings,
}

impl GeneratorFactory {
    pub fn new(mock: MockSettings) -> Self {
        Self { mock }
    }

    pub fn mock(&self) -> Generator {
        Generator::Mock(MockGenerator::new(&self.mock))
    }

    /// An unknown id is an error. A known provider whose adapter cannot be
    /// built degrades to the mock.
    pub fn create(
        &self,
        provider_id: &str,
        api_key: &str,
        base_url: Option<&str>,
    ) -> Result<Generator, AdapterError> {
        let provider: ProviderId = provider_id.parse().map_err(|_| {
            AdapterError::Unknown(format!("unsupported provider '{}'", provider_id.trim()))
        })?;

        let credentials = ProviderCredentials {
            provider,
            api_key: api_key.to_string(),
            base_url: base_url.map(str::to_string),
        };

        match self.build(&credentials) {
            Ok(generator) => {
                info!("Generation provider: {}", provider);
                Ok(generator)
            }
            Err(e) => {
                error!(
                    "Could not initialise the {} adapter ({}), using the mock instead",
                    provider, e
                );
                Ok(self.mock())
            }
        }
    }

    fn build(&self, credentials: &ProviderCredentials) -> Result<Generator, AdapterError> {
        let api_key = credentials.api_key.clone();
        let base_url = credentials.base_url.as_deref();

        Ok(match credentials.provider {
            ProviderId::OpenAi => Generator::OpenAi(OpenAiAdapter::new(api_key, base_url)?),
            ProviderId::OpenAiVariations => Generator::OpenAi(
                OpenAiAdapter::new(api_key, base_url)?.with_mode(ImageMode::Variation),
            ),
            ProviderId::Stability => {
                Generator::Stability(StabilityAdapter::new(api_key, base_url, self.mock.seed)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ImageTextGenerator;
    use crate::error::ErrorKind;

    #[test]
    fn test_known_providers() {
        let factory = GeneratorFactory::default();

        let generator = factory.create("openai", "key", None).unwrap();
        assert!(matches!(generator, Generator::OpenAi(_)));
        assert_eq!(generator.name(), "openai");

        let generator = factory.create("OpenAI-Variations", "key", None).unwrap();
        assert_eq!(generator.name(), "openai-variations");

        let generator = factory.create(" stability ", "key", None).unwrap();
        assert!(matches!(generator, Generator::Stability(_)));
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        let err = GeneratorFactory::default()
            .create("midjourney", "key", None)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert!(err.to_string().contains("unsupported provider"));
    }

    #[test]
    fn test_unbuildable_adapter_degrades_to_mock() {
        let generator = GeneratorFactory::default()
            .create("stability", "key", Some("not a url"))
            .unwrap();
        assert!(matches!(generator, Generator::Mock(_)));
        assert_eq!(generator.name(), "mock");
    }
}
