//! Generation adapters
//!
//! Every backend turns a [`GenerationRequest`] into an image reference plus a
//! short description behind the same [`ImageTextGenerator`] capability. The
//! set of backends is closed and known at compile time, see [`Generator`].

pub mod descriptions;
pub mod factory;
pub mod http;
pub mod mime;
pub mod mock;
pub mod openai;
pub mod stability;

pub use factory::GeneratorFactory;
pub use mock::{MockGenerator, ScriptedGenerator};
pub use openai::{ImageMode, OpenAiAdapter};
pub use stability::StabilityAdapter;

use crate::error::AdapterError;
use crate::models::{GenerationRequest, GenerationResult};
use async_trait::async_trait;

#[async_trait]
pub trait ImageTextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, AdapterError>;

    /// Identifier used in logs.
    fn name(&self) -> &str;
}

/// One of the built-in backends.
pub enum Generator {
    Mock(MockGenerator),
    OpenAi(OpenAiAdapter),
    Stability(StabilityAdapter),
}

#[async_trait]
impl ImageTextGenerator for Generator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, AdapterError> {
        match self {
            Generator::Mock(g) => g.generate(request).await,
            Generator::OpenAi(g) => g.generate(request).await,
            Generator::Stability(g) => g.generate(request).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Generator::Mock(g) => g.name(),
            Generator::OpenAi(g) => g.name(),
            Generator::Stability(g) => g.name(),
        }
    }
}
