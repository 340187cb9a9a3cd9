//! Bearer-authenticated JSON/multipart client shared by the real providers.
//!
//! This is also the one place where a provider's HTTP status is turned into an
//! [`AdapterError`]. The raw status and body are logged here and go no further.

use crate::error::AdapterError;
use reqwest::multipart::Form;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub struct ProviderHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
    provider: &'static str,
}

impl ProviderHttpClient {
    /// Build a client for `provider`.
    ///
    /// `base_url` overrides `default_base_url` when present and non-blank. It
    /// must parse as an absolute URL.
    pub fn new(
        provider: &'static str,
        api_key: String,
        base_url: Option<&str>,
        default_base_url: &str,
        timeout: Duration,
    ) -> Result<Self, AdapterError> {
        let base_url = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(default_base_url)
            .trim_end_matches('/')
            .to_string();

        Url::parse(&base_url).map_err(|e| {
            tracing::error!("Invalid {} base URL '{}': {}", provider, base_url, e);
            AdapterError::Unknown(format!("Invalid base URL for the {} provider", provider))
        })?;

        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            tracing::error!("Failed to build HTTP client for {}: {}", provider, e);
            AdapterError::Unknown("Could not create the HTTP client".to_string())
        })?;

        Ok(Self {
            client,
            api_key,
            base_url,
            provider,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fails with [`AdapterError::Auth`] when no usable key is held.
    pub fn ensure_api_key(&self) -> Result<(), AdapterError> {
        if self.api_key.trim().is_empty() {
            return Err(AdapterError::missing_api_key());
        }
        Ok(())
    }

    pub async fn post_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp, AdapterError> {
        let url = self.url(path);
        tracing::debug!("Sending JSON request to {} ({})", self.provider, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await
            .map_err(AdapterError::from)?;

        self.read_json(response).await
    }

    pub async fn post_multipart<Resp: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<Resp, AdapterError> {
        let url = self.url(path);
        tracing::debug!("Sending multipart request to {} ({})", self.provider, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(AdapterError::from)?;

        self.read_json(response).await
    }

    async fn read_json<Resp: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<Resp, AdapterError> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(error_for_status(self.provider, status, &error_text));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                "Failed to parse {} response: {}\nBody: {}",
                self.provider,
                e,
                body
            );
            AdapterError::invalid_response(self.provider)
        })
    }
}

/// Translate a non-success status into the shared taxonomy.
pub fn error_for_status(provider: &str, status: StatusCode, body: &str) -> AdapterError {
    tracing::error!("{} API error (status {}): {}", provider, status, body);

    match status {
        StatusCode::UNAUTHORIZED => {
            AdapterError::Auth("The API key is invalid or has expired".to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => AdapterError::RateLimit(
            "Rate limit reached. Try again in a few minutes".to_string(),
        ),
        s if s.is_server_error() => {
            AdapterError::Server("The provider is having trouble. Try again later".to_string())
        }
        _ => AdapterError::Unknown("The provider could not complete the generation".to_string()),
    }
}
