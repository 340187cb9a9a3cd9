//! Error handling and custom error types
//!
//! Provider adapters speak [`AdapterError`], a small taxonomy whose messages are
//! safe to show to the person waiting for their postcard. Everything else is
//! folded into the crate-level [`Error`].

use thiserror::Error;

/// Failure classes shared by every generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Auth,
    RateLimit,
    Server,
    Network,
    InvalidResponse,
    Unknown,
}

/// Error surfaced by a generation adapter.
///
/// The message never carries the raw provider status code or body; those are
/// logged where the response is received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    RateLimit(String),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Unknown(String),
}

impl AdapterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::Auth(_) => ErrorKind::Auth,
            AdapterError::RateLimit(_) => ErrorKind::RateLimit,
            AdapterError::Server(_) => ErrorKind::Server,
            AdapterError::Network(_) => ErrorKind::Network,
            AdapterError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            AdapterError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// A rejected credential will not become valid by asking again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AdapterError::Auth(_))
    }

    pub fn missing_api_key() -> Self {
        AdapterError::Auth("API key is not configured".to_string())
    }

    pub fn invalid_response(what: &str) -> Self {
        AdapterError::InvalidResponse(format!("Invalid response from the {} API", what))
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("HTTP transport failure: {}", err);
        if err.is_decode() {
            AdapterError::InvalidResponse("The provider returned an unreadable response".to_string())
        } else if err.is_builder() {
            AdapterError::Unknown("Could not build the provider request".to_string())
        } else {
            AdapterError::Network("Connection error. Check your internet connection".to_string())
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Failed to parse provider response: {}", err);
        AdapterError::InvalidResponse("The provider returned an unreadable response".to_string())
    }
}

/// The first request-field rule that did not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Problems with the source photo before it is sent anywhere.
#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("The photo is empty")]
    Empty,

    #[error("The photo is too large ({size} bytes, at most {max} allowed)")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported photo format. Only PNG and JPEG are accepted")]
    UnsupportedFormat,

    #[error("Could not process the photo: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Photo(#[from] PhotoError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl Error {
    /// Kind of the underlying adapter failure, if this is one.
    pub fn adapter_kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Adapter(e) => Some(e.kind()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_auth_is_terminal() {
        assert!(!AdapterError::Auth("x".into()).is_retryable());
        assert!(AdapterError::RateLimit("x".into()).is_retryable());
        assert!(AdapterError::Server("x".into()).is_retryable());
        assert!(AdapterError::Network("x".into()).is_retryable());
        assert!(AdapterError::InvalidResponse("x".into()).is_retryable());
        assert!(AdapterError::Unknown("x".into()).is_retryable());
    }

    #[test]
    fn test_display_is_the_bare_message() {
        let err = AdapterError::missing_api_key();
        assert_eq!(err.to_string(), "API key is not configured");
        assert_eq!(err.kind(), ErrorKind::Auth);
    }

    #[test]
    fn test_crate_error_exposes_adapter_kind() {
        let err = Error::from(AdapterError::Server("down".into()));
        assert_eq!(err.adapter_kind(), Some(ErrorKind::Server));
        assert_eq!(err.to_string(), "down");

        let err = Error::from(ValidationError::new("bad name"));
        assert_eq!(err.adapter_kind(), None);
    }
}
