use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by an LLM backend while serving a single request
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum BackendError {
    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationError { message: String },

    #[error("Request timed out after {seconds} seconds")]
    TimeoutError { seconds: u64 },

    #[error("Rate limit exceeded")]
    RateLimitError,

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Error: {message}")]
    Other { message: String },
}

impl BackendError {
    /// Classifies a raw provider error message into the closest variant
    pub fn from_provider_message(provider: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();

        if lower.contains("401") || lower.contains("unauthorized") || lower.contains("api key") {
            BackendError::AuthenticationError {
                message: format!("{}: {}", provider, message),
            }
        } else if lower.contains("429") || lower.contains("rate limit") {
            BackendError::RateLimitError
        } else if lower.contains("connection") || lower.contains("dns") {
            BackendError::NetworkError {
                message: format!("{}: {}", provider, message),
            }
        } else {
            BackendError::ApiError {
                message: format!("{} request failed: {}", provider, message),
            }
        }
    }
}
