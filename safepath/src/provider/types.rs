//! Provider error type

use std::fmt;

use crate::route::CapabilityError;

/// Errors raised while talking to a mapping provider over HTTP.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// HTTP request failed
    HttpError(String),
    /// Response body could not be decoded
    InvalidResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<ProviderError> for CapabilityError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::HttpError(msg) => CapabilityError::Transport(msg),
            ProviderError::InvalidResponse(msg) => CapabilityError::InvalidResponse(msg),
        }
    }
}
