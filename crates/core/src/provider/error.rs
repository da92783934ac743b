//! Provider error types.

use thiserror::Error;

use photodrop_shared::AppError;

/// Errors raised by an asset provider.
///
/// The `Display` form is the provider's own message so it can be surfaced to
/// clients without rewording.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with an error status.
    #[error("{message}")]
    Api {
        /// HTTP status returned by the provider.
        status: u16,
        /// Error message reported by the provider.
        message: String,
    },

    /// The provider could not be reached or the call timed out.
    #[error("{0}")]
    Transport(String),

    /// The provider answered with a body that could not be decoded.
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),

    /// Object storage operation failed.
    #[error("{0}")]
    Storage(String),

    /// Provider configuration is unusable.
    #[error("provider configuration error: {0}")]
    Configuration(String),

    /// Reading the staged upload failed.
    #[error("failed to read staged upload: {0}")]
    Io(#[from] std::io::Error),

    /// The operation is not offered by this provider.
    #[error("{0} is not supported by this provider")]
    Unsupported(&'static str),
}

impl ProviderError {
    /// Create an API error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<opendal::Error> for ProviderError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::Unsupported => Self::Unsupported("this storage operation"),
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            _ => Self::Storage(err.to_string()),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unsupported(_) => AppError::Unsupported(err.to_string()),
            other => AppError::ExternalService(other.to_string()),
        }
    }
}
