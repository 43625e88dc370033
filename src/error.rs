use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Remote service error{}: {message}", status_suffix(.status))]
    RemoteServiceError {
        status: Option<u16>,
        message: String,
    },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Request timed out after {:.1}s", .0.as_secs_f64())]
    TimeoutError(Duration),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (status {})", code))
        .unwrap_or_default()
}

/// AWS error codes that mean the caller's identity was rejected.
const AUTH_ERROR_CODES: &[&str] = &[
    "AccessDeniedException",
    "UnrecognizedClientException",
    "ExpiredTokenException",
    "InvalidSignatureException",
    "MissingAuthenticationTokenException",
];

impl BedrockError {
    /// Maps a non-success provider response onto the error taxonomy.
    ///
    /// `code` is the AWS error code when the provider sent one. The message is
    /// carried through verbatim.
    pub fn from_status(status: u16, code: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        let auth_code = code.map_or(false, |c| AUTH_ERROR_CODES.contains(&c));

        match status {
            401 | 403 => BedrockError::AuthenticationError(message),
            _ if auth_code => BedrockError::AuthenticationError(message),
            413 => BedrockError::ValidationError(message),
            _ => BedrockError::RemoteServiceError {
                status: Some(status),
                message,
            },
        }
    }
}

impl From<serde_json::Error> for BedrockError {
    fn from(err: serde_json::Error) -> Self {
        BedrockError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BedrockError>;
