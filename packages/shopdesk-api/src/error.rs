//! Client error types.

use shopdesk_core::CoreError;
use thiserror::Error;

/// Message shown when the backend cannot be reached.
pub const UNABLE_TO_CONNECT: &str = "Error: Unable to connect to the server.";

/// Errors from a backend call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejected locally; nothing was sent
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// Connection refused, reset, DNS failure
    #[error("Network error: {0}")]
    Network(String),

    /// No response within the configured timeout
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// Backend answered with a non-success status
    #[error("Server responded with status {status}")]
    Server { status: u16, message: Option<String> },

    /// Success status but the body was not the expected JSON
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// Base URL or request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Text for the screen's message area.
    ///
    /// `action` completes the generic fallback, e.g. "add customer" gives
    /// "Error: Could not add customer.".
    pub fn user_message(&self, action: &str) -> String {
        match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::Network(_) | ApiError::Timeout(_) => UNABLE_TO_CONNECT.to_string(),
            ApiError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Server { message: None, .. } => format!("Error: Could not {}.", action),
            ApiError::Decode(_) | ApiError::InvalidRequest(_) => {
                "An error occurred. Please try again.".to_string()
            }
        }
    }

    /// True when the request never produced a response.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout(_))
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            ApiError::Network("refused".into()).user_message("add shop"),
            UNABLE_TO_CONNECT
        );
        assert_eq!(ApiError::Timeout(5000).user_message("add shop"), UNABLE_TO_CONNECT);
        assert_eq!(
            ApiError::Server {
                status: 409,
                message: Some("Email already registered".into())
            }
            .user_message("add customer"),
            "Email already registered"
        );
        assert_eq!(
            ApiError::Server {
                status: 500,
                message: None
            }
            .user_message("add customer"),
            "Error: Could not add customer."
        );
        assert_eq!(
            ApiError::from(CoreError::validation("discount", "must not be negative"))
                .user_message("create invoice"),
            "Invalid discount: must not be negative"
        );
    }
}
