//! Response status policy and body helpers.

use hyper::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ApiError, Result};

/// 200 and 201 count as success on every endpoint; anything else is a server error.
pub fn is_success_status(status: StatusCode) -> bool {
    matches!(status, StatusCode::OK | StatusCode::CREATED)
}

/// Error body shapes the backend is known to send.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    /// `{"message": "..."}`
    Flat { message: String },
    /// `{"success": false, "error": {"message": "..."}}`
    Nested { error: NestedError },
}

#[derive(Debug, Deserialize)]
struct NestedError {
    message: String,
}

/// Extracts the server's error message from a response body, if there is one.
pub fn server_message(body: &[u8]) -> Option<String> {
    let message = match serde_json::from_slice::<ErrorBody>(body).ok()? {
        ErrorBody::Flat { message } => message,
        ErrorBody::Nested { error } => error.message,
    };
    let trimmed = message.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Decodes a success body. An empty body decodes as JSON `null`.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}
