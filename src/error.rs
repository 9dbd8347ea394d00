// Client error types
use thiserror::Error;

use crate::filter::error::FilterError;

pub const REQUEST_FAILED: &str = "Request failed";
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Every failure a single user action can end with. None of them are retried.
#[derive(Error, Debug)]
pub enum ClientError {
    // Caught before any network call
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    // Non-success HTTP status
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    // Network unreachable, connection reset, timeout
    #[error("{0}")]
    Transport(String),

    // Success status with a body that does not decode
    #[error("{0}")]
    Decode(String),

    // Credential slot read/write
    #[error("Credential storage error: {0}")]
    Storage(String),

    // Auth responses missing the expected field
    #[error("{0}")]
    Auth(String),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl ClientError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::validation(field, "This field is required")
    }

    /// Keeps the server-provided detail, falling back to the generic message.
    pub fn request_failed(status: u16, detail: Option<String>) -> Self {
        let message = match detail {
            Some(d) if !d.trim().is_empty() => d,
            _ => REQUEST_FAILED.to_string(),
        };
        ClientError::RequestFailed { status, message }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ClientError::Transport(non_empty_or_unknown(message.into()))
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ClientError::Decode(non_empty_or_unknown(message.into()))
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ClientError::Storage(message.into())
    }

    /// HTTP status for request failures, `None` for everything else
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Validation { .. } => "VALIDATION_ERROR",
            ClientError::RequestFailed { .. } => "REQUEST_FAILED",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::Auth(_) => "AUTH_ERROR",
            ClientError::Filter(_) => "FILTER_ERROR",
        }
    }
}

fn non_empty_or_unknown(message: String) -> String {
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::decode(err.to_string())
        } else {
            ClientError::transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_prefers_server_detail() {
        let err = ClientError::request_failed(409, Some("Email already registered".into()));
        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(err.status_code(), Some(409));
    }

    #[test]
    fn request_failed_falls_back_to_generic_message() {
        assert_eq!(ClientError::request_failed(500, None).to_string(), REQUEST_FAILED);
        assert_eq!(ClientError::request_failed(500, Some("  ".into())).to_string(), REQUEST_FAILED);
    }

    #[test]
    fn empty_transport_message_becomes_unknown() {
        assert_eq!(ClientError::transport("").to_string(), UNKNOWN_ERROR);
        assert_eq!(ClientError::decode("bad json").to_string(), "bad json");
    }

    #[test]
    fn validation_names_the_field() {
        let err = ClientError::required("name");
        assert_eq!(err.to_string(), "name: This field is required");
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.status_code(), None);
    }
}
