//! Boundary error type - non-success responses and transport failures.

use thiserror::Error;

/// Error produced by a boundary call. Rejections keep the backend's
/// conventional `message` field so views can surface it verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success HTTP response from the API
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },

    /// Network-level failure (connect, timeout, decode)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A local file for a multipart upload could not be read
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
}

impl ApiError {
    /// HTTP status of a boundary rejection, if this was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message to show the user: the backend's `message` when present,
    /// otherwise the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_message() {
        let err = ApiError::Status {
            status: 401,
            message: "Invalid credentials".into(),
        };
        assert_eq!(err.user_message("Authentication failed."), "Invalid credentials");
    }

    #[test]
    fn test_user_message_falls_back_when_empty() {
        let err = ApiError::Status {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.user_message("Something broke."), "Something broke.");
    }
}
