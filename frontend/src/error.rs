//! Error types for the dashboard client.
//!
//! Every failure the client can observe is HTTP-level or local storage
//! level. Slices turn these into plain strings for display, preferring the
//! server's `message` over a fixed fallback.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single API call
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to serialize request: {0}")]
    Encode(String),
}

impl ApiError {
    /// The `message` field of a non-2xx response body, if there was one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    /// HTTP status code for non-2xx responses
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message shown to the user: the server's own message, or `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Failure reading or writing durable session storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Session storage I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt session file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Session storage lock poisoned")]
    Poisoned,
}
