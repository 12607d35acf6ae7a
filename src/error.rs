//! Error types for the Aarogya client

use reqwest::StatusCode;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rejected locally before anything was sent
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Non-2xx response from the backend, surfaced as received
    #[error("API request failed with status {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Build an [`ClientError::Api`] from a status and raw response body.
    ///
    /// The message is taken from the body's `error` or `detail` field, then
    /// the first field error (`{"email": ["..."]}`), and finally the raw text.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        Self::Api {
            status,
            message: extract_message(body),
        }
    }

    /// HTTP status of a backend rejection, if this is one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::HttpRequest(e) => e.status(),
            _ => None,
        }
    }

    /// True when the backend rejected the credentials
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// True for failures where no response was received at all
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::HttpRequest(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}

fn extract_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    let Some(object) = value.as_object() else {
        return body.trim().to_string();
    };

    for key in ["error", "detail", "message"] {
        if let Some(text) = object.get(key).and_then(|v| v.as_str()) {
            return text.to_string();
        }
    }

    // Field errors: {"password": ["Password fields didn't match."]}
    if let Some((field, errors)) = object.iter().next() {
        let text = match errors {
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).unwrap_or_else(|| item.to_string()))
                .collect::<Vec<_>>()
                .join(" "),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return format!("{field}: {text}");
    }

    body.trim().to_string()
}

pub type Result<T> = std::result::Result<T, ClientError>;
