//! Error type shared by the request and streaming clients.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Non-2xx response whose body decoded as JSON.
    #[error("API error ({status}): {body}")]
    Api { status: StatusCode, body: Value },

    #[error("Stream error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid endpoint: {0:?}")]
    Endpoint(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// The decoded error payload returned by the API, if this is an API error.
    pub fn api_body(&self) -> Option<&Value> {
        match self {
            ClientError::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The HTTP status of an API error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_body() {
        let err = ClientError::Api {
            status: StatusCode::UNAUTHORIZED,
            body: json!({"error": {"message": "bad key"}}),
        };
        assert_eq!(err.api_body(), Some(&json!({"error": {"message": "bad key"}})));
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(err.to_string().starts_with("API error (401 Unauthorized)"));

        let err = ClientError::Config("missing".to_string());
        assert!(err.api_body().is_none());
        assert!(err.status().is_none());
    }
}
