//! Errors surfaced to callers of the client.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Http { status: StatusCode, message: String },

    /// No response was received.
    #[error("network error: {0}")]
    Network(#[source] BoxError),

    #[error("unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    #[error("sign-in callback is missing its tokens")]
    MissingCallbackTokens,

    #[error("sign-in callback failed: {0}")]
    CallbackFailed(#[source] Box<ClientError>),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Network(Box::new(error))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Build an error for a non-success response, preferring the message
    /// the server put in the body.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = server_message(body)
            .or_else(|| {
                std::str::from_utf8(body)
                    .ok()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_owned());

        ClientError::Http { status, message }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::CallbackFailed(inner) => inner.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

/// `message` may be a string or, for validation failures, a list of strings.
fn server_message(body: &[u8]) -> Option<String> {
    let payload: Value = serde_json::from_slice(body).ok()?;
    match payload.get("message")? {
        Value::String(message) => Some(message.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}
