use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};

use crate::proxy::ProxyResponse;

#[derive(Debug)]
pub enum ProxyError {
    Configuration,
    Validation,
    MethodNotAllowed,
    /// Non-2xx reply from the Odds API, forwarded as-is.
    Upstream { status: StatusCode, body: Value },
    /// Carries an already redacted message.
    Transport(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Configuration | ProxyError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Validation => StatusCode::BAD_REQUEST,
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::Upstream { status, .. } => *status,
        }
    }
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::Configuration => {
                f.write_str("Server configuration error: API key not set.")
            }
            ProxyError::Validation => f.write_str(
                "Invalid request. Please specify a valid endpoint and sport (if needed).",
            ),
            ProxyError::MethodNotAllowed => f.write_str("Method not allowed"),
            ProxyError::Upstream { status, .. } => write!(f, "Odds API returned {status}"),
            ProxyError::Transport(message) => write!(f, "An error occurred: {message}"),
        }
    }
}

impl std::error::Error for ProxyError {}

impl From<ProxyError> for ProxyResponse {
    fn from(err: ProxyError) -> Self {
        let status = err.status();
        let body = match err {
            ProxyError::Upstream { body, .. } => body,
            other => json!({ "message": other.to_string() }),
        };
        ProxyResponse::json(status, body)
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        ProxyResponse::from(self).into_response()
    }
}
