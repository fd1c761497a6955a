use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Coarse failure classes shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    Connectivity,
    Server,
    Payload,
    Unknown,
}

impl FailureCategory {
    /// One human-readable message per category.
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureCategory::Connectivity => {
                "Connection error. Check that the translation server is running."
            }
            FailureCategory::Server => "Server error. Try again in a few moments.",
            FailureCategory::Payload => "The translation service rejected the request.",
            FailureCategory::Unknown => "Unknown error. Try again.",
        }
    }
}

/// Errors produced by a translation collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    /// The request could not be sent or the response never arrived
    #[error("connection error: {0}")]
    Connectivity(String),

    /// The backend answered with a non-success HTTP status
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// The backend answered but reported a failure in the payload
    #[error("translation failed: {0}")]
    Payload(String),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl TranslateError {
    pub fn category(&self) -> FailureCategory {
        match self {
            TranslateError::Connectivity(_) => FailureCategory::Connectivity,
            TranslateError::Server { .. } => FailureCategory::Server,
            TranslateError::Payload(_) => FailureCategory::Payload,
            TranslateError::Unknown(_) => FailureCategory::Unknown,
        }
    }

    /// Message for the view. Payload errors carry the backend's own wording.
    pub fn user_message(&self) -> String {
        match self {
            TranslateError::Payload(message) if !message.is_empty() => message.clone(),
            other => other.category().user_message().to_string(),
        }
    }

    /// Classify a transport-level reqwest failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            TranslateError::Unknown(err.to_string())
        } else if err.is_decode() {
            TranslateError::Unknown(format!("invalid response body: {}", err))
        } else {
            TranslateError::Connectivity(err.to_string())
        }
    }
}

/// Error returned by the HTTP handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Page not found")
    }
}

impl From<TranslateError> for ApiError {
    fn from(err: TranslateError) -> Self {
        let status = match err.category() {
            FailureCategory::Payload => StatusCode::BAD_REQUEST,
            FailureCategory::Connectivity | FailureCategory::Server => StatusCode::BAD_GATEWAY,
            FailureCategory::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_variants() {
        assert_eq!(
            TranslateError::Connectivity("refused".into()).category(),
            FailureCategory::Connectivity
        );
        assert_eq!(
            TranslateError::Server {
                status: 503,
                message: "busy".into()
            }
            .category(),
            FailureCategory::Server
        );
        assert_eq!(
            TranslateError::Payload("nope".into()).category(),
            FailureCategory::Payload
        );
        assert_eq!(
            TranslateError::Unknown("?".into()).category(),
            FailureCategory::Unknown
        );
    }

    #[test]
    fn payload_errors_keep_backend_wording() {
        let err = TranslateError::Payload("unsupported language".into());
        assert_eq!(err.user_message(), "unsupported language");

        let err = TranslateError::Server {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.user_message(), FailureCategory::Server.user_message());
    }

    #[test]
    fn api_error_status_mapping() {
        let api: ApiError = TranslateError::Payload("bad".into()).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);

        let api: ApiError = TranslateError::Connectivity("down".into()).into();
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);

        let api: ApiError = TranslateError::Unknown("odd".into()).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
