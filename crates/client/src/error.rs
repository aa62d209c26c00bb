//! Client-facing error taxonomy.
//!
//! Every failure a view can see is one of these variants. Server verdicts are
//! classified from the HTTP status and the error body (`{"message": ...}`,
//! `{"error": ...}`, optional `{"errors": {field: msg}}`).
//!
//! The API reports rejected input as a 500 whose body carries a `message`, so
//! a 5xx with a message is a verdict on the input, not an outage. Only a 5xx
//! without one is treated as retryable.

use thiserror::Error;

use academia_academics::AcademicError;
use academia_auth::AuthzError;
use academia_core::DomainError;

use crate::transport::{ApiResponse, TransportError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("validation failed: {message}")]
    ValidationFailed { message: String, fields: Vec<String> },

    #[error("grade {value} is outside the 0-20 scale")]
    OutOfRange { value: f64 },

    #[error("student is already enrolled in this course")]
    AlreadyEnrolled { message: String },

    #[error("missing required reference: {0}")]
    MissingReference(&'static str),

    #[error(transparent)]
    Unauthorized(#[from] AuthzError),

    #[error("server refused the request ({status})")]
    AccessDenied { status: u16 },

    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error(transparent)]
    TransportFailure(#[from] TransportError),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request body could not be encoded: {0}")]
    Encoding(String),

    #[error("login superseded by logout")]
    LoginSuperseded,
}

impl ClientError {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::TransportFailure(_) => true,
            ClientError::ServerError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Classify a non-success response from a domain endpoint.
    pub fn from_response(response: &ApiResponse) -> Self {
        let body = ErrorBody::parse(response);
        match response.status {
            400 | 422 => ClientError::ValidationFailed {
                message: body.message_or("request rejected"),
                fields: body.fields,
            },
            401 | 403 => ClientError::AccessDenied { status: response.status },
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(body.message_or("conflict")),
            status if status >= 500 => match body.verdict {
                Some(message) => ClientError::ValidationFailed {
                    message,
                    fields: body.fields,
                },
                None => ClientError::ServerError {
                    status,
                    message: body.message_or("internal server error"),
                },
            },
            status => ClientError::ValidationFailed {
                message: body.message_or(&format!("unexpected status {status}")),
                fields: body.fields,
            },
        }
    }

    /// Message carried by a server verdict, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::ValidationFailed { message, .. }
            | ClientError::AlreadyEnrolled { message }
            | ClientError::Conflict(message)
            | ClientError::ServerError { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<AcademicError> for ClientError {
    fn from(e: AcademicError) -> Self {
        match e {
            AcademicError::OutOfRange { value } => ClientError::OutOfRange { value },
            AcademicError::MissingReference(what) => ClientError::MissingReference(what),
            AcademicError::Domain(inner) => inner.into(),
        }
    }
}

impl From<DomainError> for ClientError {
    fn from(e: DomainError) -> Self {
        ClientError::ValidationFailed {
            message: e.to_string(),
            fields: Vec::new(),
        }
    }
}

/// Loosely parsed error body.
#[derive(Debug, Default)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    /// Explicit `message` from a JSON body; generic `error` labels never count.
    pub verdict: Option<String>,
    pub fields: Vec<String>,
}

impl ErrorBody {
    pub fn parse(response: &ApiResponse) -> Self {
        let Ok(value) = serde_json::from_slice::<serde_json::Value>(&response.body) else {
            let text = response.text().trim().to_string();
            return Self {
                message: (!text.is_empty()).then_some(text),
                ..Self::default()
            };
        };

        let verdict = match &value {
            serde_json::Value::String(s) => Some(s.as_str()),
            serde_json::Value::Object(map) => map.get("message").and_then(|v| v.as_str()),
            _ => None,
        }
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

        let message = verdict.clone().or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        });

        let mut fields = Vec::new();
        match value.get("errors") {
            Some(serde_json::Value::Object(map)) => fields.extend(map.keys().cloned()),
            Some(serde_json::Value::Array(items)) => fields.extend(
                items
                    .iter()
                    .filter_map(|item| item.get("field").and_then(|f| f.as_str()))
                    .map(str::to_string),
            ),
            _ => {}
        }

        Self { message, verdict, fields }
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message.clone().unwrap_or_else(|| fallback.to_string())
    }

    pub fn mentions(&self, needle: &str) -> bool {
        self.message
            .as_deref()
            .is_some_and(|m| m.to_ascii_lowercase().contains(needle))
    }
}
