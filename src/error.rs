use crate::transport::TransportError;
use serde::Deserialize;
use thiserror::Error;

/// Fallback shown when a rejected login/register call carries no `detail`.
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed";

/// Structured error context for configuration and request errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.base_url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected format, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "config_loader", "client_builder")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The user-facing error taxonomy every failure collapses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network, timeout, or server-side hiccup. Safe to resubmit.
    Transient,
    /// Input rejected by the server. The message is shown verbatim.
    Validation,
    /// Missing, expired, or rejected credential. Forces session teardown.
    Unauthorized,
    /// A batch submission with no usable lines.
    EmptyInput,
}

impl ErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Transient)
    }
}

/// Error payload the API returns on non-2xx responses.
///
/// `detail` is usually a string; request-validation failures carry a list of
/// `{loc, msg, type}` entries instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Parse an error body leniently; anything unparseable yields an empty body.
    pub fn from_slice(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// Render `detail` as a single message, if one is present.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| match item.get("msg").and_then(|m| m.as_str()) {
                        Some(msg) => msg.to_string(),
                        None => item.to_string(),
                    })
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("; "))
                }
            }
            other => Some(other.to_string()),
        }
    }
}

/// Unified error type for the classifier client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication failed: {message}")]
    Authentication { status: Option<u16>, message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Validation error: {message}")]
    Validation { status: u16, message: String },

    #[error("Remote error: HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Empty input: {message}")]
    EmptyInput { message: String },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Map a non-2xx response from a protected endpoint onto the taxonomy.
    pub fn from_status(status: u16, body: &ApiErrorBody) -> Self {
        let detail = body.message();
        match status {
            401 | 403 => Error::Unauthorized {
                message: detail.unwrap_or_else(|| "Credential missing or rejected".to_string()),
            },
            400 | 404 | 409 | 422 => Error::Validation {
                status,
                message: detail.unwrap_or_else(|| format!("Request rejected (HTTP {})", status)),
            },
            _ => Error::Remote {
                status,
                message: detail.unwrap_or_else(|| format!("Server returned HTTP {}", status)),
            },
        }
    }

    /// Map a rejected login/register call. Any status is terminal for that attempt.
    pub fn authentication(status: Option<u16>, body: &ApiErrorBody) -> Self {
        Error::Authentication {
            status,
            message: body
                .message()
                .unwrap_or_else(|| AUTH_FAILED_MESSAGE.to_string()),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Error::Unauthorized {
            message: msg.into(),
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Authentication { .. } | Error::Unauthorized { .. } => ErrorKind::Unauthorized,
            Error::Validation { .. } | Error::Configuration { .. } => ErrorKind::Validation,
            Error::EmptyInput { .. } => ErrorKind::EmptyInput,
            Error::Remote { .. }
            | Error::Transport(_)
            | Error::Serialization(_)
            | Error::Io(_) => ErrorKind::Transient,
        }
    }

    /// The message a user should see. Server-supplied messages pass through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Error::Authentication { message, .. }
            | Error::Unauthorized { message }
            | Error::Validation { message, .. }
            | Error::Remote { message, .. }
            | Error::EmptyInput { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    pub fn notice(&self) -> ErrorNotice {
        ErrorNotice {
            kind: self.kind(),
            message: self.user_message(),
        }
    }
}

/// Cloneable, dismissible error record kept in application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for ErrorNotice {
    fn from(err: &Error) -> Self {
        err.notice()
    }
}
