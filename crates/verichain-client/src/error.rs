//! Error types for the document client.

/// Client errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// Required input missing or malformed, or rejected by the backend (400).
    #[error("invalid input: {message}")]
    Validation { message: String },

    /// Transport or connection failure.
    #[error("network error: {message}")]
    Network { message: String },

    /// Request exceeded its time budget.
    #[error("request timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    /// Non-2xx response not covered by a more specific variant.
    #[error("backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    /// Backend does not know the requested resource (404).
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Retrieve payload matched none of the accepted shapes.
    ///
    /// Only produced by [`crate::normalize::Payload::decode`]; `normalize`
    /// turns it into an empty record list.
    #[error("unsupported payload shape: {kind}")]
    UnsupportedShape { kind: &'static str },

    /// Local file access failed.
    #[error("io error: {message}")]
    Io { message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ClientError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Caller input / setup
            Self::Validation { .. } => 1,
            Self::Config { .. } => 1,
            Self::Io { .. } => 1,

            Self::NotFound { .. } => 3,

            // Backend said no
            Self::Backend { .. } => 4,
            Self::UnsupportedShape { .. } => 4,

            // Transport
            Self::Network { .. } => 5,
            Self::Timeout { .. } => 6,
        }
    }

    /// Whether the failure happened below the HTTP layer (no usable response).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
