use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum MoodError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, MoodError>;

/// How a failed upstream call should be treated by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// Rate limit or quota exhausted (HTTP 429)
    QuotaExhausted,
    /// Model or endpoint not found (HTTP 404)
    NotFound,
    /// Request never got a response
    Network,
    /// Response arrived but could not be understood
    Malformed,
    /// Any other API-reported failure
    Api,
}

impl UpstreamErrorKind {
    /// Map an HTTP status code to a kind, if the status alone decides it.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            429 => Some(Self::QuotaExhausted),
            404 => Some(Self::NotFound),
            _ => None,
        }
    }

    /// Map a Gemini `error.status` string such as `RESOURCE_EXHAUSTED`.
    pub fn from_api_status(status: &str) -> Option<Self> {
        match status {
            "RESOURCE_EXHAUSTED" => Some(Self::QuotaExhausted),
            "NOT_FOUND" => Some(Self::NotFound),
            _ => None,
        }
    }

    /// Last-resort classification from free error text.
    pub fn from_message(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("429") || lowered.contains("quota") {
            Self::QuotaExhausted
        } else if lowered.contains("404") {
            Self::NotFound
        } else {
            Self::Api
        }
    }

    /// Quota and not-found failures are downgraded to a canned suggestion.
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::QuotaExhausted | Self::NotFound)
    }
}

/// Error returned by a [`crate::transport::Transport`]
#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message}")]
pub struct UpstreamError {
    pub kind: UpstreamErrorKind,
    pub message: String,
}

impl UpstreamError {
    pub fn new(kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Malformed, message)
    }
}
