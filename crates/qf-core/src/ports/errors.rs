use thiserror::Error;

/// Failure reported by the remote data service.
///
/// The gateway never returns partial results: an operation either succeeds as a
/// whole or fails with one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),

    #[error("remote returned status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("failed to decode remote response: {0}")]
    Decode(String),

    #[error("record not found")]
    NotFound,
}

impl GatewayError {
    /// Transient failures worth retrying as-is.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Network(_) => true,
            GatewayError::Status { code, .. } => *code == 429 || *code >= 500,
            GatewayError::Decode(_) | GatewayError::NotFound => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum WidgetSlotError {
    #[error("widget slot io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode widget quote: {0}")]
    Encode(String),
}
