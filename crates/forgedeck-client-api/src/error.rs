use thiserror::Error;

/// Forge client error types
///
/// Historically callers rendered the message text directly, so the `Display`
/// output of `Api` and `Transport` must stay byte-for-byte compatible with
/// the strings they already match on (`"Error {status}"` and the raw
/// transport error text).
#[derive(Error, Debug)]
pub enum ClientError {
    /// Well-formed HTTP response with a non-success status
    #[error("Error {status}")]
    Api { status: u16 },

    /// Failure to complete the HTTP exchange (DNS, timeout, reset)
    #[error("{0}")]
    Transport(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Operation not supported: {0}")]
    NotSupported(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// True for errors produced by a completed HTTP exchange, as opposed to
    /// transport-level failures.
    pub fn is_api(&self) -> bool {
        matches!(self, ClientError::Api { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_is_status_only() {
        let err = ClientError::Api { status: 404 };
        assert_eq!(err.to_string(), "Error 404");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_api());
    }

    #[test]
    fn test_transport_error_preserves_text() {
        let err = ClientError::Transport("connection reset by peer".to_string());
        assert_eq!(err.to_string(), "connection reset by peer");
        assert_eq!(err.status(), None);
    }
}
