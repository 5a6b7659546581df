//! Error types for the inventory console

use thiserror::Error;

/// Transport code reported when the inventory service could not be reached
pub const TRANSPORT_FAILURE_CODE: i32 = -1;

/// Main error type for inventory console operations
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// No response was received (connection refused, DNS, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The inventory service answered with a non-success status
    #[error("Status [{code}] {text}")]
    Status { code: u16, text: String },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A client-side precondition did not hold; the operation was skipped
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// Code used by error reports: `-1` for transport failures, the HTTP
    /// status for server errors and `0` for anything local.
    pub fn transport_code(&self) -> i32 {
        match self {
            ConsoleError::Transport(_) => TRANSPORT_FAILURE_CODE,
            ConsoleError::Status { code, .. } => i32::from(*code),
            _ => 0,
        }
    }

    /// Whether this error came back from the remote service (or failed to
    /// reach it) rather than from local processing.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ConsoleError::Transport(_) | ConsoleError::Status { .. }
        )
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ConsoleError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ConsoleError::Status {
                code: status.as_u16(),
                text: status.canonical_reason().unwrap_or_default().to_string(),
            }
        } else {
            ConsoleError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(e: serde_json::Error) -> Self {
        ConsoleError::Decode(e.to_string())
    }
}

/// Result type alias for inventory console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_code() {
        let err = ConsoleError::Transport("connection refused".into());
        assert_eq!(err.transport_code(), -1);
        assert!(err.is_remote());

        let err = ConsoleError::Status {
            code: 404,
            text: "Not Found".into(),
        };
        assert_eq!(err.transport_code(), 404);
        assert!(err.is_remote());

        let err = ConsoleError::Precondition("no family".into());
        assert_eq!(err.transport_code(), 0);
        assert!(!err.is_remote());
    }

    #[test]
    fn test_status_display() {
        let err = ConsoleError::Status {
            code: 500,
            text: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "Status [500] Internal Server Error");
    }
}
