//! Shared error type across tcpros crates.

use thiserror::Error;

/// Stable error codes (used by logs and test vectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Header block is truncated or inconsistent.
    MalformedHeader,
    /// Message or service response block is truncated or inconsistent.
    MalformedMessage,
    /// Peer or local validation refused the connection.
    Rejected,
    /// Service server reported a failed call.
    ServiceFailed,
    /// Declared length exceeds the configured limit.
    TooLarge,
    /// Configuration did not pass validation.
    InvalidConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Underlying stream error.
    Io,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MalformedHeader => "MALFORMED_HEADER",
            ErrorCode::MalformedMessage => "MALFORMED_MESSAGE",
            ErrorCode::Rejected => "REJECTED",
            ErrorCode::ServiceFailed => "SERVICE_FAILED",
            ErrorCode::TooLarge => "TOO_LARGE",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Io => "IO",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TcpRosError>;

/// Unified error type used by core and link.
#[derive(Debug, Error)]
pub enum TcpRosError {
    #[error("malformed header: {0}")]
    MalformedHeader(String),
    #[error("malformed message: {0}")]
    MalformedMessage(String),
    #[error("connection rejected: {0}")]
    Rejected(String),
    #[error("service call failed: {0}")]
    ServiceFailed(String),
    #[error("{what} of {len} bytes exceeds limit {limit}")]
    TooLarge {
        what: &'static str,
        len: usize,
        limit: usize,
    },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl TcpRosError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            TcpRosError::MalformedHeader(_) => ErrorCode::MalformedHeader,
            TcpRosError::MalformedMessage(_) => ErrorCode::MalformedMessage,
            TcpRosError::Rejected(_) => ErrorCode::Rejected,
            TcpRosError::ServiceFailed(_) => ErrorCode::ServiceFailed,
            TcpRosError::TooLarge { .. } => ErrorCode::TooLarge,
            TcpRosError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            TcpRosError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            TcpRosError::Io(_) => ErrorCode::Io,
            TcpRosError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// True for errors caused by bytes that do not follow the wire format.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            TcpRosError::MalformedHeader(_) | TcpRosError::MalformedMessage(_)
        )
    }
}
