//! Unified error types for the request bin service.
//!
//! Error codes surfaced through the API:
//! - BIN_001: Bin id validation errors
//! - STORE_001-002: History store errors (delivery, read timeout)
//! - REQ_001: Request capture errors

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// History store error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// STORE_001: Command could not be delivered to the bin entity
    DeliveryFailed,
    /// STORE_002: Read timed out waiting for the entity to reply
    ReadTimeout,
}

impl StoreErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DeliveryFailed => "STORE_001",
            Self::ReadTimeout => "STORE_002",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::DeliveryFailed => 503,
            Self::ReadTimeout => 504,
        }
    }
}

/// Unified error type for the request bin service.
#[derive(Debug, Error)]
pub enum Error {
    /// History store error with code.
    #[error("[{code}] {message}")]
    Store {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Rejected bin id, with the rule that failed.
    #[error("invalid bin id: {0}")]
    InvalidBinId(String),

    /// Inbound request could not be captured (unreadable body).
    #[error("capture error: {0}")]
    Capture(String),

    /// History page could not be rendered.
    #[error("render error: {0}")]
    Render(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a history store error.
    pub fn store(code: StoreErrorCode, msg: impl Into<String>) -> Self {
        Self::Store {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Create a delivery failure (entity mailbox unreachable).
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::store(StoreErrorCode::DeliveryFailed, msg)
    }

    /// Create a read timeout error.
    pub fn read_timeout(msg: impl Into<String>) -> Self {
        Self::store(StoreErrorCode::ReadTimeout, msg)
    }

    pub fn invalid_bin_id(msg: impl Into<String>) -> Self {
        Self::InvalidBinId(msg.into())
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Store { http_status, .. } => *http_status,
            Self::InvalidBinId(_) => 400,
            Self::Capture(_) => 400,
            Self::Render(_) => 500,
            Self::Config(_) => 500,
            Self::Serialization(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Store { code, .. } => Some(code),
            Self::InvalidBinId(_) => Some("BIN_001"),
            Self::Capture(_) => Some("REQ_001"),
            _ => None,
        }
    }
}
