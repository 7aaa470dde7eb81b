//! Error types for mqconn-core
//!
//! Encoding and decoding a connection block never fail: allocation failure
//! aborts and unsupported features are dropped. The only fallible surface
//! is loading and validating configuration.

use thiserror::Error;

/// Result type for mqconn-core operations
pub type Result<T> = std::result::Result<T, CnoError>;

/// mqconn-core error types
#[derive(Error, Debug)]
pub enum CnoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CnoError {
    fn from(e: serde_json::Error) -> Self {
        CnoError::Serialization(e.to_string())
    }
}

impl CnoError {
    /// Get error code for FFI
    pub fn code(&self) -> i32 {
        match self {
            CnoError::Io(_) => 1,
            CnoError::InvalidConfig(_) => 17,
            CnoError::Serialization(_) => 9,
        }
    }
}
