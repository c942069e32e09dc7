//! sgx-enable error types
//!
//! A classified [`DeviceStatus`](crate::DeviceStatus) is never an error.
//! These are the operational failures that stop a probe, read or write
//! from completing.

use thiserror::Error;

/// SDK status code for an unexpected failure
pub const STATUS_UNEXPECTED: u32 = 0x0001;

/// SDK status code for an invalid parameter
pub const STATUS_INVALID_PARAMETER: u32 = 0x0002;

/// SDK status code for a permission failure
pub const STATUS_NO_PRIVILEGE: u32 = 0x5002;

/// sgx-enable error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required probe or record access was denied
    #[error("No privilege: {0}")]
    NoPrivilege(String),

    /// The caller supplied an unusable parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other probe, read or write failure
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Numeric status code as reported by the platform SDK
    pub fn code(&self) -> u32 {
        match self {
            Error::NoPrivilege(_) => STATUS_NO_PRIVILEGE,
            Error::InvalidParameter(_) => STATUS_INVALID_PARAMETER,
            Error::Unexpected(_) => STATUS_UNEXPECTED,
        }
    }

    /// Whether rerunning with elevated privileges could succeed
    pub fn is_no_privilege(&self) -> bool {
        matches!(self, Error::NoPrivilege(_))
    }
}

/// Result type alias for sgx-enable operations
pub type Result<T> = std::result::Result<T, Error>;
