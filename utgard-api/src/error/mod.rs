//! Error handling module for the Utgard driver

use core::fmt;

use crate::core::types::ErrorCode;

/// Common error type used throughout the Utgard driver crates
///
/// Messages are static so the type stays usable without an allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Structural inconsistency in the probed hardware description
    Fault(&'static str),
    /// Requested item (device, resource, platform data) is absent
    NotFound(&'static str),
    /// Argument or externally supplied data has the wrong shape
    InvalidArgument(&'static str),
}

impl Error {
    /// Numeric code for this error
    pub const fn code(&self) -> ErrorCode {
        match self {
            Error::Fault(_) => ErrorCode::Fault,
            Error::NotFound(_) => ErrorCode::ItemNotFound,
            Error::InvalidArgument(_) => ErrorCode::InvalidArgs,
        }
    }

    /// Human readable detail attached to the error
    pub const fn message(&self) -> &'static str {
        match self {
            Error::Fault(msg) | Error::NotFound(msg) | Error::InvalidArgument(msg) => msg,
        }
    }

    /// Returns true for the "item not found" class of errors
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fault(msg) => write!(f, "Fault: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl From<Error> for ErrorCode {
    fn from(err: Error) -> Self {
        err.code()
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type for operations that can fail
pub type Result<T> = core::result::Result<T, Error>;

/// Collapses a result into the numeric code handed to the rest of the driver
pub fn to_code<T>(result: &Result<T>) -> ErrorCode {
    match result {
        Ok(_) => ErrorCode::Ok,
        Err(err) => err.code(),
    }
}

/// Creates a new fault error
pub fn fault(msg: &'static str) -> Error {
    Error::Fault(msg)
}

/// Creates a new not found error
pub fn not_found(msg: &'static str) -> Error {
    Error::NotFound(msg)
}

/// Creates a new invalid argument error
pub fn invalid_argument(msg: &'static str) -> Error {
    Error::InvalidArgument(msg)
}
