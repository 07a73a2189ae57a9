//! Core types shared by the Utgard driver crates

use core::fmt;

/// Physical (bus) address type
pub type PhysAddr = usize;

/// Register block offset relative to the GPU controller base
pub type RegOffset = u32;

/// Interrupt line number as reported by the platform
pub type IrqNumber = u32;

/// Numeric status codes understood by the rest of the driver.
///
/// The values are part of the user-space ABI and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// Success
    Ok = 0,
    /// General failure or structural inconsistency
    Fault = -1,
    /// Invalid function requested
    InvalidFunc = -2,
    /// Invalid arguments
    InvalidArgs = -3,
    /// Insufficient memory
    NoMem = -4,
    /// Timeout occurred
    Timeout = -5,
    /// Interrupted, the call should be restarted
    RestartSyscall = -6,
    /// Requested item was not found
    ItemNotFound = -7,
    /// Resource busy
    Busy = -8,
    /// Operation not supported
    Unsupported = -9,
}

impl ErrorCode {
    /// Raw value handed across the driver boundary
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Maps a raw value back to a known code
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(ErrorCode::Ok),
            -1 => Some(ErrorCode::Fault),
            -2 => Some(ErrorCode::InvalidFunc),
            -3 => Some(ErrorCode::InvalidArgs),
            -4 => Some(ErrorCode::NoMem),
            -5 => Some(ErrorCode::Timeout),
            -6 => Some(ErrorCode::RestartSyscall),
            -7 => Some(ErrorCode::ItemNotFound),
            -8 => Some(ErrorCode::Busy),
            -9 => Some(ErrorCode::Unsupported),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Ok => write!(f, "Success"),
            ErrorCode::Fault => write!(f, "General failure"),
            ErrorCode::InvalidFunc => write!(f, "Invalid function"),
            ErrorCode::InvalidArgs => write!(f, "Invalid arguments"),
            ErrorCode::NoMem => write!(f, "Out of memory"),
            ErrorCode::Timeout => write!(f, "Operation timed out"),
            ErrorCode::RestartSyscall => write!(f, "Restart system call"),
            ErrorCode::ItemNotFound => write!(f, "Item not found"),
            ErrorCode::Busy => write!(f, "Resource busy"),
            ErrorCode::Unsupported => write!(f, "Operation not supported"),
        }
    }
}
