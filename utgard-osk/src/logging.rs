//! Logging support for utgard-osk
//!
//! The macros forward to the `log` crate when the `log` feature is enabled
//! and compile to nothing otherwise. Arguments are still evaluated-as-used in
//! the disabled case so callers do not trip unused-variable warnings.

/// Debug-level logging
macro_rules! osk_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::debug!($($arg)*);
        #[cfg(not(feature = "log"))]
        { let _ = ($($arg)*); }
    }
}

/// Info-level logging
macro_rules! osk_info {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::info!($($arg)*);
        #[cfg(not(feature = "log"))]
        { let _ = ($($arg)*); }
    }
}

/// Warn-level logging
macro_rules! osk_warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::warn!($($arg)*);
        #[cfg(not(feature = "log"))]
        { let _ = ($($arg)*); }
    }
}

/// Error-level logging
macro_rules! osk_error {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::error!($($arg)*);
        #[cfg(not(feature = "log"))]
        { let _ = ($($arg)*); }
    }
}

pub(crate) use {osk_debug, osk_error, osk_info, osk_warn};
