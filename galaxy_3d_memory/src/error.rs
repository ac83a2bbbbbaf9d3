//! Error types for the Galaxy3D memory layer
//!
//! This module defines the error type used by logical buffers, slice pools,
//! buffer views and the backends that implement physical allocation.

use std::fmt;

/// Result type for Galaxy3D memory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D memory errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Vulkan, mock, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// The physical memory backend refused an allocation request
    AllocationFailed(String),

    /// The view backend rejected the requested view against the current slice
    ViewCreationFailed(String),

    /// Invalid creation parameters (buffer, view, configuration)
    InvalidResource(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::AllocationFailed(msg) => write!(f, "Allocation failed: {}", msg),
            Error::ViewCreationFailed(msg) => write!(f, "View creation failed: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build an `Error::BackendError` from it
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_memory::engine_err;
/// let err = engine_err!("galaxy3d::vulkan", "Failed to bind memory: {}", -3);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return `Err(Error::BackendError)` from the current function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// Log a WARN message and build an `Error::InvalidResource` from it
///
/// Used for rejected creation parameters: the caller passed something wrong,
/// nothing failed on the device.
#[macro_export]
macro_rules! engine_warn_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_warn!($source, "{}", message);
        $crate::galaxy3d::Error::InvalidResource(message)
    }};
}

/// Log a WARN message and return `Err(Error::InvalidResource)` from the current function
#[macro_export]
macro_rules! engine_bail_warn {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_warn_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
