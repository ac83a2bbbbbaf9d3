//! Unit tests for error.rs
//!
//! Tests all Error variants, their trait implementations and the error macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("vkBindBufferMemory failed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("vkBindBufferMemory failed"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

#[test]
fn test_allocation_failed_display() {
    let err = Error::AllocationFailed("4096 bytes, DEVICE_LOCAL".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Allocation failed"));
    assert!(display.contains("4096 bytes"));
}

#[test]
fn test_view_creation_failed_display() {
    let err = Error::ViewCreationFailed("format not supported".to_string());
    let display = format!("{}", err);
    assert!(display.contains("View creation failed"));
    assert!(display.contains("format not supported"));
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("size must not be zero".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("size must not be zero"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    assert!(format!("{:?}", Error::BackendError("x".to_string())).contains("BackendError"));
    assert!(format!("{:?}", Error::OutOfMemory).contains("OutOfMemory"));
    assert!(format!("{:?}", Error::AllocationFailed("x".to_string())).contains("AllocationFailed"));
    assert!(format!("{:?}", Error::ViewCreationFailed("x".to_string())).contains("ViewCreationFailed"));
    assert!(format!("{:?}", Error::InvalidResource("x".to_string())).contains("InvalidResource"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::AllocationFailed("test".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// RESULT TYPE TESTS
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<u64> {
        Err(Error::OutOfMemory)
    }

    fn outer() -> Result<u64> {
        inner()?;
        Ok(256)
    }

    assert!(matches!(outer(), Err(Error::OutOfMemory)));
}

// ============================================================================
// ERROR MACRO TESTS
// ============================================================================

#[test]
fn test_engine_err_builds_backend_error() {
    let err = crate::engine_err!("galaxy3d::test", "bad value {}", 7);
    match err {
        Error::BackendError(msg) => assert_eq!(msg, "bad value 7"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_engine_bail_returns_early() {
    fn fails() -> Result<()> {
        crate::engine_bail!("galaxy3d::test", "stopped at {}", "step 1");
    }

    assert!(matches!(fails(), Err(Error::BackendError(_))));
}

#[test]
fn test_engine_bail_warn_builds_invalid_resource() {
    fn rejects(size: u64) -> Result<u64> {
        if size == 0 {
            crate::engine_bail_warn!("galaxy3d::test", "size must not be zero");
        }
        Ok(size)
    }

    assert!(matches!(rejects(0), Err(Error::InvalidResource(_))));
    assert_eq!(rejects(16).unwrap(), 16);
}
