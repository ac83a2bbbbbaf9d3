/// Alignment helpers for slice strides and offsets

/// Round `value` up to the next multiple of `alignment`
///
/// `alignment` must be a power of two. Returns None when the rounded value
/// does not fit in a `u64`.
///
/// # Example
///
/// ```
/// use galaxy_3d_memory::galaxy3d::utils::align_up;
///
/// assert_eq!(align_up(100, 256), Some(256));
/// assert_eq!(align_up(512, 256), Some(512));
/// assert_eq!(align_up(u64::MAX, 256), None);
/// ```
pub fn align_up(value: u64, alignment: u64) -> Option<u64> {
    debug_assert!(alignment.is_power_of_two(), "alignment {} is not a power of two", alignment);
    value.checked_add(alignment - 1).map(|v| v & !(alignment - 1))
}

#[cfg(test)]
#[path = "align_tests.rs"]
mod tests;
