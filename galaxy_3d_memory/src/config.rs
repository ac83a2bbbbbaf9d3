/// Logical buffer configuration

/// Default stride alignment of physical slices, in bytes
///
/// 256 satisfies every minimum offset alignment a Vulkan implementation may
/// report for uniform, storage and texel buffers.
pub const DEFAULT_SLICE_ALIGNMENT: u64 = 256;

/// Default number of slices cut at the first pool replenishment
pub const DEFAULT_INITIAL_SLICE_COUNT: u32 = 1;

/// Tuning knobs for a logical buffer's slice pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Slices cut the first time the free pool runs dry (doubles afterwards)
    pub initial_slice_count: u32,
    /// Stride alignment between consecutive slices (power of two)
    pub slice_alignment: u64,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_slice_count: DEFAULT_INITIAL_SLICE_COUNT,
            slice_alignment: DEFAULT_SLICE_ALIGNMENT,
        }
    }
}

impl BufferConfig {
    /// Config for buffers renamed many times per frame (dynamic constants, streaming vertices)
    pub fn streaming() -> Self {
        Self {
            initial_slice_count: 4,
            ..Self::default()
        }
    }
}
