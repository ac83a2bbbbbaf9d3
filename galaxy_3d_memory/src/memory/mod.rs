/// Memory module - logical buffers, slice pools, views and trackers

// Module declarations
pub mod physical_buffer;
pub mod buffer_slice;
pub mod slice_pool;
pub mod logical_buffer;
pub mod buffer_view;
pub mod slice_tracker;

// Re-export everything
pub use physical_buffer::*;
pub use buffer_slice::*;
pub use slice_pool::*;
pub use logical_buffer::*;
pub use buffer_view::*;
pub use slice_tracker::*;

// Mock device for tests (no GPU required)
#[cfg(test)]
pub mod mock_device;
