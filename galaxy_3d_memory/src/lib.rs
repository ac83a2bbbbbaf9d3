/*!
# Galaxy 3D Memory

Buffer renaming layer of the Galaxy 3D engine.

A [`LogicalBuffer`](memory::LogicalBuffer) is the stable handle the engine
holds for a GPU buffer. Its contents live in one *slice* of a physical
buffer at a time. Discarding the contents renames the buffer to a fresh
slice, so the CPU can write new data while the GPU still reads the previous
slice. Displaced slices are parked in a per-submission
[`SliceTracker`](memory::SliceTracker) and return to the buffer's slice pool
once that submission has completed.

## Architecture

- **PhysicalMemoryBackend**: trait implemented by backends to allocate physical buffers
- **LogicalBuffer**: current slice, revision counter, slice pool
- **BufferView**: native texel view rebuilt lazily when the revision moves
- **SliceTracker**: deferred return of displaced slices

Backends (Vulkan, ...) implement the `PhysicalMemoryBackend` and
`ViewBackend` traits and are passed explicitly to each logical buffer.
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod memory;
pub mod utils;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Global logger slot
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::{BufferConfig, DEFAULT_INITIAL_SLICE_COUNT, DEFAULT_SLICE_ALIGNMENT};

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Memory sub-module with all buffer types
    pub mod memory {
        pub use crate::memory::*;
    }

    // Utility sub-module
    pub mod utils {
        pub use crate::utils::*;
    }
}
