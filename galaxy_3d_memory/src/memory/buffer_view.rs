/// Buffer view - native texel view that follows a logical buffer across renames
///
/// A view is built against the slice current at the time, and remembers the
/// buffer revision it was built at. The buffer never notifies its views:
/// consumers call `update()` right before using `native_handle()`, which
/// rebuilds the native view when the revision has moved.

use std::sync::Arc;
use crate::error::Result;
use crate::memory::{LogicalBuffer, PhysicalBufferSlice};
use crate::{engine_bail_warn, engine_error, engine_trace};

// ===== BUFFER FORMAT =====

/// Element format of a texel buffer view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum BufferFormat {
    // Float formats
    R32_SFLOAT,
    R32G32_SFLOAT,
    R32G32B32_SFLOAT,
    R32G32B32A32_SFLOAT,

    // Integer formats (signed)
    R32_SINT,
    R32G32_SINT,
    R32G32B32A32_SINT,

    // Integer formats (unsigned)
    R32_UINT,
    R32G32_UINT,
    R32G32B32A32_UINT,

    // Short formats
    R16_UINT,
    R16G16B16A16_SFLOAT,

    // Byte formats
    R8_UINT,
    R8G8B8A8_UNORM,
    R8G8B8A8_UINT,
}

impl BufferFormat {
    /// Returns size in bytes of one element
    pub fn size_bytes(&self) -> u64 {
        match self {
            BufferFormat::R32_SFLOAT | BufferFormat::R32_SINT | BufferFormat::R32_UINT => 4,
            BufferFormat::R32G32_SFLOAT | BufferFormat::R32G32_SINT | BufferFormat::R32G32_UINT => 8,
            BufferFormat::R32G32B32_SFLOAT => 12,
            BufferFormat::R32G32B32A32_SFLOAT
            | BufferFormat::R32G32B32A32_SINT
            | BufferFormat::R32G32B32A32_UINT => 16,
            BufferFormat::R16_UINT => 2,
            BufferFormat::R16G16B16A16_SFLOAT => 8,
            BufferFormat::R8_UINT => 1,
            BufferFormat::R8G8B8A8_UNORM | BufferFormat::R8G8B8A8_UINT => 4,
        }
    }
}

// ===== VIEW DESC =====

/// Format and byte range of a view, relative to the start of the logical buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferViewDesc {
    pub format: BufferFormat,
    pub offset: u64,
    pub length: u64,
}

impl BufferViewDesc {
    /// View of the whole logical buffer
    pub fn whole(buffer: &LogicalBuffer, format: BufferFormat) -> Self {
        Self { format, offset: 0, length: buffer.slice_length() }
    }
}

// ===== BACKEND TRAITS =====

/// Native view object (e.g. a `VkBufferView`), destroyed when dropped
pub trait NativeBufferView: Send + Sync {
    /// Offset of the viewed range in the physical buffer
    fn offset(&self) -> u64;

    /// Length of the viewed range in bytes
    fn length(&self) -> u64;
}

/// Native view construction backend
pub trait ViewBackend: Send + Sync {
    /// Build a view of `desc`'s range inside `slice`
    ///
    /// `desc.offset` is relative to `slice.offset()`.
    ///
    /// # Errors
    ///
    /// `Error::ViewCreationFailed` when the backend rejects the parameters.
    fn create_view(
        &self,
        slice: &PhysicalBufferSlice,
        desc: &BufferViewDesc,
    ) -> Result<Arc<dyn NativeBufferView>>;
}

// ===== BUFFER VIEW =====

/// Texel view of a logical buffer, rebuilt lazily after renames
pub struct BufferView {
    backend: Arc<dyn ViewBackend>,
    buffer: Arc<LogicalBuffer>,
    desc: BufferViewDesc,
    revision: u64,
    native: Arc<dyn NativeBufferView>,
}

impl BufferView {
    /// Create a view and build it against the buffer's current slice
    ///
    /// # Errors
    ///
    /// - `Error::InvalidResource` if the range is empty, exceeds the logical
    ///   size, or is not a whole number of elements
    /// - Any error of the view backend
    pub fn new(
        backend: Arc<dyn ViewBackend>,
        buffer: Arc<LogicalBuffer>,
        desc: BufferViewDesc,
    ) -> Result<Self> {
        let element_size = desc.format.size_bytes();
        if desc.length == 0 {
            engine_bail_warn!("galaxy3d::BufferView", "View length must not be zero");
        }
        if desc.offset.checked_add(desc.length).map_or(true, |end| end > buffer.slice_length()) {
            engine_bail_warn!("galaxy3d::BufferView",
                "View range [{}, +{}) exceeds buffer size {}",
                desc.offset, desc.length, buffer.slice_length());
        }
        if desc.offset % element_size != 0 || desc.length % element_size != 0 {
            engine_bail_warn!("galaxy3d::BufferView",
                "View range [{}, +{}) is not a multiple of the {:?} element size {}",
                desc.offset, desc.length, desc.format, element_size);
        }

        let (slice, revision) = buffer.snapshot();
        let native = build_native(backend.as_ref(), &slice, &desc)?;

        Ok(Self { backend, buffer, desc, revision, native })
    }

    /// Bring the native view up to date with the buffer's current slice
    ///
    /// No-op when no rename happened since the last build.
    ///
    /// # Errors
    ///
    /// Any error of the view backend; the previous native view and cached
    /// revision are kept in that case.
    pub fn update(&mut self) -> Result<()> {
        let (slice, revision) = self.buffer.snapshot();
        if revision == self.revision {
            return Ok(());
        }

        self.native = build_native(self.backend.as_ref(), &slice, &self.desc)?;
        engine_trace!("galaxy3d::BufferView",
            "Rebuilt view for revision {} (was {})", revision, self.revision);
        self.revision = revision;
        Ok(())
    }

    /// Native view handle, valid for the current slice right after `update()`
    pub fn native_handle(&self) -> &Arc<dyn NativeBufferView> {
        &self.native
    }

    /// Buffer revision the native view was built at
    pub fn cached_revision(&self) -> u64 { self.revision }

    /// Whether the buffer was renamed since the last build
    pub fn is_stale(&self) -> bool {
        self.buffer.revision() != self.revision
    }

    /// Viewed logical buffer
    pub fn buffer(&self) -> &Arc<LogicalBuffer> { &self.buffer }

    /// View format and range
    pub fn desc(&self) -> &BufferViewDesc { &self.desc }

    /// Number of texel elements in the view
    pub fn element_count(&self) -> u64 {
        self.desc.length / self.desc.format.size_bytes()
    }
}

fn build_native(
    backend: &dyn ViewBackend,
    slice: &PhysicalBufferSlice,
    desc: &BufferViewDesc,
) -> Result<Arc<dyn NativeBufferView>> {
    backend.create_view(slice, desc).map_err(|e| {
        engine_error!("galaxy3d::BufferView",
            "Failed to build {:?} view at slice offset {}: {}", desc.format, slice.offset(), e);
        e
    })
}

#[cfg(test)]
#[path = "buffer_view_tests.rs"]
mod tests;
