//! Core backend abstraction traits
//!
//! [`GraphicsBackend`] is the only way mesh handles talk to the GPU. It covers
//! buffer upload, vertex attribute declaration and the two draw calls meshes
//! issue; everything else (pipelines, shaders, textures, presentation) belongs
//! to the caller.

use crate::backend::types::*;
use crate::mesh::IndexFormat;
use thiserror::Error;

/// Backend error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Failed to initialize backend: {0}")]
    InitializationFailed(String),
    #[error("Failed to create device: {0}")]
    DeviceCreationFailed(String),
    #[error("Upload of {len} bytes at offset {offset} exceeds buffer size {size}")]
    UploadOutOfBounds { offset: u64, len: u64, size: u64 },
    #[error("Unknown buffer handle {0:?}")]
    UnknownBuffer(BufferHandle),
    #[error("Unknown vertex array handle {0:?}")]
    UnknownVertexArray(VertexArrayHandle),
    #[error("Out of memory")]
    OutOfMemory,
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Handle to a GPU buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub(crate) u64);

impl BufferHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Handle to a vertex array (attribute bindings plus optional element buffer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub(crate) u64);

impl VertexArrayHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Graphics API boundary used by mesh handles.
///
/// All calls happen on the thread that owns the graphics context. Uploads and
/// draws are treated as opaque blocking calls.
pub trait GraphicsBackend {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    // Upload

    /// Allocate a buffer of `desc.size` bytes.
    fn create_buffer(&mut self, desc: &BufferDescriptor) -> BackendResult<BufferHandle>;

    /// Copy `data` into `buffer` starting at byte `offset`.
    fn upload_sub_region(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> BackendResult<()>;

    /// Mark the upload of `buffer` as complete.
    fn finalize_upload(&mut self, buffer: BufferHandle, hint: UsageHint) -> BackendResult<()>;

    // Attribute binding

    /// Create an empty vertex array.
    fn create_vertex_array(&mut self) -> BackendResult<VertexArrayHandle>;

    /// Declare one attribute pointer reading from `buffer`.
    fn declare_attribute(
        &mut self,
        vertex_array: VertexArrayHandle,
        buffer: BufferHandle,
        binding: &AttributeBinding,
    ) -> BackendResult<()>;

    /// Attach an element (index) buffer to a vertex array.
    fn bind_element_buffer(
        &mut self,
        vertex_array: VertexArrayHandle,
        buffer: BufferHandle,
        format: IndexFormat,
    ) -> BackendResult<()>;

    // Draw

    /// Draw `count` vertices (or indices, when an element buffer is bound) as triangles.
    fn draw_triangles(&mut self, vertex_array: VertexArrayHandle, count: u32);

    /// Draw the first `count` vertices as points, ignoring any element buffer.
    fn draw_points(&mut self, vertex_array: VertexArrayHandle, count: u32);

    // Resource cleanup

    /// Destroy a buffer
    fn destroy_buffer(&mut self, buffer: BufferHandle);

    /// Destroy a vertex array
    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle);
}
