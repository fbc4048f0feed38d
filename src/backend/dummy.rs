//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't talk to a GPU. It keeps uploaded bytes in memory,
//! tracks vertex array bindings and records every call, so tests and the
//! demo can inspect exactly what a mesh handle did.

use std::collections::HashMap;

use crate::backend::traits::*;
use crate::backend::types::*;
use crate::mesh::IndexFormat;

/// A backend call as recorded by [`DummyBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateBuffer { buffer: BufferHandle, size: u64 },
    UploadSubRegion { buffer: BufferHandle, offset: u64, len: u64 },
    FinalizeUpload { buffer: BufferHandle, hint: UsageHint },
    CreateVertexArray(VertexArrayHandle),
    DeclareAttribute { vertex_array: VertexArrayHandle, binding: AttributeBinding },
    BindElementBuffer { vertex_array: VertexArrayHandle, buffer: BufferHandle, format: IndexFormat },
    DrawTriangles { vertex_array: VertexArrayHandle, count: u32, indexed: bool },
    DrawPoints { vertex_array: VertexArrayHandle, count: u32 },
    DestroyBuffer(BufferHandle),
    DestroyVertexArray(VertexArrayHandle),
}

struct StoredBuffer {
    descriptor: BufferDescriptor,
    data: Vec<u8>,
    finalized: Option<UsageHint>,
}

#[derive(Default)]
struct VertexArrayState {
    attributes: Vec<(BufferHandle, AttributeBinding)>,
    element_buffer: Option<(BufferHandle, IndexFormat)>,
}

/// In-memory backend that records every call.
#[derive(Default)]
pub struct DummyBackend {
    buffers: HashMap<u64, StoredBuffer>,
    vertex_arrays: HashMap<u64, VertexArrayState>,
    calls: Vec<BackendCall>,
    memory_limit: Option<u64>,
    allocated: u64,
    next_buffer_id: u64,
    next_vertex_array_id: u64,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self {
            next_buffer_id: 1,
            next_vertex_array_id: 1,
            ..Default::default()
        }
    }

    /// Fail buffer creation with [`BackendError::OutOfMemory`] once more than
    /// `bytes` are allocated.
    pub fn with_memory_limit(mut self, bytes: u64) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    /// All calls recorded so far, oldest first.
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Forget recorded calls (resources stay alive).
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Bytes currently stored in a buffer.
    pub fn buffer_data(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer.0).map(|b| b.data.as_slice())
    }

    /// Usage hint a buffer was finalized with, if finalized.
    pub fn buffer_usage_hint(&self, buffer: BufferHandle) -> Option<UsageHint> {
        self.buffers.get(&buffer.0).and_then(|b| b.finalized)
    }

    /// Attribute bindings declared on a vertex array, in declaration order.
    pub fn attribute_bindings(&self, vertex_array: VertexArrayHandle) -> Vec<AttributeBinding> {
        self.vertex_arrays
            .get(&vertex_array.0)
            .map(|state| state.attributes.iter().map(|(_, b)| *b).collect())
            .unwrap_or_default()
    }

    /// Element buffer bound to a vertex array.
    pub fn element_buffer(
        &self,
        vertex_array: VertexArrayHandle,
    ) -> Option<(BufferHandle, IndexFormat)> {
        self.vertex_arrays
            .get(&vertex_array.0)
            .and_then(|state| state.element_buffer)
    }

    /// Number of buffers not yet destroyed.
    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of vertex arrays not yet destroyed.
    pub fn live_vertex_array_count(&self) -> usize {
        self.vertex_arrays.len()
    }

    /// Number of draw calls (triangles and points) recorded.
    pub fn draw_call_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    BackendCall::DrawTriangles { .. } | BackendCall::DrawPoints { .. }
                )
            })
            .count()
    }

    fn vertex_array_mut(
        &mut self,
        vertex_array: VertexArrayHandle,
    ) -> BackendResult<&mut VertexArrayState> {
        self.vertex_arrays
            .get_mut(&vertex_array.0)
            .ok_or(BackendError::UnknownVertexArray(vertex_array))
    }
}

impl GraphicsBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy"
    }

    fn create_buffer(&mut self, desc: &BufferDescriptor) -> BackendResult<BufferHandle> {
        if let Some(limit) = self.memory_limit {
            if self.allocated + desc.size > limit {
                log::trace!(
                    "DummyBackend: refusing buffer {:?} ({} bytes, {} of {} in use)",
                    desc.label,
                    desc.size,
                    self.allocated,
                    limit
                );
                return Err(BackendError::OutOfMemory);
            }
        }

        let buffer = BufferHandle(self.next_buffer_id);
        self.next_buffer_id += 1;
        self.allocated += desc.size;
        self.buffers.insert(
            buffer.0,
            StoredBuffer {
                descriptor: desc.clone(),
                data: vec![0u8; desc.size as usize],
                finalized: None,
            },
        );
        log::trace!(
            "DummyBackend: creating buffer {:?} (size: {})",
            desc.label,
            desc.size
        );
        self.calls.push(BackendCall::CreateBuffer {
            buffer,
            size: desc.size,
        });
        Ok(buffer)
    }

    fn upload_sub_region(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> BackendResult<()> {
        let stored = self
            .buffers
            .get_mut(&buffer.0)
            .ok_or(BackendError::UnknownBuffer(buffer))?;
        let end = offset + data.len() as u64;
        if end > stored.descriptor.size {
            return Err(BackendError::UploadOutOfBounds {
                offset,
                len: data.len() as u64,
                size: stored.descriptor.size,
            });
        }
        stored.data[offset as usize..end as usize].copy_from_slice(data);
        log::trace!(
            "DummyBackend: upload_sub_region {:?} offset={} len={}",
            stored.descriptor.label,
            offset,
            data.len()
        );
        self.calls.push(BackendCall::UploadSubRegion {
            buffer,
            offset,
            len: data.len() as u64,
        });
        Ok(())
    }

    fn finalize_upload(&mut self, buffer: BufferHandle, hint: UsageHint) -> BackendResult<()> {
        let stored = self
            .buffers
            .get_mut(&buffer.0)
            .ok_or(BackendError::UnknownBuffer(buffer))?;
        stored.finalized = Some(hint);
        log::trace!("DummyBackend: finalize_upload {:?} ({:?})", buffer, hint);
        self.calls.push(BackendCall::FinalizeUpload { buffer, hint });
        Ok(())
    }

    fn create_vertex_array(&mut self) -> BackendResult<VertexArrayHandle> {
        let vertex_array = VertexArrayHandle(self.next_vertex_array_id);
        self.next_vertex_array_id += 1;
        self.vertex_arrays
            .insert(vertex_array.0, VertexArrayState::default());
        log::trace!("DummyBackend: creating vertex array {:?}", vertex_array);
        self.calls.push(BackendCall::CreateVertexArray(vertex_array));
        Ok(vertex_array)
    }

    fn declare_attribute(
        &mut self,
        vertex_array: VertexArrayHandle,
        buffer: BufferHandle,
        binding: &AttributeBinding,
    ) -> BackendResult<()> {
        if !self.buffers.contains_key(&buffer.0) {
            return Err(BackendError::UnknownBuffer(buffer));
        }
        let state = self.vertex_array_mut(vertex_array)?;
        state.attributes.retain(|(_, b)| b.slot != binding.slot);
        state.attributes.push((buffer, *binding));
        log::trace!(
            "DummyBackend: declare_attribute slot={} components={} stride={} offset={}",
            binding.slot,
            binding.component_count,
            binding.stride,
            binding.byte_offset
        );
        self.calls.push(BackendCall::DeclareAttribute {
            vertex_array,
            binding: *binding,
        });
        Ok(())
    }

    fn bind_element_buffer(
        &mut self,
        vertex_array: VertexArrayHandle,
        buffer: BufferHandle,
        format: IndexFormat,
    ) -> BackendResult<()> {
        if !self.buffers.contains_key(&buffer.0) {
            return Err(BackendError::UnknownBuffer(buffer));
        }
        self.vertex_array_mut(vertex_array)?.element_buffer = Some((buffer, format));
        log::trace!(
            "DummyBackend: bind_element_buffer {:?} -> {:?} ({:?})",
            buffer,
            vertex_array,
            format
        );
        self.calls.push(BackendCall::BindElementBuffer {
            vertex_array,
            buffer,
            format,
        });
        Ok(())
    }

    fn draw_triangles(&mut self, vertex_array: VertexArrayHandle, count: u32) {
        let Some(state) = self.vertex_arrays.get(&vertex_array.0) else {
            log::warn!("DummyBackend: draw with unknown vertex array {:?}", vertex_array);
            return;
        };
        let indexed = state.element_buffer.is_some();
        log::trace!(
            "DummyBackend: draw_triangles {:?} count={} indexed={}",
            vertex_array,
            count,
            indexed
        );
        self.calls.push(BackendCall::DrawTriangles {
            vertex_array,
            count,
            indexed,
        });
    }

    fn draw_points(&mut self, vertex_array: VertexArrayHandle, count: u32) {
        if !self.vertex_arrays.contains_key(&vertex_array.0) {
            log::warn!("DummyBackend: draw with unknown vertex array {:?}", vertex_array);
            return;
        }
        log::trace!("DummyBackend: draw_points {:?} count={}", vertex_array, count);
        self.calls.push(BackendCall::DrawPoints {
            vertex_array,
            count,
        });
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        if let Some(stored) = self.buffers.remove(&buffer.0) {
            self.allocated -= stored.descriptor.size;
            log::trace!("DummyBackend: destroying buffer {:?}", stored.descriptor.label);
        }
        self.calls.push(BackendCall::DestroyBuffer(buffer));
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.vertex_arrays.remove(&vertex_array.0);
        log::trace!("DummyBackend: destroying vertex array {:?}", vertex_array);
        self.calls.push(BackendCall::DestroyVertexArray(vertex_array));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_stores_bytes() {
        let mut backend = DummyBackend::new();
        let buffer = backend
            .create_buffer(&BufferDescriptor::new(8, BufferUsage::VERTEX))
            .unwrap();
        backend.upload_sub_region(buffer, 4, &[1, 2, 3, 4]).unwrap();
        assert_eq!(backend.buffer_data(buffer), Some(&[0, 0, 0, 0, 1, 2, 3, 4][..]));

        backend.finalize_upload(buffer, UsageHint::StaticDraw).unwrap();
        assert_eq!(backend.buffer_usage_hint(buffer), Some(UsageHint::StaticDraw));
    }

    #[test]
    fn test_upload_out_of_bounds() {
        let mut backend = DummyBackend::new();
        let buffer = backend
            .create_buffer(&BufferDescriptor::new(4, BufferUsage::VERTEX))
            .unwrap();
        let err = backend.upload_sub_region(buffer, 2, &[0; 4]).unwrap_err();
        assert_eq!(
            err,
            BackendError::UploadOutOfBounds {
                offset: 2,
                len: 4,
                size: 4
            }
        );
    }

    #[test]
    fn test_memory_limit() {
        let mut backend = DummyBackend::new().with_memory_limit(16);
        let first = backend
            .create_buffer(&BufferDescriptor::new(12, BufferUsage::VERTEX))
            .unwrap();
        assert_eq!(
            backend.create_buffer(&BufferDescriptor::new(8, BufferUsage::VERTEX)),
            Err(BackendError::OutOfMemory)
        );
        backend.destroy_buffer(first);
        assert!(backend
            .create_buffer(&BufferDescriptor::new(8, BufferUsage::VERTEX))
            .is_ok());
    }

    #[test]
    fn test_draw_unknown_vertex_array_is_ignored() {
        let mut backend = DummyBackend::new();
        backend.draw_triangles(VertexArrayHandle(42), 3);
        assert_eq!(backend.draw_call_count(), 0);
    }

    #[test]
    fn test_redeclared_slot_replaces_binding() {
        let mut backend = DummyBackend::new();
        let buffer = backend
            .create_buffer(&BufferDescriptor::new(24, BufferUsage::VERTEX))
            .unwrap();
        let vao = backend.create_vertex_array().unwrap();
        let binding = AttributeBinding {
            slot: 0,
            component_count: 3,
            stride: 12,
            byte_offset: 0,
        };
        backend.declare_attribute(vao, buffer, &binding).unwrap();
        backend
            .declare_attribute(vao, buffer, &AttributeBinding { byte_offset: 12, ..binding })
            .unwrap();
        assert_eq!(backend.attribute_bindings(vao).len(), 1);
        assert_eq!(backend.attribute_bindings(vao)[0].byte_offset, 12);
    }
}
