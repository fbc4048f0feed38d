//! GPU-side handle for one uploaded shape.

use crate::backend::{
    AttributeBinding, BackendResult, BufferDescriptor, BufferHandle, BufferUsage,
    GraphicsBackend, UsageHint, VertexArrayHandle,
};
use crate::error::ShapeResult;
use crate::mesh::{assemble, CpuMesh, MeshConfig, PrimitiveTopology, ShapeBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GpuResources {
    vertex_array: VertexArrayHandle,
    vertex_buffer: BufferHandle,
    element_buffer: Option<BufferHandle>,
}

/// A packed mesh plus the backend resources it was uploaded to.
///
/// The handle starts out CPU-only. [`Mesh::initialize`] uploads it once;
/// [`Mesh::release`] frees the backend resources and consumes the handle.
#[derive(Debug)]
pub struct Mesh {
    cpu: CpuMesh,
    usage: UsageHint,
    gpu: Option<GpuResources>,
}

impl Mesh {
    pub fn new(cpu: CpuMesh) -> Self {
        Self {
            cpu,
            usage: UsageHint::StaticDraw,
            gpu: None,
        }
    }

    /// Assemble `shape` with `config` and wrap the result.
    pub fn from_shape(shape: &ShapeBuffer, config: &MeshConfig) -> ShapeResult<Self> {
        Ok(Self::new(assemble(shape, config)?).with_usage(config.usage))
    }

    /// Set the usage hint passed when uploads are finalized.
    pub fn with_usage(mut self, usage: UsageHint) -> Self {
        self.usage = usage;
        self
    }

    /// Upload vertex (and index) data and declare the attribute layout.
    ///
    /// Calling this on an initialized mesh does nothing. On failure every
    /// resource created so far is destroyed and the mesh stays CPU-only.
    pub fn initialize<B: GraphicsBackend + ?Sized>(&mut self, backend: &mut B) -> BackendResult<()> {
        if self.gpu.is_some() {
            return Ok(());
        }

        let vertex_array = backend.create_vertex_array()?;
        let mut created = Vec::new();
        match self.upload(backend, vertex_array, &mut created) {
            Ok(resources) => {
                log::debug!(
                    "Mesh '{}' uploaded to {}: {} vertex bytes, {} index bytes",
                    self.label(),
                    backend.name(),
                    self.cpu.vertex_byte_size(),
                    self.cpu.index_byte_size()
                );
                self.gpu = Some(resources);
                Ok(())
            }
            Err(err) => {
                log::error!("Mesh '{}' upload failed: {}", self.label(), err);
                for buffer in created {
                    backend.destroy_buffer(buffer);
                }
                backend.destroy_vertex_array(vertex_array);
                Err(err)
            }
        }
    }

    fn upload<B: GraphicsBackend + ?Sized>(
        &self,
        backend: &mut B,
        vertex_array: VertexArrayHandle,
        created: &mut Vec<BufferHandle>,
    ) -> BackendResult<GpuResources> {
        let vertex_buffer = self.upload_buffer(
            backend,
            self.cpu.vertex_data(),
            BufferUsage::VERTEX | BufferUsage::COPY_DST,
            created,
        )?;
        for attribute in &self.cpu.layout().attributes {
            backend.declare_attribute(vertex_array, vertex_buffer, &AttributeBinding::from(attribute))?;
        }

        let element_buffer = match (self.cpu.index_data(), self.cpu.index_format()) {
            (Some(data), Some(format)) => {
                let buffer = self.upload_buffer(
                    backend,
                    data,
                    BufferUsage::INDEX | BufferUsage::COPY_DST,
                    created,
                )?;
                backend.bind_element_buffer(vertex_array, buffer, format)?;
                Some(buffer)
            }
            _ => None,
        };

        Ok(GpuResources {
            vertex_array,
            vertex_buffer,
            element_buffer,
        })
    }

    fn upload_buffer<B: GraphicsBackend + ?Sized>(
        &self,
        backend: &mut B,
        data: &[u8],
        usage: BufferUsage,
        created: &mut Vec<BufferHandle>,
    ) -> BackendResult<BufferHandle> {
        let descriptor = BufferDescriptor::new(data.len() as u64, usage).with_label(self.label());
        let buffer = backend.create_buffer(&descriptor)?;
        created.push(buffer);
        backend.upload_sub_region(buffer, 0, data)?;
        backend.finalize_upload(buffer, self.usage)?;
        Ok(buffer)
    }

    /// Draw the mesh with its configured topology. Does nothing before
    /// [`Mesh::initialize`].
    pub fn render<B: GraphicsBackend + ?Sized>(&self, backend: &mut B) {
        if let Some(gpu) = &self.gpu {
            match self.cpu.topology() {
                PrimitiveTopology::TriangleList => {
                    backend.draw_triangles(gpu.vertex_array, self.cpu.draw_count())
                }
                PrimitiveTopology::PointList => {
                    backend.draw_points(gpu.vertex_array, self.cpu.draw_count())
                }
            }
        }
    }

    /// Draw the raw vertex stream as points. Does nothing before [`Mesh::initialize`].
    pub fn render_points<B: GraphicsBackend + ?Sized>(&self, backend: &mut B) {
        if let Some(gpu) = &self.gpu {
            backend.draw_points(gpu.vertex_array, self.cpu.vertex_count());
        }
    }

    /// Free the backend resources, consuming the handle.
    pub fn release<B: GraphicsBackend + ?Sized>(mut self, backend: &mut B) {
        if let Some(gpu) = self.gpu.take() {
            if let Some(element_buffer) = gpu.element_buffer {
                backend.destroy_buffer(element_buffer);
            }
            backend.destroy_buffer(gpu.vertex_buffer);
            backend.destroy_vertex_array(gpu.vertex_array);
            log::debug!("Mesh '{}' released", self.label());
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn vertex_array(&self) -> Option<VertexArrayHandle> {
        self.gpu.map(|gpu| gpu.vertex_array)
    }

    pub fn vertex_buffer(&self) -> Option<BufferHandle> {
        self.gpu.map(|gpu| gpu.vertex_buffer)
    }

    pub fn element_buffer(&self) -> Option<BufferHandle> {
        self.gpu.and_then(|gpu| gpu.element_buffer)
    }

    pub fn vertex_count(&self) -> u32 {
        self.cpu.vertex_count()
    }

    pub fn index_count(&self) -> u32 {
        self.cpu.index_count()
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.cpu.topology()
    }

    pub fn usage(&self) -> UsageHint {
        self.usage
    }

    pub fn cpu_mesh(&self) -> &CpuMesh {
        &self.cpu
    }

    pub fn label(&self) -> &str {
        self.cpu.label().unwrap_or("unnamed")
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        if self.gpu.is_some() {
            log::warn!(
                "Mesh '{}' dropped without release; backend resources leaked",
                self.label()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, BackendError, DummyBackend};
    use crate::mesh::IndexFormat;
    use crate::shapes::{Cube, Cylinder};

    fn cube_mesh() -> Mesh {
        let cube = Cube::new(1.0, 1.0, 1.0).unwrap().generate();
        Mesh::from_shape(&cube, &MeshConfig::default()).unwrap()
    }

    #[test]
    fn test_initialize_uploads_vertices() {
        let mut backend = DummyBackend::new();
        let mut mesh = cube_mesh();
        mesh.initialize(&mut backend).unwrap();

        assert!(mesh.is_initialized());
        assert!(mesh.element_buffer().is_none());
        let vertex_buffer = mesh.vertex_buffer().unwrap();
        assert_eq!(backend.buffer_data(vertex_buffer), Some(mesh.cpu_mesh().vertex_data()));
        assert_eq!(backend.buffer_usage_hint(vertex_buffer), Some(UsageHint::StaticDraw));

        let bindings = backend.attribute_bindings(mesh.vertex_array().unwrap());
        let slots: Vec<u32> = bindings.iter().map(|b| b.slot).collect();
        assert_eq!(slots, vec![0, 2, 1]);
        mesh.release(&mut backend);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut backend = DummyBackend::new();
        let mut mesh = cube_mesh();
        mesh.initialize(&mut backend).unwrap();
        let first = (mesh.vertex_array(), mesh.vertex_buffer());
        let calls = backend.calls().len();

        mesh.initialize(&mut backend).unwrap();
        assert_eq!((mesh.vertex_array(), mesh.vertex_buffer()), first);
        assert_eq!(backend.calls().len(), calls);
        mesh.release(&mut backend);
    }

    #[test]
    fn test_indexed_mesh_binds_element_buffer() {
        let mut backend = DummyBackend::new();
        let cylinder = Cylinder::new(4, 1.0).unwrap().generate();
        let mut mesh = Mesh::from_shape(&cylinder, &MeshConfig::default()).unwrap();
        mesh.initialize(&mut backend).unwrap();

        let vertex_array = mesh.vertex_array().unwrap();
        let element_buffer = mesh.element_buffer().unwrap();
        assert_eq!(
            backend.element_buffer(vertex_array),
            Some((element_buffer, IndexFormat::Uint16))
        );

        backend.clear_calls();
        mesh.render(&mut backend);
        assert_eq!(
            backend.calls(),
            &[BackendCall::DrawTriangles {
                vertex_array,
                count: 48,
                indexed: true
            }]
        );
        mesh.release(&mut backend);
    }

    #[test]
    fn test_render_before_initialize_is_noop() {
        let mut backend = DummyBackend::new();
        let mesh = cube_mesh();
        mesh.render(&mut backend);
        mesh.render_points(&mut backend);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_render_points_uses_vertex_count() {
        let mut backend = DummyBackend::new();
        let mut mesh = cube_mesh();
        mesh.initialize(&mut backend).unwrap();
        backend.clear_calls();

        mesh.render_points(&mut backend);
        assert_eq!(
            backend.calls(),
            &[BackendCall::DrawPoints {
                vertex_array: mesh.vertex_array().unwrap(),
                count: 36
            }]
        );
        mesh.release(&mut backend);
    }

    #[test]
    fn test_render_follows_point_topology() {
        let mut backend = DummyBackend::new();
        let cylinder = Cylinder::new(4, 1.0).unwrap().generate();
        let config = MeshConfig::default().with_topology(PrimitiveTopology::PointList);
        let mut mesh = Mesh::from_shape(&cylinder, &config).unwrap();
        assert_eq!(mesh.topology(), PrimitiveTopology::PointList);
        mesh.initialize(&mut backend).unwrap();
        backend.clear_calls();

        mesh.render(&mut backend);
        assert_eq!(
            backend.calls(),
            &[BackendCall::DrawPoints {
                vertex_array: mesh.vertex_array().unwrap(),
                count: 10
            }]
        );
        mesh.release(&mut backend);
    }

    #[test]
    fn test_release_frees_everything() {
        let mut backend = DummyBackend::new();
        let cylinder = Cylinder::new(8, 1.0).unwrap().generate();
        let mut mesh = Mesh::from_shape(&cylinder, &MeshConfig::default()).unwrap();
        mesh.initialize(&mut backend).unwrap();
        assert_eq!(backend.live_buffer_count(), 2);
        assert_eq!(backend.live_vertex_array_count(), 1);

        mesh.release(&mut backend);
        assert_eq!(backend.live_buffer_count(), 0);
        assert_eq!(backend.live_vertex_array_count(), 0);
    }

    #[test]
    fn test_failed_upload_cleans_up() {
        let mut backend = DummyBackend::new().with_memory_limit(64);
        let mut mesh = cube_mesh();
        assert_eq!(mesh.initialize(&mut backend), Err(BackendError::OutOfMemory));
        assert!(!mesh.is_initialized());
        assert_eq!(backend.live_buffer_count(), 0);
        assert_eq!(backend.live_vertex_array_count(), 0);
    }

    #[test]
    fn test_usage_hint_from_config() {
        let mut backend = DummyBackend::new();
        let cube = Cube::new(1.0, 1.0, 1.0).unwrap().generate();
        let config = MeshConfig::default().with_usage(UsageHint::DynamicDraw);
        let mut mesh = Mesh::from_shape(&cube, &config).unwrap();
        mesh.initialize(&mut backend).unwrap();
        assert_eq!(
            backend.buffer_usage_hint(mesh.vertex_buffer().unwrap()),
            Some(UsageHint::DynamicDraw)
        );
        mesh.release(&mut backend);
    }
}
