//! Common utilities for mesh pipeline tests.

use static_meshes::{
    DummyBackend, GraphicsBackend, Mesh, MeshConfig, ShapeBuffer,
};

// ============================================================================
// Backend Enumeration
// ============================================================================

/// Available backends for testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Dummy backend (no actual GPU operations).
    Dummy,
    /// wgpu backend on a headless adapter.
    WebGpu,
}

/// Test context owning one backend instance.
pub struct TestContext {
    pub backend: Box<dyn GraphicsBackend>,
}

impl TestContext {
    /// Create a context, or `None` when the backend is unavailable here.
    pub fn new(backend: Backend) -> Option<Self> {
        let _ = env_logger::builder().is_test(true).try_init();

        let backend: Box<dyn GraphicsBackend> = match backend {
            Backend::Dummy => Box::new(DummyBackend::new()),
            Backend::WebGpu => create_wgpu_backend()?,
        };
        Some(Self { backend })
    }

    /// Assemble `shape`, upload it and return the initialized handle.
    pub fn upload(&mut self, shape: &ShapeBuffer, config: &MeshConfig) -> Mesh {
        let mut mesh = Mesh::from_shape(shape, config).expect("assembly failed");
        mesh.initialize(self.backend.as_mut())
            .expect("upload failed");
        mesh
    }
}

#[cfg(feature = "wgpu-backend")]
fn create_wgpu_backend() -> Option<Box<dyn GraphicsBackend>> {
    match static_meshes::WgpuBackend::new_headless() {
        Ok(backend) => Some(Box::new(backend)),
        Err(err) => {
            eprintln!("wgpu backend unavailable: {err}");
            None
        }
    }
}

#[cfg(not(feature = "wgpu-backend"))]
fn create_wgpu_backend() -> Option<Box<dyn GraphicsBackend>> {
    None
}

/// Signed volume of a closed triangle mesh; positive when wound outward.
pub fn signed_volume(shape: &ShapeBuffer) -> f32 {
    let vertices = shape.vertices();
    shape
        .triangles()
        .map(|[a, b, c]| {
            let (a, b, c) = (
                vertices[a as usize].position,
                vertices[b as usize].position,
                vertices[c as usize].position,
            );
            a.dot(b.cross(c)) / 6.0
        })
        .sum()
}
