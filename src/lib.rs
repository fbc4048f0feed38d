//! Static Meshes - procedural primitives ready for GPU upload
//!
//! The crate generates cubes, cylinders, pyramids, spheres and planes as
//! vertex/index buffers and uploads them through a small backend trait.
//!
//! # Pipeline
//! - [`shapes`]: validated parameters → [`ShapeBuffer`]
//! - [`mesh::assemble`]: selected attributes packed planar or interleaved → [`CpuMesh`]
//! - [`Mesh`]: uploads a [`CpuMesh`] through a [`GraphicsBackend`] and issues draws
//!
//! # Backends
//! - **Dummy**: in-memory, records every call (tests, headless tools)
//! - **wgpu**: real GPU buffers, behind the `wgpu-backend` feature

pub mod backend;
pub mod error;
pub mod mesh;
pub mod resources;
pub mod shapes;

pub use backend::{BackendError, BackendResult, DummyBackend, GraphicsBackend};
pub use error::{ShapeError, ShapeResult};
pub use mesh::{assemble, AttributeSet, CpuMesh, MeshConfig, ShapeBuffer, Vertex, VertexPacking};
pub use resources::Mesh;
pub use shapes::{Cube, Cylinder, Plane, Pyramid, Shape, Sphere};

#[cfg(feature = "wgpu-backend")]
pub use backend::WgpuBackend;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the crate version and enabled backends.
///
/// Does not install a logger; binaries pick their own (`env_logger` on native).
pub fn init() {
    log::info!("static-meshes {}", VERSION);
    #[cfg(feature = "wgpu-backend")]
    log::info!("wgpu backend enabled");
}
