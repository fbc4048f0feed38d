//! Backend abstraction layer
//!
//! Provides the [`GraphicsBackend`] trait mesh handles upload and draw through,
//! plus the implementations shipped with the crate:
//!
//! - [`DummyBackend`]: in-memory backend that records calls (always available)
//! - `WgpuBackend`: wgpu-based backend (`wgpu-backend` feature)

pub mod dummy;
pub mod traits;
pub mod types;

#[cfg(feature = "wgpu-backend")]
pub mod wgpu_backend;

pub use dummy::{BackendCall, DummyBackend};
pub use traits::*;
pub use types::*;

#[cfg(feature = "wgpu-backend")]
pub use wgpu_backend::WgpuBackend;
