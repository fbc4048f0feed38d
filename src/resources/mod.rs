//! Resource management
//!
//! Handles upload and release of generated meshes.

mod mesh;

pub use mesh::*;
