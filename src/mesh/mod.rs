//! Mesh data: generated vertices, attribute layouts and packed CPU buffers.
//!
//! This module provides:
//! - [`Vertex`] and [`AttributeSet`] - The generated vertex record and field selection
//! - [`VertexLayout`] - Planar or interleaved attribute placement
//! - [`ShapeBuffer`] - Generator output
//! - [`CpuMesh`] - Packed bytes produced by [`assemble`]

mod assembly;
mod config;
mod data;
mod layout;
mod shape_buffer;
mod vertex;

pub use assembly::assemble;
pub use config::MeshConfig;
pub use data::{CpuMesh, IndexFormat, PrimitiveTopology};
pub use layout::{
    VertexAttribute, VertexAttributeFormat, VertexAttributeSemantic, VertexLayout, VertexPacking,
};
pub use shape_buffer::{Indices, ShapeBuffer};
pub use vertex::{AttributeSet, Vertex};
