//! Packing generated vertices into upload-ready bytes.

use crate::error::{ShapeError, ShapeResult};

use super::config::MeshConfig;
use super::data::CpuMesh;
use super::layout::{VertexAttributeSemantic, VertexLayout, VertexPacking};
use super::shape_buffer::{Indices, ShapeBuffer};
use super::vertex::Vertex;

/// Pack the attributes selected by `config` into a [`CpuMesh`].
///
/// Fields are written in the fixed order positions, texture coordinates,
/// normals, colors. Unselected fields take no space in the output.
pub fn assemble(shape: &ShapeBuffer, config: &MeshConfig) -> ShapeResult<CpuMesh> {
    if config.attributes.is_empty() {
        return Err(ShapeError::EmptyAttributeSet);
    }

    let vertices = shape.vertices();
    let label = config
        .label
        .clone()
        .unwrap_or_else(|| shape.label().to_string());
    let layout = VertexLayout::new(config.attributes, config.packing, vertices.len() as u32)
        .with_label(label.clone());
    let vertex_data = pack_vertices(vertices, &layout);

    log::debug!(
        "Assembled '{}': {} vertices, {} bytes ({:?}), {} indices",
        label,
        vertices.len(),
        vertex_data.len(),
        config.packing,
        shape.index_count()
    );

    let mesh = CpuMesh::new(layout, vertex_data)
        .with_topology(config.topology)
        .with_label(label);
    Ok(match shape.indices() {
        Some(Indices::U16(indices)) => mesh.with_indices_u16(indices),
        Some(Indices::U32(indices)) => mesh.with_indices_u32(indices),
        None => mesh,
    })
}

fn pack_vertices(vertices: &[Vertex], layout: &VertexLayout) -> Vec<u8> {
    let mut data = Vec::with_capacity(layout.buffer_size() as usize);
    match layout.packing {
        VertexPacking::Planar => {
            for attribute in &layout.attributes {
                for vertex in vertices {
                    data.extend_from_slice(field_bytes(vertex, attribute.semantic));
                }
            }
        }
        VertexPacking::Interleaved => {
            for vertex in vertices {
                for attribute in &layout.attributes {
                    data.extend_from_slice(field_bytes(vertex, attribute.semantic));
                }
            }
        }
    }
    data
}

fn field_bytes(vertex: &Vertex, semantic: VertexAttributeSemantic) -> &[u8] {
    match semantic {
        VertexAttributeSemantic::Position => bytemuck::bytes_of(&vertex.position),
        VertexAttributeSemantic::TexCoord0 => bytemuck::bytes_of(&vertex.tex_coord),
        VertexAttributeSemantic::Normal => bytemuck::bytes_of(&vertex.normal),
        VertexAttributeSemantic::Color => bytemuck::bytes_of(&vertex.color),
    }
}
