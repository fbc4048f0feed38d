//! CPU-side mesh data structures.
//!
//! This module provides:
//! - [`PrimitiveTopology`] - How vertices are assembled into primitives
//! - [`IndexFormat`] - Index data format (u16 or u32)
//! - [`CpuMesh`] - Packed vertex and index bytes ready for upload

use glam::{Vec2, Vec3};

use super::layout::{VertexAttributeSemantic, VertexLayout};
use super::vertex::Vertex;

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point. Index data is not used.
    PointList,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
}

impl PrimitiveTopology {
    /// Get the number of vertices per primitive.
    pub fn vertices_per_primitive(&self) -> u32 {
        match self {
            Self::PointList => 1,
            Self::TriangleList => 3,
        }
    }
}

/// Index format for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers (max 65535 vertices).
    #[default]
    Uint16,
    /// 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// Get the size in bytes of each index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// A CPU-side mesh holding packed vertex bytes and optional index bytes.
///
/// Produced by [`assemble`](super::assemble) and handed by value to a
/// [`Mesh`](crate::resources::Mesh) for upload.
pub struct CpuMesh {
    layout: VertexLayout,
    topology: PrimitiveTopology,
    vertex_data: Vec<u8>,
    index_data: Option<Vec<u8>>,
    index_format: Option<IndexFormat>,
    index_count: u32,
    label: Option<String>,
}

impl CpuMesh {
    pub(crate) fn new(layout: VertexLayout, vertex_data: Vec<u8>) -> Self {
        debug_assert_eq!(vertex_data.len() as u64, layout.buffer_size());
        Self {
            layout,
            topology: PrimitiveTopology::TriangleList,
            vertex_data,
            index_data: None,
            index_format: None,
            index_count: 0,
            label: None,
        }
    }

    /// Set the primitive topology.
    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Set index data as u16 indices.
    pub fn with_indices_u16(mut self, indices: &[u16]) -> Self {
        self.index_data = Some(bytemuck::cast_slice(indices).to_vec());
        self.index_format = Some(IndexFormat::Uint16);
        self.index_count = indices.len() as u32;
        self
    }

    /// Set index data as u32 indices.
    pub fn with_indices_u32(mut self, indices: &[u32]) -> Self {
        self.index_data = Some(bytemuck::cast_slice(indices).to_vec());
        self.index_format = Some(IndexFormat::Uint32);
        self.index_count = indices.len() as u32;
        self
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the vertex layout.
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    /// Get the primitive topology.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Get the packed vertex bytes.
    pub fn vertex_data(&self) -> &[u8] {
        &self.vertex_data
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.layout.vertex_count
    }

    /// Size in bytes of the vertex buffer.
    pub fn vertex_byte_size(&self) -> u64 {
        self.vertex_data.len() as u64
    }

    /// Get the raw index data.
    pub fn index_data(&self) -> Option<&[u8]> {
        self.index_data.as_deref()
    }

    /// Get the index format.
    pub fn index_format(&self) -> Option<IndexFormat> {
        self.index_format
    }

    /// Get the number of indices.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Size in bytes of the index buffer (0 for non-indexed meshes).
    pub fn index_byte_size(&self) -> u64 {
        self.index_data.as_ref().map_or(0, |data| data.len() as u64)
    }

    /// Check if this mesh uses indexed drawing.
    pub fn is_indexed(&self) -> bool {
        self.index_data.is_some()
    }

    /// Number of elements submitted by a draw with this mesh's topology.
    pub fn draw_count(&self) -> u32 {
        match self.topology {
            PrimitiveTopology::TriangleList if self.is_indexed() => self.index_count,
            _ => self.vertex_count(),
        }
    }

    /// Number of triangles or points one draw produces.
    pub fn primitive_count(&self) -> u32 {
        self.draw_count() / self.topology.vertices_per_primitive()
    }

    /// Get the debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Rebuild vertices from the packed bytes using the declared layout.
    ///
    /// Fields that were not packed come back as zero.
    pub fn unpack(&self) -> Vec<Vertex> {
        (0..self.vertex_count() as usize)
            .map(|index| {
                let mut vertex: Vertex = bytemuck::Zeroable::zeroed();
                for attribute in &self.layout.attributes {
                    let start = attribute.element_offset(index);
                    let bytes = &self.vertex_data[start..start + attribute.format.size()];
                    match attribute.semantic {
                        VertexAttributeSemantic::Position => {
                            vertex.position = read_vec3(bytes);
                        }
                        VertexAttributeSemantic::Normal => {
                            vertex.normal = read_vec3(bytes);
                        }
                        VertexAttributeSemantic::TexCoord0 => {
                            vertex.tex_coord = Vec2::from_array(bytemuck::pod_read_unaligned(bytes));
                        }
                        VertexAttributeSemantic::Color => {
                            vertex.color = read_vec3(bytes);
                        }
                    }
                }
                vertex
            })
            .collect()
    }

    /// Decode the index bytes, widened to `u32`.
    pub fn read_indices(&self) -> Option<Vec<u32>> {
        let data = self.index_data.as_ref()?;
        let indices = match self.index_format? {
            IndexFormat::Uint16 => data
                .chunks_exact(2)
                .map(|chunk| bytemuck::pod_read_unaligned::<u16>(chunk) as u32)
                .collect(),
            IndexFormat::Uint32 => data
                .chunks_exact(4)
                .map(bytemuck::pod_read_unaligned::<u32>)
                .collect(),
        };
        Some(indices)
    }
}

fn read_vec3(bytes: &[u8]) -> Vec3 {
    Vec3::from_array(bytemuck::pod_read_unaligned(bytes))
}

impl std::fmt::Debug for CpuMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuMesh")
            .field("label", &self.label)
            .field("topology", &self.topology)
            .field("vertex_count", &self.layout.vertex_count)
            .field("packing", &self.layout.packing)
            .field("vertex_bytes", &self.vertex_data.len())
            .field("index_count", &self.index_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{AttributeSet, VertexPacking};

    #[test]
    fn test_primitive_topology_vertices() {
        assert_eq!(PrimitiveTopology::PointList.vertices_per_primitive(), 1);
        assert_eq!(PrimitiveTopology::TriangleList.vertices_per_primitive(), 3);
    }

    #[test]
    fn test_index_format_size() {
        assert_eq!(IndexFormat::Uint16.size(), 2);
        assert_eq!(IndexFormat::Uint32.size(), 4);
    }

    #[test]
    fn test_cpu_mesh_non_indexed() {
        let layout = VertexLayout::new(AttributeSet::POSITION, VertexPacking::Planar, 3);
        let mesh = CpuMesh::new(layout, vec![0u8; 36]).with_label("test");

        assert_eq!(mesh.vertex_count(), 3);
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.index_byte_size(), 0);
        assert_eq!(mesh.draw_count(), 3);
        assert_eq!(mesh.label(), Some("test"));
    }

    #[test]
    fn test_cpu_mesh_indexed() {
        let layout = VertexLayout::new(AttributeSet::POSITION, VertexPacking::Planar, 4);
        let indices: [u32; 6] = [0, 1, 2, 2, 3, 0];
        let mesh = CpuMesh::new(layout, vec![0u8; 48]).with_indices_u32(&indices);

        assert!(mesh.is_indexed());
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.index_byte_size(), 24);
        assert_eq!(mesh.draw_count(), 6);
        assert_eq!(mesh.primitive_count(), 2);
        assert_eq!(mesh.read_indices(), Some(indices.to_vec()));
    }

    #[test]
    fn test_point_list_ignores_indices() {
        let layout = VertexLayout::new(AttributeSet::POSITION, VertexPacking::Planar, 4);
        let mesh = CpuMesh::new(layout, vec![0u8; 48])
            .with_indices_u16(&[0, 1, 2, 2, 3, 0])
            .with_topology(PrimitiveTopology::PointList);

        assert_eq!(mesh.topology(), PrimitiveTopology::PointList);
        assert_eq!(mesh.draw_count(), 4);
        assert_eq!(mesh.primitive_count(), 4);
    }

    #[test]
    fn test_u16_indices_read_back() {
        let layout = VertexLayout::new(AttributeSet::POSITION, VertexPacking::Planar, 3);
        let mesh = CpuMesh::new(layout, vec![0u8; 36]).with_indices_u16(&[2, 1, 0]);
        assert_eq!(mesh.index_format(), Some(IndexFormat::Uint16));
        assert_eq!(mesh.index_byte_size(), 6);
        assert_eq!(mesh.read_indices(), Some(vec![2, 1, 0]));
    }
}
