//! Per-mesh assembly and upload configuration.

use crate::backend::UsageHint;

use super::data::PrimitiveTopology;
use super::layout::VertexPacking;
use super::vertex::AttributeSet;

/// Configuration for turning a generated shape into an uploadable mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshConfig {
    /// Attributes packed into the vertex buffer.
    pub attributes: AttributeSet,
    /// Arrangement of the packed attributes.
    pub packing: VertexPacking,
    /// How [`Mesh::render`](crate::resources::Mesh::render) draws the mesh.
    pub topology: PrimitiveTopology,
    /// Usage hint passed when the upload is finalized.
    pub usage: UsageHint,
    /// Debug label; defaults to the shape name.
    pub label: Option<String>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            attributes: AttributeSet::STANDARD,
            packing: VertexPacking::Planar,
            topology: PrimitiveTopology::TriangleList,
            usage: UsageHint::StaticDraw,
            label: None,
        }
    }
}

impl MeshConfig {
    /// Configuration from `(with_positions, with_texture_coordinates, with_normals)`
    /// switches.
    pub fn from_flags(with_positions: bool, with_tex_coords: bool, with_normals: bool) -> Self {
        Self {
            attributes: AttributeSet::from_flags(with_positions, with_tex_coords, with_normals),
            ..Default::default()
        }
    }

    /// Positions only.
    pub fn positions_only() -> Self {
        Self::from_flags(true, false, false)
    }

    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_packing(mut self, packing: VertexPacking) -> Self {
        self.packing = packing;
        self
    }

    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_usage(mut self, usage: UsageHint) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
