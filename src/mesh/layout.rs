//! Vertex layout definitions for assembled meshes.
//!
//! A [`VertexLayout`] describes where each selected attribute lives inside the
//! single vertex buffer produced by buffer assembly. Attributes are always
//! stored in the same field order (position, texture coordinate, normal,
//! color) and bound to fixed shader locations:
//!
//! | Semantic  | Location | Format  |
//! |-----------|----------|---------|
//! | Position  | 0        | Float3  |
//! | Normal    | 1        | Float3  |
//! | TexCoord0 | 2        | Float2  |
//! | Color     | 3        | Float3  |
//!
//! Two packings are supported:
//!
//! - **Planar**: each attribute stream is stored whole, one after another.
//!   Stride equals the attribute size and the offset of a stream is the
//!   vertex count times the sizes of the streams before it.
//! - **Interleaved**: one record per vertex. Stride is the sum of the
//!   selected attribute sizes and offsets are relative to the record.
//!
//! Omitted attributes take no space in either packing.

use super::vertex::AttributeSet;

/// Semantic meaning of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeSemantic {
    Position,
    Normal,
    TexCoord0,
    Color,
}

impl VertexAttributeSemantic {
    /// Shader input location this semantic is bound to.
    pub fn location(&self) -> u32 {
        match self {
            Self::Position => 0,
            Self::Normal => 1,
            Self::TexCoord0 => 2,
            Self::Color => 3,
        }
    }

    /// Data format of this semantic.
    pub fn format(&self) -> VertexAttributeFormat {
        match self {
            Self::TexCoord0 => VertexAttributeFormat::Float2,
            Self::Position | Self::Normal | Self::Color => VertexAttributeFormat::Float3,
        }
    }

    /// Attribute set flag corresponding to this semantic.
    pub fn flag(&self) -> AttributeSet {
        match self {
            Self::Position => AttributeSet::POSITION,
            Self::Normal => AttributeSet::NORMAL,
            Self::TexCoord0 => AttributeSet::TEX_COORD,
            Self::Color => AttributeSet::COLOR,
        }
    }

    /// Semantics in buffer field order.
    pub const PACKING_ORDER: [Self; 4] = [
        Self::Position,
        Self::TexCoord0,
        Self::Normal,
        Self::Color,
    ];
}

/// Format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
}

impl VertexAttributeFormat {
    /// Get the size in bytes of this format.
    pub fn size(&self) -> usize {
        self.component_count() as usize * 4
    }

    /// Number of float components.
    pub fn component_count(&self) -> u32 {
        match self {
            Self::Float2 => 2,
            Self::Float3 => 3,
        }
    }
}

/// How attribute streams are arranged in the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexPacking {
    /// Whole streams one after another.
    #[default]
    Planar,
    /// One record per vertex.
    Interleaved,
}

/// A single vertex attribute description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    pub semantic: VertexAttributeSemantic,
    pub format: VertexAttributeFormat,
    /// Byte offset of the first element within the vertex buffer.
    pub offset: u64,
    /// Byte distance between consecutive elements.
    pub stride: u32,
}

impl VertexAttribute {
    /// Shader location of this attribute.
    pub fn location(&self) -> u32 {
        self.semantic.location()
    }

    /// Byte offset of the element belonging to `vertex`.
    pub fn element_offset(&self, vertex: usize) -> usize {
        self.offset as usize + vertex * self.stride as usize
    }
}

/// Describes where the attributes of one vertex buffer live.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    pub attributes: Vec<VertexAttribute>,
    pub packing: VertexPacking,
    pub vertex_count: u32,
    /// Optional label for debugging.
    pub label: Option<String>,
}

impl VertexLayout {
    /// Compute the layout for `vertex_count` vertices with the given attributes.
    pub fn new(attributes: AttributeSet, packing: VertexPacking, vertex_count: u32) -> Self {
        let record_size = attributes.vertex_size() as u32;
        let mut layout_attributes = Vec::new();
        let mut running: u64 = 0;

        for semantic in VertexAttributeSemantic::PACKING_ORDER {
            if !attributes.contains(semantic.flag()) {
                continue;
            }
            let format = semantic.format();
            let attribute = match packing {
                VertexPacking::Planar => VertexAttribute {
                    semantic,
                    format,
                    offset: running * vertex_count as u64,
                    stride: format.size() as u32,
                },
                VertexPacking::Interleaved => VertexAttribute {
                    semantic,
                    format,
                    offset: running,
                    stride: record_size,
                },
            };
            running += format.size() as u64;
            layout_attributes.push(attribute);
        }

        Self {
            attributes: layout_attributes,
            packing,
            vertex_count,
            label: None,
        }
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Size in bytes of all selected fields of one vertex.
    pub fn vertex_size(&self) -> usize {
        self.attributes.iter().map(|a| a.format.size()).sum()
    }

    /// Total byte size of the vertex buffer this layout describes.
    pub fn buffer_size(&self) -> u64 {
        self.vertex_size() as u64 * self.vertex_count as u64
    }

    /// Check if this layout has a specific semantic.
    pub fn has_semantic(&self, semantic: VertexAttributeSemantic) -> bool {
        self.attributes.iter().any(|attr| attr.semantic == semantic)
    }

    /// Get an attribute by semantic.
    pub fn get_attribute(&self, semantic: VertexAttributeSemantic) -> Option<&VertexAttribute> {
        self.attributes
            .iter()
            .find(|attr| attr.semantic == semantic)
    }

    /// Attribute set this layout was built from.
    pub fn attribute_set(&self) -> AttributeSet {
        self.attributes
            .iter()
            .fold(AttributeSet::NONE, |set, attr| set | attr.semantic.flag())
    }
}
