//! Common types shared between backends

use crate::mesh::VertexAttribute;

/// Buffer usage flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferUsage(u32);

impl BufferUsage {
    pub const COPY_DST: Self = Self(1 << 0);
    pub const INDEX: Self = Self(1 << 1);
    pub const VERTEX: Self = Self(1 << 2);

    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for BufferUsage {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// How often uploaded data is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UsageHint {
    /// Uploaded once, drawn many times.
    #[default]
    StaticDraw,
    /// Updated occasionally.
    DynamicDraw,
    /// Updated every frame.
    StreamDraw,
}

/// Buffer descriptor
#[derive(Debug, Clone)]
pub struct BufferDescriptor {
    pub label: Option<String>,
    pub size: u64,
    pub usage: BufferUsage,
}

impl BufferDescriptor {
    pub fn new(size: u64, usage: BufferUsage) -> Self {
        Self {
            label: None,
            size,
            usage,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// One attribute pointer declared on a vertex array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeBinding {
    /// Shader input location.
    pub slot: u32,
    /// Number of float components.
    pub component_count: u32,
    /// Byte distance between consecutive elements.
    pub stride: u32,
    /// Byte offset of the first element in the vertex buffer.
    pub byte_offset: u64,
}

impl From<&VertexAttribute> for AttributeBinding {
    fn from(attribute: &VertexAttribute) -> Self {
        Self {
            slot: attribute.location(),
            component_count: attribute.format.component_count(),
            stride: attribute.stride,
            byte_offset: attribute.offset,
        }
    }
}
