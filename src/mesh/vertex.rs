//! Vertex record produced by the shape generators.
//!
//! Every generator fills all four fields of [`Vertex`]. Which of them end up
//! in the GPU buffer is decided later by an [`AttributeSet`] during buffer
//! assembly, so a shape can be uploaded positions-only without regenerating it.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// A single generated vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
    pub color: Vec3,
}

impl Vertex {
    /// Create a vertex with a white color.
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coord,
            color: Vec3::ONE,
        }
    }

    /// Set the vertex color.
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }
}

/// Set of vertex attributes selected for upload.
///
/// Mirrors the `with_positions` / `with_texture_coordinates` / `with_normals`
/// switches shapes are constructed with, plus an optional color stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeSet(u32);

impl AttributeSet {
    pub const NONE: Self = Self(0);
    pub const POSITION: Self = Self(1 << 0);
    pub const TEX_COORD: Self = Self(1 << 1);
    pub const NORMAL: Self = Self(1 << 2);
    pub const COLOR: Self = Self(1 << 3);
    /// Position, texture coordinate and normal: the default textured/lit set.
    pub const STANDARD: Self = Self((1 << 0) | (1 << 1) | (1 << 2));
    pub const ALL: Self = Self(0xF);

    /// Build a set from the three per-shape constructor flags.
    pub fn from_flags(with_positions: bool, with_tex_coords: bool, with_normals: bool) -> Self {
        let mut set = Self::NONE;
        if with_positions {
            set = set | Self::POSITION;
        }
        if with_tex_coords {
            set = set | Self::TEX_COORD;
        }
        if with_normals {
            set = set | Self::NORMAL;
        }
        set
    }

    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Size in bytes of one vertex when only the selected fields are packed.
    pub fn vertex_size(&self) -> usize {
        let mut size = 0;
        if self.contains(Self::POSITION) {
            size += 12;
        }
        if self.contains(Self::TEX_COORD) {
            size += 8;
        }
        if self.contains(Self::NORMAL) {
            size += 12;
        }
        if self.contains(Self::COLOR) {
            size += 12;
        }
        size
    }
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl std::ops::BitOr for AttributeSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}
