//! Structured output of a shape generator.

use super::vertex::Vertex;

/// Triangle index stream of a generated shape.
#[derive(Debug, PartialEq, Eq)]
pub enum Indices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Indices {
    /// Narrow to 16-bit indices when every vertex is addressable with them.
    pub fn fit(vertex_count: usize, indices: Vec<u32>) -> Self {
        if vertex_count <= u16::MAX as usize + 1 {
            Self::U16(indices.into_iter().map(|i| i as u16).collect())
        } else {
            Self::U32(indices)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U16(indices) => indices.len(),
            Self::U32(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the index at `position` widened to `u32`.
    pub fn get(&self, position: usize) -> Option<u32> {
        match self {
            Self::U16(indices) => indices.get(position).map(|&i| i as u32),
            Self::U32(indices) => indices.get(position).copied(),
        }
    }

    /// Iterate over all indices widened to `u32`.
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            Self::U16(indices) => Box::new(indices.iter().map(|&i| i as u32)),
            Self::U32(indices) => Box::new(indices.iter().copied()),
        }
    }

    /// Largest index, if any.
    pub fn max(&self) -> Option<u32> {
        self.iter().max()
    }
}

/// Vertices and optional indices produced by one generator call.
///
/// Intentionally not `Clone`: a buffer is moved into assembly and then into
/// a mesh handle rather than copied around.
#[derive(Debug, PartialEq)]
pub struct ShapeBuffer {
    vertices: Vec<Vertex>,
    indices: Option<Indices>,
    label: &'static str,
}

impl ShapeBuffer {
    /// A non-indexed triangle list.
    pub fn non_indexed(label: &'static str, vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            indices: None,
            label,
        }
    }

    /// An indexed triangle list. Generators only emit indices below
    /// `vertices.len()`.
    pub(crate) fn indexed(label: &'static str, vertices: Vec<Vertex>, indices: Indices) -> Self {
        debug_assert!(
            indices.max().map_or(true, |max| (max as usize) < vertices.len()),
            "{label}: index out of range"
        );
        Self {
            vertices,
            indices: Some(indices),
            label,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> Option<&Indices> {
        self.indices.as_ref()
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of index entries (0 for non-indexed buffers).
    pub fn index_count(&self) -> usize {
        self.indices.as_ref().map_or(0, Indices::len)
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Number of triangles described by this buffer.
    pub fn triangle_count(&self) -> usize {
        if self.is_indexed() {
            self.index_count() / 3
        } else {
            self.vertex_count() / 3
        }
    }

    /// Iterate over triangles as vertex-index triples.
    ///
    /// Non-indexed buffers yield consecutive triples `0,1,2`, `3,4,5`, ...
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| {
            let base = t * 3;
            match &self.indices {
                Some(indices) => [
                    indices.get(base).unwrap_or_default(),
                    indices.get(base + 1).unwrap_or_default(),
                    indices.get(base + 2).unwrap_or_default(),
                ],
                None => [base as u32, base as u32 + 1, base as u32 + 2],
            }
        })
    }

    /// Check that every index refers to an existing vertex.
    pub fn indices_in_range(&self) -> bool {
        match &self.indices {
            Some(indices) => indices.iter().all(|i| (i as usize) < self.vertices.len()),
            None => true,
        }
    }
}
