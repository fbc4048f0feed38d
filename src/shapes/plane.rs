//! Subdivided ground plane.

use glam::{Vec2, Vec3};

use crate::error::{at_least, positive, within_index_range, ShapeResult};
use crate::mesh::{Indices, ShapeBuffer, Vertex};

/// A flat grid on the XZ plane at `y = 0`, facing +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    width: f32,
    depth: f32,
    subdivisions: u32,
}

impl Plane {
    pub fn new(width: f32, depth: f32, subdivisions: u32) -> ShapeResult<Self> {
        let width = positive("plane", "width", width)?;
        let depth = positive("plane", "depth", depth)?;
        let subdivisions = at_least("plane", "subdivisions", 1, subdivisions)?;

        let s = subdivisions as u64;
        within_index_range("plane", (s + 1) * (s + 1), 6 * s * s)?;

        Ok(Self {
            width,
            depth,
            subdivisions,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    /// Grid of `(s + 1)²` vertices and `2s²` triangles.
    ///
    /// Rows run from `z = -depth / 2` to `z = +depth / 2`, columns from
    /// `x = -width / 2` to `x = +width / 2`.
    pub fn generate(&self) -> ShapeBuffer {
        let s = self.subdivisions;
        let columns = s + 1;
        let origin = Vec3::new(-self.width * 0.5, 0.0, -self.depth * 0.5);
        let cell = Vec3::new(self.width / s as f32, 0.0, self.depth / s as f32);

        let mut vertices = Vec::with_capacity((columns * columns) as usize);
        for row in 0..=s {
            for column in 0..=s {
                let position = origin + cell * Vec3::new(column as f32, 0.0, row as f32);
                let uv = Vec2::new(column as f32 / s as f32, 1.0 - row as f32 / s as f32);
                vertices.push(Vertex::new(position, Vec3::Y, uv).with_color(Vec3::ONE));
            }
        }

        let mut indices = Vec::with_capacity((6 * s * s) as usize);
        for row in 0..s {
            for column in 0..s {
                let top_left = row * columns + column;
                let bottom_left = top_left + columns;
                let bottom_right = bottom_left + 1;
                let top_right = top_left + 1;
                indices.extend_from_slice(&[top_left, bottom_left, bottom_right]);
                indices.extend_from_slice(&[top_left, bottom_right, top_right]);
            }
        }

        log::debug!(
            "Generated plane {}x{} with {} subdivisions: {} vertices, {} indices",
            self.width,
            self.depth,
            s,
            vertices.len(),
            indices.len()
        );
        let indices = Indices::fit(vertices.len(), indices);
        ShapeBuffer::indexed("plane", vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShapeError;

    #[test]
    fn test_plane_counts() {
        for s in [1, 4, 10] {
            let plane = Plane::new(2.0, 3.0, s).unwrap().generate();
            let n = s as usize;
            assert_eq!(plane.vertex_count(), (n + 1) * (n + 1));
            assert_eq!(plane.triangle_count(), 2 * n * n);
            assert!(plane.indices_in_range());
            assert!(matches!(plane.indices(), Some(Indices::U16(_))));
        }
    }

    #[test]
    fn test_plane_extent() {
        let plane = Plane::new(4.0, 2.0, 2).unwrap().generate();
        let vertices = plane.vertices();
        assert_eq!(vertices[0].position, Vec3::new(-2.0, 0.0, -1.0));
        assert_eq!(vertices[8].position, Vec3::new(2.0, 0.0, 1.0));
        assert!(vertices.iter().all(|v| v.position.y == 0.0 && v.normal == Vec3::Y));
    }

    #[test]
    fn test_plane_faces_up() {
        let plane = Plane::new(1.0, 1.0, 3).unwrap().generate();
        let vertices = plane.vertices();
        for [a, b, c] in plane.triangles() {
            let (a, b, c) = (
                vertices[a as usize].position,
                vertices[b as usize].position,
                vertices[c as usize].position,
            );
            let face_normal = (b - a).cross(c - a);
            assert!(face_normal.y > 0.0);
            assert!(face_normal.x.abs() < 1e-6 && face_normal.z.abs() < 1e-6);
        }
    }

    #[test]
    fn test_invalid_plane() {
        assert!(Plane::new(1.0, 1.0, 0).is_err());
        assert!(Plane::new(0.0, 1.0, 1).is_err());
    }

    #[test]
    fn test_plane_subdivisions_bounded_by_index_range() {
        assert!(matches!(
            Plane::new(1.0, 1.0, 65536),
            Err(ShapeError::TooManySegments { shape: "plane", .. })
        ));
        // 6 * 26754² is the last index count that fits in u32
        assert!(Plane::new(1.0, 1.0, 26754).is_ok());
        assert!(Plane::new(1.0, 1.0, 26755).is_err());
    }
}
