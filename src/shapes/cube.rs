//! Axis-aligned box centered at the origin.

use glam::{Vec2, Vec3};

use crate::error::{positive, ShapeResult};
use crate::mesh::{Indices, ShapeBuffer, Vertex};

/// Corner signs of each face, listed top-left, bottom-left, bottom-right,
/// top-right as seen from outside the box.
const FACES: [(Vec3, [[f32; 3]; 4]); 6] = [
    // Front
    (
        Vec3::Z,
        [[-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0]],
    ),
    // Right
    (
        Vec3::X,
        [[1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0]],
    ),
    // Rear
    (
        Vec3::NEG_Z,
        [[1.0, 1.0, -1.0], [1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0]],
    ),
    // Left
    (
        Vec3::NEG_X,
        [[-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0]],
    ),
    // Top
    (
        Vec3::Y,
        [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]],
    ),
    // Bottom
    (
        Vec3::NEG_Y,
        [[-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0]],
    ),
];

/// Corners of the two triangles of a face, sharing the top-left/bottom-right diagonal.
const FACE_TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

const FACE_UVS: [Vec2; 6] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
];

/// A box with the given height (Y), width (X) and depth (Z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    height: f32,
    width: f32,
    depth: f32,
}

impl Cube {
    pub fn new(height: f32, width: f32, depth: f32) -> ShapeResult<Self> {
        Ok(Self {
            height: positive("cube", "height", height)?,
            width: positive("cube", "width", width)?,
            depth: positive("cube", "depth", depth)?,
        })
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    fn half_extents(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth) * 0.5
    }

    /// Flat-shaded box: 36 vertices, 6 per face, no indices.
    pub fn generate(&self) -> ShapeBuffer {
        let half = self.half_extents();
        let mut vertices = Vec::with_capacity(36);

        for (normal, corners) in FACES {
            for (corner, uv) in FACE_TRIANGLES.iter().zip(FACE_UVS) {
                let signs = Vec3::from_array(corners[*corner]);
                vertices.push(Vertex::new(signs * half, normal, uv).with_color(corner_color(signs)));
            }
        }

        log::debug!(
            "Generated cube {}x{}x{}: {} vertices",
            self.width,
            self.height,
            self.depth,
            vertices.len()
        );
        ShapeBuffer::non_indexed("cube", vertices)
    }

    /// Smooth box: 8 shared corners and 36 indices.
    pub fn generate_indexed(&self) -> ShapeBuffer {
        let half = self.half_extents();

        let vertices: Vec<Vertex> = (0..8u16)
            .map(|index| {
                let signs = Vec3::new(
                    if index & 1 != 0 { 1.0 } else { -1.0 },
                    if index & 2 != 0 { 1.0 } else { -1.0 },
                    if index & 4 != 0 { 1.0 } else { -1.0 },
                );
                let uv = Vec2::new((signs.x + 1.0) * 0.5, (signs.y + 1.0) * 0.5);
                Vertex::new(signs * half, signs.normalize(), uv).with_color(corner_color(signs))
            })
            .collect();

        let mut indices = Vec::with_capacity(36);
        for (_, corners) in FACES {
            for corner in FACE_TRIANGLES {
                indices.push(corner_index(corners[corner]));
            }
        }

        log::debug!(
            "Generated indexed cube {}x{}x{}: {} vertices, {} indices",
            self.width,
            self.height,
            self.depth,
            vertices.len(),
            indices.len()
        );
        ShapeBuffer::indexed("cube", vertices, Indices::U16(indices))
    }
}

fn corner_index(signs: [f32; 3]) -> u16 {
    signs
        .iter()
        .enumerate()
        .filter(|(_, sign)| **sign > 0.0)
        .fold(0, |index, (axis, _)| index | (1u16 << axis))
}

fn corner_color(signs: Vec3) -> Vec3 {
    (signs + Vec3::ONE) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShapeError;

    #[test]
    fn test_cube_vertex_count() {
        let cube = Cube::new(1.0, 2.0, 3.0).unwrap().generate();
        assert_eq!(cube.vertex_count(), 36);
        assert!(!cube.is_indexed());
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_cube_positions_at_half_extents() {
        let cube = Cube::new(2.0, 4.0, 6.0).unwrap().generate();
        for vertex in cube.vertices() {
            assert_eq!(vertex.position.x.abs(), 2.0);
            assert_eq!(vertex.position.y.abs(), 1.0);
            assert_eq!(vertex.position.z.abs(), 3.0);
        }
    }

    #[test]
    fn test_cube_face_normals() {
        let cube = Cube::new(1.0, 1.0, 1.0).unwrap().generate();
        let expected = [
            Vec3::Z,
            Vec3::X,
            Vec3::NEG_Z,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
        ];
        for (face, normal) in cube.vertices().chunks(6).zip(expected) {
            assert!(face.iter().all(|v| v.normal == normal));
            // Every corner lies on the outward side of its face
            assert!(face.iter().all(|v| v.position.dot(normal) > 0.0));
        }
    }

    #[test]
    fn test_cube_winding_faces_outward() {
        let cube = Cube::new(1.0, 2.0, 0.5).unwrap().generate();
        let vertices = cube.vertices();
        for [a, b, c] in cube.triangles() {
            let (a, b, c) = (&vertices[a as usize], &vertices[b as usize], &vertices[c as usize]);
            let face_normal = (b.position - a.position).cross(c.position - a.position);
            assert!(face_normal.dot(a.normal) > 0.0);
        }
    }

    #[test]
    fn test_cube_face_uvs() {
        let cube = Cube::new(1.0, 1.0, 1.0).unwrap().generate();
        for face in cube.vertices().chunks(6) {
            let uvs: Vec<Vec2> = face.iter().map(|v| v.tex_coord).collect();
            assert_eq!(uvs, FACE_UVS.to_vec());
        }
    }

    #[test]
    fn test_indexed_cube() {
        let cube = Cube::new(2.0, 2.0, 2.0).unwrap().generate_indexed();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.index_count(), 36);
        assert!(cube.indices_in_range());
        assert!(matches!(cube.indices(), Some(Indices::U16(_))));

        let vertices = cube.vertices();
        for vertex in vertices {
            assert!((vertex.normal.length() - 1.0).abs() < 1e-6);
        }
        for [a, b, c] in cube.triangles() {
            let (a, b, c) = (
                vertices[a as usize].position,
                vertices[b as usize].position,
                vertices[c as usize].position,
            );
            let face_normal = (b - a).cross(c - a);
            // The triangle centroid points away from the origin along the face normal
            assert!(face_normal.dot(a + b + c) > 0.0);
        }
    }

    #[test]
    fn test_indexed_cube_matches_flat_positions() {
        let cube = Cube::new(1.0, 3.0, 2.0).unwrap();
        let flat = cube.generate();
        let indexed = cube.generate_indexed();
        let corners = indexed.vertices();
        for ([a, b, c], flat_triangle) in indexed.triangles().zip(flat.vertices().chunks(3)) {
            assert_eq!(corners[a as usize].position, flat_triangle[0].position);
            assert_eq!(corners[b as usize].position, flat_triangle[1].position);
            assert_eq!(corners[c as usize].position, flat_triangle[2].position);
        }
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Cube::new(0.0, 1.0, 1.0),
            Err(ShapeError::InvalidDimension {
                parameter: "height",
                ..
            })
        ));
        assert!(Cube::new(1.0, -1.0, 1.0).is_err());
        assert!(Cube::new(1.0, 1.0, f32::NAN).is_err());
    }
}
