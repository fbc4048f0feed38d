//! UV sphere, optionally truncated by horizontal cut planes.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::error::{at_least, positive, within_index_range, ShapeError, ShapeResult};
use crate::mesh::{Indices, ShapeBuffer, Vertex};

/// A sphere centered at the origin with its poles on the Y axis.
///
/// `top` and `bottom` are the Y coordinates of the planes the sphere is cut
/// at. An uncut sphere has `top = radius` and `bottom = -radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    radius: f32,
    slices: u32,
    stacks: u32,
    top: f32,
    bottom: f32,
}

impl Sphere {
    pub const MIN_SLICES: u32 = 3;
    pub const MIN_STACKS: u32 = 2;

    pub fn new(radius: f32, slices: u32, stacks: u32) -> ShapeResult<Self> {
        Self::truncated(radius, slices, stacks, radius, -radius)
    }

    pub fn truncated(
        radius: f32,
        slices: u32,
        stacks: u32,
        top: f32,
        bottom: f32,
    ) -> ShapeResult<Self> {
        let radius = positive("sphere", "radius", radius)?;
        let slices = at_least("sphere", "slices", Self::MIN_SLICES, slices)?;
        let stacks = at_least("sphere", "stacks", Self::MIN_STACKS, stacks)?;
        within_index_range(
            "sphere",
            (stacks as u64 + 1) * (slices as u64 + 1),
            6 * slices as u64 * stacks as u64,
        )?;

        if !(top.is_finite() && bottom.is_finite() && -radius <= bottom && bottom < top && top <= radius)
        {
            return Err(ShapeError::InvalidCutRange {
                radius,
                top,
                bottom,
            });
        }

        Ok(Self {
            radius,
            slices,
            stacks,
            top,
            bottom,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn slices(&self) -> u32 {
        self.slices
    }

    pub fn stacks(&self) -> u32 {
        self.stacks
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    /// Vertical extent between the cut planes.
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    fn has_top_pole(&self) -> bool {
        self.top >= self.radius
    }

    fn has_bottom_pole(&self) -> bool {
        self.bottom <= -self.radius
    }

    /// Smooth sphere with a duplicated seam column and `u32` indices.
    pub fn generate(&self) -> ShapeBuffer {
        let theta_top = (self.top / self.radius).clamp(-1.0, 1.0).acos();
        let theta_bottom = (self.bottom / self.radius).clamp(-1.0, 1.0).acos();
        let theta_step = (theta_bottom - theta_top) / self.stacks as f32;
        let columns = self.slices + 1;

        let mut vertices = Vec::with_capacity(((self.stacks + 1) * columns) as usize);
        for stack in 0..=self.stacks {
            let theta = theta_top + stack as f32 * theta_step;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for slice in 0..=self.slices {
                let phi = slice as f32 * TAU / self.slices as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();
                let direction = Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
                let normal = direction.normalize();
                let uv = Vec2::new(
                    slice as f32 / self.slices as f32,
                    1.0 - stack as f32 / self.stacks as f32,
                );
                vertices.push(
                    Vertex::new(direction * self.radius, normal, uv)
                        .with_color((normal + Vec3::ONE) * 0.5),
                );
            }
        }

        let mut indices = Vec::with_capacity((6 * self.slices * self.stacks) as usize);
        for stack in 0..self.stacks {
            let skip_upper = stack == 0 && self.has_top_pole();
            let skip_lower = stack == self.stacks - 1 && self.has_bottom_pole();

            for slice in 0..self.slices {
                let current = stack * columns + slice;
                let next = current + columns;

                if !skip_upper {
                    indices.extend_from_slice(&[current, current + 1, next + 1]);
                }
                if !skip_lower {
                    indices.extend_from_slice(&[current, next + 1, next]);
                }
            }
        }

        log::debug!(
            "Generated sphere r={} ({} slices, {} stacks, y in [{}, {}]): {} vertices, {} indices",
            self.radius,
            self.slices,
            self.stacks,
            self.bottom,
            self.top,
            vertices.len(),
            indices.len()
        );
        ShapeBuffer::indexed("sphere", vertices, Indices::U32(indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_counts() {
        let sphere = Sphere::new(1.0, 16, 8).unwrap().generate();
        assert_eq!(sphere.vertex_count(), 9 * 17);
        // Pole rows contribute one triangle per slice instead of two
        assert_eq!(sphere.triangle_count(), 2 * 16 * 8 - 2 * 16);
        assert!(sphere.indices_in_range());
        assert!(matches!(sphere.indices(), Some(Indices::U32(_))));
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let sphere = Sphere::new(2.5, 12, 6).unwrap().generate();
        for vertex in sphere.vertices() {
            assert!((vertex.position.length() - 2.5).abs() < 1e-5);
            assert!((vertex.normal.length() - 1.0).abs() < 1e-5);
            assert!((vertex.position / 2.5 - vertex.normal).length() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_winding_faces_outward() {
        let sphere = Sphere::new(1.0, 10, 5).unwrap().generate();
        let vertices = sphere.vertices();
        for [a, b, c] in sphere.triangles() {
            let (a, b, c) = (
                vertices[a as usize].position,
                vertices[b as usize].position,
                vertices[c as usize].position,
            );
            let face_normal = (b - a).cross(c - a);
            assert!(face_normal.length() > 1e-7, "degenerate triangle emitted");
            assert!(face_normal.dot(a + b + c) > 0.0);
        }
    }

    #[test]
    fn test_sphere_uvs() {
        let sphere = Sphere::new(1.0, 4, 2).unwrap().generate();
        let vertices = sphere.vertices();
        assert_eq!(vertices[0].tex_coord, Vec2::new(0.0, 1.0));
        assert_eq!(vertices[4].tex_coord, Vec2::new(1.0, 1.0));
        assert_eq!(vertices[14].tex_coord, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_truncated_sphere() {
        let sphere = Sphere::truncated(1.0, 8, 4, 0.5, -0.25).unwrap();
        assert_eq!(sphere.height(), 0.75);

        let buffer = sphere.generate();
        let vertices = buffer.vertices();
        assert!((vertices[0].position.y - 0.5).abs() < 1e-6);
        assert!((vertices.last().unwrap().position.y + 0.25).abs() < 1e-6);
        // No poles, so every stack keeps both triangles
        assert_eq!(buffer.triangle_count(), 2 * 8 * 4);
    }

    #[test]
    fn test_invalid_cut_range() {
        assert!(matches!(
            Sphere::truncated(1.0, 8, 4, 0.0, 0.5),
            Err(ShapeError::InvalidCutRange { .. })
        ));
        assert!(Sphere::truncated(1.0, 8, 4, 1.5, 0.0).is_err());
        assert!(Sphere::truncated(1.0, 8, 4, 0.5, -1.5).is_err());
        assert!(Sphere::new(1.0, 2, 4).is_err());
        assert!(Sphere::new(1.0, 8, 1).is_err());
    }

    #[test]
    fn test_segment_counts_bounded_by_index_range() {
        assert!(matches!(
            Sphere::new(1.0, 65536, 65535),
            Err(ShapeError::TooManySegments { shape: "sphere", .. })
        ));
        assert!(Sphere::new(1.0, 3, u32::MAX / 18 + 1).is_err());
        assert!(Sphere::new(1.0, 3, u32::MAX / 18).is_ok());
    }
}
