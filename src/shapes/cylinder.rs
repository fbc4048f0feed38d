//! Capped cylinder along the Z axis.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::error::{at_least, positive, within_index_range, ShapeResult};
use crate::mesh::{Indices, ShapeBuffer, Vertex};

/// A closed cylinder centered at the origin, its axis along Z.
///
/// The front cap sits at `z = +length / 2`, the rear cap at `z = -length / 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    radius: f32,
    slices: u32,
    length: f32,
}

impl Cylinder {
    pub const MIN_SLICES: u32 = 3;

    /// A unit-radius cylinder.
    pub fn new(slices: u32, length: f32) -> ShapeResult<Self> {
        Self::with_radius(1.0, slices, length)
    }

    pub fn with_radius(radius: f32, slices: u32, length: f32) -> ShapeResult<Self> {
        let radius = positive("cylinder", "radius", radius)?;
        let slices = at_least("cylinder", "slices", Self::MIN_SLICES, slices)?;
        let length = positive("cylinder", "length", length)?;

        // Sized for the split form, which is the larger of the two
        let n = slices as u64;
        within_index_range("cylinder", 4 * (n + 1), 12 * n)?;

        Ok(Self {
            radius,
            slices,
            length,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn slices(&self) -> u32 {
        self.slices
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    /// Direction of perimeter vertex `i` (0-based), counter-clockwise about +Z from +X.
    fn direction(&self, i: u32) -> Vec2 {
        let angle = i as f32 * TAU / self.slices as f32;
        Vec2::new(angle.cos(), angle.sin())
    }

    fn cap_uv(direction: Vec2) -> Vec2 {
        (direction + Vec2::ONE) * 0.5
    }

    /// Compact form: one shared ring of vertices per cap.
    ///
    /// Vertex 0 is the front center, `1..=n` the front perimeter, `n + 1` the
    /// rear center and `n + 2..=2n + 1` the rear perimeter. Normals are the
    /// normalized positions, so the side walls shade like a rounded solid.
    pub fn generate(&self) -> ShapeBuffer {
        let n = self.slices;
        let half_length = self.length * 0.5;
        let rear = n + 1;

        let mut vertices = Vec::with_capacity(2 * (n as usize + 1));
        for z in [half_length, -half_length] {
            let center = Vec3::new(0.0, 0.0, z);
            vertices.push(compact_vertex(center, Vec2::splat(0.5)));
            for i in 0..n {
                let direction = self.direction(i);
                let position = (direction * self.radius).extend(z);
                vertices.push(compact_vertex(position, Self::cap_uv(direction)));
            }
        }

        let mut indices = Vec::with_capacity(12 * n as usize);
        for i in 0..n {
            let a = i + 1;
            let b = if i + 2 > n { 1 } else { i + 2 };

            // Front cap
            indices.extend_from_slice(&[0, a, b]);
            // Rear cap, reversed to face -Z
            indices.extend_from_slice(&[rear, rear + b, rear + a]);
            // Side wall
            indices.extend_from_slice(&[a, rear + a, rear + b]);
            indices.extend_from_slice(&[a, rear + b, b]);
        }

        log::debug!(
            "Generated cylinder r={} l={} with {} slices: {} vertices, {} indices",
            self.radius,
            self.length,
            n,
            vertices.len(),
            indices.len()
        );
        let indices = Indices::fit(vertices.len(), indices);
        ShapeBuffer::indexed("cylinder", vertices, indices)
    }

    /// Split form: caps and side wall have their own vertices.
    ///
    /// Caps carry flat `±Z` normals, the side wall carries radial normals and
    /// wraps its texture once around with a duplicated seam column.
    pub fn generate_split(&self) -> ShapeBuffer {
        let n = self.slices;
        let half_length = self.length * 0.5;
        let ring = n + 1;

        let mut vertices = Vec::with_capacity(4 * ring as usize);

        for (z, normal) in [(half_length, Vec3::Z), (-half_length, Vec3::NEG_Z)] {
            vertices.push(
                Vertex::new(Vec3::new(0.0, 0.0, z), normal, Vec2::splat(0.5))
                    .with_color(normal_color(normal)),
            );
            for i in 0..n {
                let direction = self.direction(i);
                vertices.push(
                    Vertex::new((direction * self.radius).extend(z), normal, Self::cap_uv(direction))
                        .with_color(normal_color(normal)),
                );
            }
        }

        for (z, v) in [(half_length, 1.0), (-half_length, 0.0)] {
            for i in 0..=n {
                let direction = self.direction(i % n);
                let normal = direction.extend(0.0);
                vertices.push(
                    Vertex::new(
                        (direction * self.radius).extend(z),
                        normal,
                        Vec2::new(i as f32 / n as f32, v),
                    )
                    .with_color(normal_color(normal)),
                );
            }
        }

        let rear_cap = ring;
        let front_side = 2 * ring;
        let rear_side = 3 * ring;
        let mut indices = Vec::with_capacity(12 * n as usize);
        for i in 0..n {
            let a = 1 + i;
            let b = 1 + (i + 1) % n;
            indices.extend_from_slice(&[0, a, b]);
            indices.extend_from_slice(&[rear_cap, rear_cap + b, rear_cap + a]);
        }
        for i in 0..n {
            indices.extend_from_slice(&[front_side + i, rear_side + i, rear_side + i + 1]);
            indices.extend_from_slice(&[front_side + i, rear_side + i + 1, front_side + i + 1]);
        }

        log::debug!(
            "Generated split cylinder r={} l={} with {} slices: {} vertices, {} indices",
            self.radius,
            self.length,
            n,
            vertices.len(),
            indices.len()
        );
        let indices = Indices::fit(vertices.len(), indices);
        ShapeBuffer::indexed("cylinder", vertices, indices)
    }
}

fn compact_vertex(position: Vec3, uv: Vec2) -> Vertex {
    let normal = position.normalize();
    Vertex::new(position, normal, uv).with_color(normal_color(normal))
}

fn normal_color(normal: Vec3) -> Vec3 {
    (normal + Vec3::ONE) * 0.5
}
