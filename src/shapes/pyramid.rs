//! Four-sided pyramid with a rectangular base.

use glam::{Vec2, Vec3};

use crate::error::{positive, ShapeResult};
use crate::mesh::{ShapeBuffer, Vertex};

const SIDE_UVS: [Vec2; 3] = [Vec2::new(0.5, 1.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];

const BASE_UVS: [Vec2; 6] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
];

/// A pyramid centered at the origin with its apex on +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pyramid {
    height: f32,
    width: f32,
    depth: f32,
}

impl Pyramid {
    pub fn new(height: f32, width: f32, depth: f32) -> ShapeResult<Self> {
        Ok(Self {
            height: positive("pyramid", "height", height)?,
            width: positive("pyramid", "width", width)?,
            depth: positive("pyramid", "depth", depth)?,
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

    /// Flat-shaded pyramid: four sides then a two-triangle base, 18 vertices.
    pub fn generate(&self) -> ShapeBuffer {
        let (w, h, d) = (self.width * 0.5, self.height * 0.5, self.depth * 0.5);
        let apex = Vec3::new(0.0, h, 0.0);
        let front_left = Vec3::new(-w, -h, d);
        let front_right = Vec3::new(w, -h, d);
        let rear_right = Vec3::new(w, -h, -d);
        let rear_left = Vec3::new(-w, -h, -d);

        let sides = [
            [apex, front_left, front_right],
            [apex, front_right, rear_right],
            [apex, rear_right, rear_left],
            [apex, rear_left, front_left],
        ];
        let base = [
            [front_left, rear_left, front_right],
            [front_right, rear_left, rear_right],
        ];

        let mut vertices = Vec::with_capacity(18);
        for triangle in sides {
            push_face(&mut vertices, triangle, SIDE_UVS);
        }
        for (triangle, uvs) in base.into_iter().zip(BASE_UVS.chunks(3)) {
            push_face(&mut vertices, triangle, [uvs[0], uvs[1], uvs[2]]);
        }

        log::debug!(
            "Generated pyramid {}x{}x{}: {} vertices",
            self.width,
            self.height,
            self.depth,
            vertices.len()
        );
        ShapeBuffer::non_indexed("pyramid", vertices)
    }
}

fn push_face(vertices: &mut Vec<Vertex>, corners: [Vec3; 3], uvs: [Vec2; 3]) {
    let [v0, v1, v2] = corners;
    let normal = (v1 - v0).cross(v2 - v0).normalize();
    let color = (normal + Vec3::ONE) * 0.5;
    for (position, uv) in corners.into_iter().zip(uvs) {
        vertices.push(Vertex::new(position, normal, uv).with_color(color));
    }
}
