//! Procedural shape generators.
//!
//! Each generator is a small validated parameter struct whose `generate`
//! method returns a [`ShapeBuffer`]. Generators are pure: the same
//! parameters always produce the same vertices and indices.
//!
//! All shapes are centered at the origin and wound counter-clockwise when
//! viewed from outside.

mod cube;
mod cylinder;
mod plane;
mod pyramid;
mod sphere;

pub use cube::Cube;
pub use cylinder::Cylinder;
pub use plane::Plane;
pub use pyramid::Pyramid;
pub use sphere::Sphere;

use crate::mesh::ShapeBuffer;

/// Any of the supported primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Cube(Cube),
    Cylinder(Cylinder),
    Pyramid(Pyramid),
    Sphere(Sphere),
    Plane(Plane),
}

impl Shape {
    /// Generate the default form of this shape.
    pub fn generate(&self) -> ShapeBuffer {
        match self {
            Self::Cube(cube) => cube.generate(),
            Self::Cylinder(cylinder) => cylinder.generate(),
            Self::Pyramid(pyramid) => pyramid.generate(),
            Self::Sphere(sphere) => sphere.generate(),
            Self::Plane(plane) => plane.generate(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cube(_) => "cube",
            Self::Cylinder(_) => "cylinder",
            Self::Pyramid(_) => "pyramid",
            Self::Sphere(_) => "sphere",
            Self::Plane(_) => "plane",
        }
    }

    /// Highest Y coordinate of the shape.
    pub fn top(&self) -> f32 {
        match self {
            Self::Cube(cube) => cube.height() * 0.5,
            Self::Cylinder(cylinder) => cylinder.radius(),
            Self::Pyramid(pyramid) => pyramid.height() * 0.5,
            Self::Sphere(sphere) => sphere.top(),
            Self::Plane(_) => 0.0,
        }
    }

    /// Lowest Y coordinate of the shape.
    pub fn bottom(&self) -> f32 {
        match self {
            Self::Sphere(sphere) => sphere.bottom(),
            Self::Plane(_) => 0.0,
            _ => -self.top(),
        }
    }

    /// Extent along Y.
    pub fn height(&self) -> f32 {
        self.top() - self.bottom()
    }

    /// Extent along X.
    pub fn width(&self) -> f32 {
        match self {
            Self::Cube(cube) => cube.width(),
            Self::Cylinder(cylinder) => 2.0 * cylinder.radius(),
            Self::Pyramid(pyramid) => pyramid.width(),
            Self::Sphere(sphere) => 2.0 * widest_ring(sphere),
            Self::Plane(plane) => plane.width(),
        }
    }

    /// Extent along Z.
    pub fn depth(&self) -> f32 {
        match self {
            Self::Cube(cube) => cube.depth(),
            Self::Cylinder(cylinder) => cylinder.length(),
            Self::Pyramid(pyramid) => pyramid.depth(),
            Self::Sphere(sphere) => 2.0 * widest_ring(sphere),
            Self::Plane(plane) => plane.depth(),
        }
    }

    /// Radius of round shapes.
    pub fn radius(&self) -> Option<f32> {
        match self {
            Self::Cylinder(cylinder) => Some(cylinder.radius()),
            Self::Sphere(sphere) => Some(sphere.radius()),
            _ => None,
        }
    }
}

/// Radius of the widest horizontal ring between the sphere's cut planes.
fn widest_ring(sphere: &Sphere) -> f32 {
    let closest = if sphere.bottom() <= 0.0 && sphere.top() >= 0.0 {
        0.0
    } else {
        sphere.bottom().abs().min(sphere.top().abs())
    };
    (sphere.radius() * sphere.radius() - closest * closest).max(0.0).sqrt()
}

impl From<Cube> for Shape {
    fn from(cube: Cube) -> Self {
        Self::Cube(cube)
    }
}

impl From<Cylinder> for Shape {
    fn from(cylinder: Cylinder) -> Self {
        Self::Cylinder(cylinder)
    }
}

impl From<Pyramid> for Shape {
    fn from(pyramid: Pyramid) -> Self {
        Self::Pyramid(pyramid)
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

impl From<Plane> for Shape {
    fn from(plane: Plane) -> Self {
        Self::Plane(plane)
    }
}
