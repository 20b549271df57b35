//! Collision shapes and axis-aligned bounds
//!
//! Shapes carry only geometry. A body's position is always the shape's center,
//! so a box of size 20x40 placed at (10, 20) spans x 0..20 and y 0..40.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Geometry used for collision tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box described by its half extents
    Box { half_extents: Vec2 },
    /// Circle described by its radius
    Circle { radius: f32 },
}

impl Shape {
    /// Box from a full width and height
    pub fn rect(width: f32, height: f32) -> Self {
        Shape::Box {
            half_extents: Vec2::new(width, height) * 0.5,
        }
    }

    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }
    }

    /// Half extents of the shape's bounding box
    pub fn half_size(&self) -> Vec2 {
        match *self {
            Shape::Box { half_extents } => half_extents,
            Shape::Circle { radius } => Vec2::splat(radius),
        }
    }

    /// Bounding box when centered at `position`
    pub fn bounds(&self, position: Vec2) -> Bounds {
        let half = self.half_size();
        Bounds {
            min: position - half,
            max: position + half,
        }
    }

    /// Area of the shape (used for default masses)
    pub fn area(&self) -> f32 {
        match *self {
            Shape::Box { half_extents } => 4.0 * half_extents.x * half_extents.y,
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
        }
    }
}

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Strict overlap test; boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}
