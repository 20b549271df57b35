//! Rendering module
//!
//! The simulation only knows how to describe itself to a `Canvas`. Windowing
//! and GPU upload belong to the host; `VertexCanvas` turns a frame into a
//! triangle list the host can upload as-is.

pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use vertex::Vertex;

use crate::sim::{RigidBody, Shape, World};
use crate::{Color, color_to_rgba};

/// Anything a frame can be drawn onto
pub trait Canvas {
    /// Fill the whole surface
    fn clear(&mut self, color: Color);
    /// Fill an axis-aligned rectangle given its top-left corner and size
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
}

impl RigidBody {
    /// Render the body's current shape at its current position
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        match self.shape {
            Shape::Box { half_extents } => {
                canvas.fill_rect(self.pos - half_extents, half_extents * 2.0, self.color)
            }
            Shape::Circle { radius } => canvas.fill_circle(self.pos, radius, self.color),
        }
    }
}

impl World {
    /// Clear the canvas and draw every live body in handle order
    pub fn draw(&self, canvas: &mut dyn Canvas, background: Color) {
        canvas.clear(background);
        for body in self.bodies().iter().filter(|b| !b.is_destroyed()) {
            body.draw(canvas);
        }
    }
}

/// Canvas that tessellates everything into triangles
#[derive(Debug, Default)]
pub struct VertexCanvas {
    pub clear_color: [f32; 4],
    pub vertices: Vec<Vertex>,
    /// Longest circle edge in pixels
    pub max_edge: f32,
}

impl VertexCanvas {
    pub fn new() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vertices: Vec::new(),
            max_edge: 4.0,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn as_bytes(&self) -> &[u8] {
        vertex::as_bytes(&self.vertices)
    }
}

impl Canvas for VertexCanvas {
    fn clear(&mut self, color: Color) {
        self.clear_color = color_to_rgba(color);
        self.vertices.clear();
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.vertices.extend(shapes::rect(min, size, color_to_rgba(color)));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let segments = shapes::circle_segments(radius, self.max_edge);
        self.vertices
            .extend(shapes::circle(center, radius, color_to_rgba(color), segments));
    }
}
