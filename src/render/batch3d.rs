use log::warn;

use super::context::{ChunkVertex, GraphicsContext};

/// Transient world-space triangles drawn with the main shader after the
/// chunk pass.
#[derive(Debug)]
pub struct Batch3D {
    vertices: Vec<ChunkVertex>,
    capacity: usize,
}

impl Batch3D {
    /// `capacity` is counted in vertices.
    pub fn new(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn begin(&mut self) {
        self.vertices.clear();
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle(&mut self, a: ChunkVertex, b: ChunkVertex, c: ChunkVertex) {
        if self.vertices.len() + 3 > self.capacity {
            warn!("Batch3D full ({} vertices), triangle dropped", self.capacity);
            return;
        }
        self.vertices.extend_from_slice(&[a, b, c]);
    }

    pub fn render<G: GraphicsContext>(&mut self, gfx: &mut G) {
        if self.vertices.is_empty() {
            return;
        }
        gfx.draw_triangles(&self.vertices);
        self.vertices.clear();
    }
}
