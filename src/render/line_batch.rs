use glam::{Vec3, Vec4};
use log::warn;

use super::context::{GraphicsContext, LineVertex};

/// Immediate-mode line accumulator flushed with one draw call.
#[derive(Debug)]
pub struct LineBatch {
    vertices: Vec<LineVertex>,
    capacity: usize,
    dropped: usize,
}

impl LineBatch {
    /// `capacity` is counted in lines.
    pub fn new(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity * 2),
            capacity,
            dropped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    /// Queues a segment. Segments beyond capacity are dropped.
    pub fn line(&mut self, from: Vec3, to: Vec3, color: Vec4) {
        if self.len() >= self.capacity {
            self.dropped += 1;
            return;
        }
        self.vertices.push(LineVertex::new(from, color));
        self.vertices.push(LineVertex::new(to, color));
    }

    /// Queues the twelve edges of an axis-aligned box. `size` is the full
    /// edge length along each axis.
    pub fn box_outline(&mut self, center: Vec3, size: Vec3, color: Vec4) {
        let min = center - size * 0.5;
        let max = center + size * 0.5;
        let corner = |x: bool, y: bool, z: bool| {
            Vec3::new(
                if x { max.x } else { min.x },
                if y { max.y } else { min.y },
                if z { max.z } else { min.z },
            )
        };

        for &(y, z) in &[(false, false), (true, false), (false, true), (true, true)] {
            self.line(corner(false, y, z), corner(true, y, z), color);
        }
        for &(x, z) in &[(false, false), (true, false), (false, true), (true, true)] {
            self.line(corner(x, false, z), corner(x, true, z), color);
        }
        for &(x, y) in &[(false, false), (true, false), (false, true), (true, true)] {
            self.line(corner(x, y, false), corner(x, y, true), color);
        }
    }

    /// Draws and clears everything queued. Nothing is submitted when empty.
    pub fn render<G: GraphicsContext>(&mut self, gfx: &mut G) {
        if self.dropped > 0 {
            warn!(
                "Line batch full ({} lines), dropped {} lines",
                self.capacity, self.dropped
            );
            self.dropped = 0;
        }
        if self.vertices.is_empty() {
            return;
        }
        gfx.draw_lines(&self.vertices);
        self.vertices.clear();
    }
}
