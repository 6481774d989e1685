//! Recording graphics backend for runs without a window.
//!
//! Every call is appended to a command log so a frame can be inspected after
//! the fact; capability state is tracked the way a real driver would.

use std::collections::{HashMap, HashSet};

use glam::{Mat4, Vec3};

use super::context::{
    Capability, ChunkVertex, GraphicsContext, LineVertex, ShaderKind, TextureKind,
};
use super::mesh::{Mesh, MeshBuilder};
use crate::world::chunk::Chunk;
use crate::world::chunk_coord::ChunkCoord;

#[derive(Debug, Clone, PartialEq)]
pub enum GfxCommand {
    Clear(Vec3),
    Viewport { x: i32, y: i32, width: u32, height: u32 },
    Enable(Capability),
    Disable(Capability),
    LineWidth(f32),
    UseShader(ShaderKind),
    UniformMatrix { name: String, value: Mat4 },
    Uniform1f { name: String, value: f32 },
    Uniform3f { name: String, value: Vec3 },
    BindTexture(TextureKind),
    DrawMesh { vao: u32, vertex_count: i32 },
    DrawLines(Vec<LineVertex>),
    DrawTriangles(usize),
}

#[derive(Debug)]
pub struct HeadlessContext {
    width: u32,
    height: u32,
    enabled: HashSet<Capability>,
    shader: Option<ShaderKind>,
    commands: Vec<GfxCommand>,
}

impl HeadlessContext {
    /// Fresh context with multisampling on, like a default GL framebuffer
    /// created with samples.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            enabled: HashSet::from([Capability::Multisample]),
            shader: None,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[GfxCommand] {
        &self.commands
    }

    /// Returns the log recorded so far and starts a new one.
    pub fn take_commands(&mut self) -> Vec<GfxCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.enabled.contains(&capability)
    }

    pub fn current_shader(&self) -> Option<ShaderKind> {
        self.shader
    }

    pub fn draw_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| {
                matches!(
                    command,
                    GfxCommand::DrawMesh { .. } | GfxCommand::DrawLines(_) | GfxCommand::DrawTriangles(_)
                )
            })
            .count()
    }

    fn set_enabled(&mut self, capability: Capability, enabled: bool) {
        if enabled {
            self.enabled.insert(capability);
        } else {
            self.enabled.remove(&capability);
        }
    }
}

impl GraphicsContext for HeadlessContext {
    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Vec3) {
        self.commands.push(GfxCommand::Clear(color));
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.commands.push(GfxCommand::Viewport { x, y, width, height });
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        self.set_enabled(capability, enabled);
        self.commands.push(if enabled {
            GfxCommand::Enable(capability)
        } else {
            GfxCommand::Disable(capability)
        });
    }

    fn line_width(&mut self, width: f32) {
        self.commands.push(GfxCommand::LineWidth(width));
    }

    fn use_shader(&mut self, shader: ShaderKind) {
        self.shader = Some(shader);
        self.commands.push(GfxCommand::UseShader(shader));
    }

    fn uniform_matrix(&mut self, name: &str, value: &Mat4) {
        self.commands.push(GfxCommand::UniformMatrix {
            name: name.to_string(),
            value: *value,
        });
    }

    fn uniform1f(&mut self, name: &str, value: f32) {
        self.commands.push(GfxCommand::Uniform1f {
            name: name.to_string(),
            value,
        });
    }

    fn uniform3f(&mut self, name: &str, value: Vec3) {
        self.commands.push(GfxCommand::Uniform3f {
            name: name.to_string(),
            value,
        });
    }

    fn bind_texture(&mut self, texture: TextureKind) {
        self.commands.push(GfxCommand::BindTexture(texture));
    }

    fn draw_mesh(&mut self, mesh: &Mesh) {
        self.commands.push(GfxCommand::DrawMesh {
            vao: mesh.vao(),
            vertex_count: mesh.vertex_count(),
        });
    }

    fn draw_lines(&mut self, vertices: &[LineVertex]) {
        self.commands.push(GfxCommand::DrawLines(vertices.to_vec()));
    }

    fn draw_triangles(&mut self, vertices: &[ChunkVertex]) {
        self.commands.push(GfxCommand::DrawTriangles(vertices.len()));
    }
}

/// [`MeshBuilder`] that hands out numbered handles without touching a GPU.
#[derive(Debug)]
pub struct HeadlessMeshBuilder {
    next_id: u32,
    built: usize,
    released: usize,
    refused: HashSet<ChunkCoord>,
    live: HashMap<u32, ChunkCoord>,
}

impl HeadlessMeshBuilder {
    /// Vertex count reported for every mesh.
    pub const VERTEX_COUNT: i32 = 36;

    pub fn new() -> Self {
        Self {
            next_id: 1,
            built: 0,
            released: 0,
            refused: HashSet::new(),
            live: HashMap::new(),
        }
    }

    /// Makes builds for `coord` fail until [`HeadlessMeshBuilder::accept`].
    pub fn refuse(&mut self, coord: ChunkCoord) {
        self.refused.insert(coord);
    }

    pub fn accept(&mut self, coord: ChunkCoord) {
        self.refused.remove(&coord);
    }

    pub fn built(&self) -> usize {
        self.built
    }

    pub fn released(&self) -> usize {
        self.released
    }

    /// Chunk a live handle was built for.
    pub fn chunk_of(&self, vao: u32) -> Option<ChunkCoord> {
        self.live.get(&vao).copied()
    }
}

impl Default for HeadlessMeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBuilder for HeadlessMeshBuilder {
    fn build(&mut self, chunk: &Chunk) -> Option<Mesh> {
        if self.refused.contains(&chunk.coord()) {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.built += 1;
        self.live.insert(id, chunk.coord());
        Some(Mesh::new(id, id, Self::VERTEX_COUNT))
    }

    fn release(&mut self, mesh: Mesh) {
        self.live.remove(&mesh.vao());
        self.released += 1;
    }
}
