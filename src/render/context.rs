use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use super::mesh::Mesh;

/// Fixed-function switches the world pass flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DepthTest,
    CullFace,
    Multisample,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Chunk geometry and the transient 3D batch.
    Main,
    /// Selection outline and debug gizmos.
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Block atlas sampled by the main shader.
    Blocks,
}

/// Vertex layout shared by chunk meshes and the transient 3D batch.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ChunkVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    /// RGB block light plus sky light.
    pub light: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub fn new(position: Vec3, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

/// Everything the world renderer needs from the graphics API.
///
/// Uniform setters act on the shader most recently selected with
/// [`GraphicsContext::use_shader`].
pub trait GraphicsContext {
    /// Drawable size in pixels.
    fn surface_size(&self) -> (u32, u32);
    /// Clears colour and depth.
    fn clear(&mut self, color: Vec3);
    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);
    fn set_capability(&mut self, capability: Capability, enabled: bool);
    fn line_width(&mut self, width: f32);
    fn use_shader(&mut self, shader: ShaderKind);
    fn uniform_matrix(&mut self, name: &str, value: &Mat4);
    fn uniform1f(&mut self, name: &str, value: f32);
    fn uniform3f(&mut self, name: &str, value: Vec3);
    fn bind_texture(&mut self, texture: TextureKind);
    fn draw_mesh(&mut self, mesh: &Mesh);
    /// Draws `vertices` as a line list.
    fn draw_lines(&mut self, vertices: &[LineVertex]);
    /// Draws `vertices` as a triangle list.
    fn draw_triangles(&mut self, vertices: &[ChunkVertex]);
}
