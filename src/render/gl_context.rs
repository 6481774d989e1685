use std::mem::size_of;

use glam::{Mat4, Vec3};

use super::context::{
    Capability, ChunkVertex, GraphicsContext, LineVertex, ShaderKind, TextureKind,
};
use super::mesh::{bind_chunk_vertex_layout, Mesh};
use super::shaders::{builtin, ShaderProgram};
use super::texture::Texture;
use crate::utils::error::RenderError;

/// Dynamic VAO/VBO pair refilled on every draw.
struct StreamBuffer {
    vao: u32,
    vbo: u32,
}

impl StreamBuffer {
    /// # Safety
    ///
    /// Needs a current GL context. `layout` runs with the new VAO and VBO
    /// bound.
    unsafe fn new(layout: unsafe fn()) -> Self {
        let mut vao = 0;
        let mut vbo = 0;
        gl::GenVertexArrays(1, &mut vao);
        gl::GenBuffers(1, &mut vbo);
        gl::BindVertexArray(vao);
        gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
        layout();
        gl::BindVertexArray(0);
        Self { vao, vbo }
    }

    fn draw(&self, mode: gl::types::GLenum, bytes: &[u8], count: usize) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                bytes.len() as isize,
                bytes.as_ptr() as *const _,
                gl::STREAM_DRAW,
            );
            gl::DrawArrays(mode, 0, count as i32);
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for StreamBuffer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}

unsafe fn bind_line_vertex_layout() {
    let stride = size_of::<LineVertex>() as i32;
    let float = size_of::<f32>();

    // Position (location = 0)
    gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, stride, std::ptr::null());
    gl::EnableVertexAttribArray(0);

    // Color (location = 1)
    gl::VertexAttribPointer(1, 4, gl::FLOAT, gl::FALSE, stride, (3 * float) as *const _);
    gl::EnableVertexAttribArray(1);
}

/// [`GraphicsContext`] backed by OpenGL 3.3 core.
///
/// The caller owns the window and must have made its context current and
/// loaded the `gl` function pointers before calling [`GlContext::new`].
pub struct GlContext {
    width: u32,
    height: u32,
    main_shader: ShaderProgram,
    lines_shader: ShaderProgram,
    blocks: Texture,
    current: ShaderKind,
    lines: StreamBuffer,
    triangles: StreamBuffer,
}

impl GlContext {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::with_atlas(width, height, Texture::white()?)
    }

    pub fn with_atlas(width: u32, height: u32, blocks: Texture) -> Result<Self, RenderError> {
        let mut main_shader = ShaderProgram::from_sources(builtin::MAIN_VERTEX, builtin::MAIN_FRAGMENT)?;
        let lines_shader = ShaderProgram::from_sources(builtin::LINES_VERTEX, builtin::LINES_FRAGMENT)?;

        main_shader.set_used();
        main_shader.set_uniform_1i("u_texture0", 0);

        let (lines, triangles) = unsafe {
            (
                StreamBuffer::new(bind_line_vertex_layout),
                StreamBuffer::new(bind_chunk_vertex_layout),
            )
        };

        log::info!("OpenGL context ready ({}x{})", width, height);

        Ok(Self {
            width,
            height,
            main_shader,
            lines_shader,
            blocks,
            current: ShaderKind::Main,
            lines,
            triangles,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn shader(&mut self) -> &mut ShaderProgram {
        match self.current {
            ShaderKind::Main => &mut self.main_shader,
            ShaderKind::Lines => &mut self.lines_shader,
        }
    }
}

impl GraphicsContext for GlContext {
    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Vec3) {
        unsafe {
            gl::ClearColor(color.x, color.y, color.z, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        unsafe {
            gl::Viewport(x, y, width as i32, height as i32);
        }
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        let cap = match capability {
            Capability::DepthTest => gl::DEPTH_TEST,
            Capability::CullFace => gl::CULL_FACE,
            Capability::Multisample => gl::MULTISAMPLE,
        };
        unsafe {
            if enabled {
                gl::Enable(cap);
            } else {
                gl::Disable(cap);
            }
        }
    }

    fn line_width(&mut self, width: f32) {
        unsafe {
            gl::LineWidth(width);
        }
    }

    fn use_shader(&mut self, shader: ShaderKind) {
        self.current = shader;
        self.shader().set_used();
    }

    fn uniform_matrix(&mut self, name: &str, value: &Mat4) {
        self.shader().set_uniform_mat4(name, value);
    }

    fn uniform1f(&mut self, name: &str, value: f32) {
        self.shader().set_uniform_1f(name, value);
    }

    fn uniform3f(&mut self, name: &str, value: Vec3) {
        self.shader().set_uniform_3f(name, value);
    }

    fn bind_texture(&mut self, texture: TextureKind) {
        match texture {
            TextureKind::Blocks => self.blocks.bind(),
        }
    }

    fn draw_mesh(&mut self, mesh: &Mesh) {
        unsafe {
            gl::BindVertexArray(mesh.vao());
            gl::DrawArrays(gl::TRIANGLES, 0, mesh.vertex_count());
            gl::BindVertexArray(0);
        }
    }

    fn draw_lines(&mut self, vertices: &[LineVertex]) {
        if vertices.is_empty() {
            return;
        }
        self.lines
            .draw(gl::LINES, bytemuck::cast_slice(vertices), vertices.len());
    }

    fn draw_triangles(&mut self, vertices: &[ChunkVertex]) {
        if vertices.is_empty() {
            return;
        }
        self.triangles
            .draw(gl::TRIANGLES, bytemuck::cast_slice(vertices), vertices.len());
    }
}
