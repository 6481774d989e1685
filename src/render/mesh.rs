use std::mem::size_of;

use super::context::ChunkVertex;
use crate::world::chunk::Chunk;

/// GPU geometry for exactly one chunk.
///
/// Handles are owned by the mesh cache and never cloned; a mesh is freed by
/// handing it back to the [`MeshBuilder`] that produced it.
#[derive(Debug, PartialEq, Eq)]
pub struct Mesh {
    vao: u32,
    vbo: u32,
    vertex_count: i32,
}

impl Mesh {
    pub fn new(vao: u32, vbo: u32, vertex_count: i32) -> Self {
        Self {
            vao,
            vbo,
            vertex_count,
        }
    }

    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn vbo(&self) -> u32 {
        self.vbo
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }

    /// Uploads a triangle list into a fresh VAO/VBO pair.
    ///
    /// Requires a current GL context.
    pub fn upload(vertices: &[ChunkVertex]) -> Self {
        let mut vao = 0;
        let mut vbo = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);
            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            let bytes: &[u8] = bytemuck::cast_slice(vertices);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                bytes.len() as isize,
                bytes.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );
            bind_chunk_vertex_layout();
            gl::BindVertexArray(0);
        }

        Self::new(vao, vbo, vertices.len() as i32)
    }

    /// Frees the GL objects behind this handle.
    pub fn delete(self) {
        unsafe {
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}

/// Attribute pointers for [`ChunkVertex`] on the currently bound VAO/VBO.
///
/// # Safety
///
/// Needs a current GL context with the target buffers bound.
pub(crate) unsafe fn bind_chunk_vertex_layout() {
    let stride = size_of::<ChunkVertex>() as i32;
    let float = size_of::<f32>();

    // Position (location = 0)
    gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, stride, std::ptr::null());
    gl::EnableVertexAttribArray(0);

    // Texture coordinates (location = 1)
    gl::VertexAttribPointer(1, 2, gl::FLOAT, gl::FALSE, stride, (3 * float) as *const _);
    gl::EnableVertexAttribArray(1);

    // Light (location = 2)
    gl::VertexAttribPointer(2, 4, gl::FLOAT, gl::FALSE, stride, (5 * float) as *const _);
    gl::EnableVertexAttribArray(2);
}

/// Turns voxel data into GPU geometry. Meshing itself lives outside this
/// crate; implementations must not block on background work.
pub trait MeshBuilder {
    /// Builds a mesh for `chunk`, or `None` if it cannot be built yet.
    fn build(&mut self, chunk: &Chunk) -> Option<Mesh>;
    fn release(&mut self, mesh: Mesh);
}

/// Produces CPU-side triangles for a chunk.
pub trait ChunkMesher {
    fn mesh(&mut self, chunk: &Chunk) -> Option<Vec<ChunkVertex>>;
}

/// [`MeshBuilder`] that uploads whatever a [`ChunkMesher`] produces.
pub struct GlMeshBuilder<M> {
    mesher: M,
}

impl<M: ChunkMesher> GlMeshBuilder<M> {
    pub fn new(mesher: M) -> Self {
        Self { mesher }
    }
}

impl<M: ChunkMesher> MeshBuilder for GlMeshBuilder<M> {
    fn build(&mut self, chunk: &Chunk) -> Option<Mesh> {
        let vertices = self.mesher.mesh(chunk)?;
        Some(Mesh::upload(&vertices))
    }

    fn release(&mut self, mesh: Mesh) {
        mesh.delete();
    }
}
