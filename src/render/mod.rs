pub mod batch3d;
pub mod camera;
pub mod chunks_renderer;
pub mod context;
pub mod culling;
pub mod frame;
pub mod gl_context;
pub mod headless;
pub mod line_batch;
pub mod mesh;
pub mod order;
pub mod overlay;
pub mod shaders;
pub mod texture;
pub mod world_renderer;

pub use batch3d::Batch3D;
pub use camera::Camera;
pub use chunks_renderer::{ChunksRenderer, MeshCache};
pub use context::{Capability, ChunkVertex, GraphicsContext, LineVertex, ShaderKind, TextureKind};
pub use culling::ChunkCulling;
pub use frame::{FramePhase, FrameStats};
pub use gl_context::GlContext;
pub use headless::{GfxCommand, HeadlessContext, HeadlessMeshBuilder};
pub use line_batch::LineBatch;
pub use mesh::{ChunkMesher, GlMeshBuilder, Mesh, MeshBuilder};
pub use shaders::{ShaderError, ShaderProgram};
pub use texture::Texture;
pub use world_renderer::WorldRenderer;
