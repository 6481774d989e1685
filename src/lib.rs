pub mod config;
pub mod player;
pub mod render;
pub mod utils;
pub mod world;

// Re-export commonly used types
pub use config::{ConfigError, RenderConfig};
pub use player::{Player, PlayerController};
pub use render::{
    Camera, ChunksRenderer, FrameStats, GraphicsContext, HeadlessContext, MeshCache, WorldRenderer,
};
pub use utils::error::RenderError;
pub use world::{BlockRegistry, Chunk, ChunkCoord, Chunks, Level, WorldError};
