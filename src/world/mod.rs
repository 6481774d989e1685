pub mod block;
pub mod chunk;
pub mod chunk_coord;
pub mod chunks;
pub mod events;
pub mod level;

// Re-export commonly used types
pub use block::{Block, BlockId, BlockModel, BlockRegistry};
pub use chunk::{Chunk, CHUNK_D, CHUNK_H, CHUNK_W};
pub use chunk_coord::ChunkCoord;
pub use chunks::{Chunks, WorldError};
pub use events::{LevelEvent, LevelEvents};
pub use level::Level;
