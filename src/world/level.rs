use std::sync::Arc;

use parking_lot::RwLock;

use super::block::BlockRegistry;
use super::chunk::Chunk;
use super::chunk_coord::ChunkCoord;
use super::chunks::{Chunks, WorldError};
use super::events::{LevelEvent, LevelEvents};
use crate::player::{Player, PlayerController};

/// Everything the world renderer reads in a frame.
///
/// Chunk storage sits behind a lock. Streaming code may take the write side
/// at any time; the renderer only holds short read guards.
pub struct Level {
    pub chunks: RwLock<Chunks>,
    pub blocks: BlockRegistry,
    pub events: LevelEvents,
    pub player: Player,
    pub player_controller: PlayerController,
}

impl Level {
    pub fn new(chunks: Chunks, blocks: BlockRegistry) -> Self {
        Self {
            chunks: RwLock::new(chunks),
            blocks,
            events: LevelEvents::new(),
            player: Player::default(),
            player_controller: PlayerController::new(),
        }
    }

    /// Puts a chunk into storage, announcing it and hiding whatever occupied
    /// the slot before.
    pub fn show_chunk(&self, chunk: Arc<Chunk>) -> Result<(), WorldError> {
        let previous = self.chunks.write().put(chunk.clone())?;
        if let Some(previous) = previous {
            self.events.emit(LevelEvent::ChunkHidden(previous));
        }
        self.events.emit(LevelEvent::ChunkShown(chunk));
        Ok(())
    }

    pub fn hide_chunk(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        let removed = self.chunks.write().remove(coord)?;
        self.events.emit(LevelEvent::ChunkHidden(removed.clone()));
        Some(removed)
    }

    /// Recentres the loaded area, hiding chunks that fall outside it.
    pub fn translate(&self, dx: i32, dz: i32) -> usize {
        let evicted = self.chunks.write().translate(dx, dz);
        let count = evicted.len();
        for chunk in evicted {
            self.events.emit(LevelEvent::ChunkHidden(chunk));
        }
        count
    }
}
