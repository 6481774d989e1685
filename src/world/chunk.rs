use std::sync::atomic::{AtomicBool, Ordering};

use super::chunk_coord::ChunkCoord;

/// Chunk width along X, in blocks.
pub const CHUNK_W: i32 = 16;
/// Chunk height along Y, in blocks. Chunks span the whole world height.
pub const CHUNK_H: i32 = 256;
/// Chunk depth along Z, in blocks.
pub const CHUNK_D: i32 = 16;

/// Render-facing view of a world chunk.
///
/// Voxel payload lives with the storage subsystem; the renderer only needs the
/// grid position and the two readiness flags below. Both flags are atomics so
/// the lighting and editing threads can flip them through a shared `Arc`.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    lighted: AtomicBool,
    modified: AtomicBool,
}

impl Chunk {
    /// New chunks start unlit and flagged as modified so the first mesh
    /// request always builds.
    pub fn new(x: i32, z: i32) -> Self {
        Self {
            coord: ChunkCoord::new(x, z),
            lighted: AtomicBool::new(false),
            modified: AtomicBool::new(true),
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn x(&self) -> i32 {
        self.coord.x()
    }

    pub fn z(&self) -> i32 {
        self.coord.z()
    }

    pub fn is_lighted(&self) -> bool {
        self.lighted.load(Ordering::Acquire)
    }

    pub fn set_lighted(&self, lighted: bool) {
        self.lighted.store(lighted, Ordering::Release);
    }

    pub fn is_modified(&self) -> bool {
        self.modified.load(Ordering::Acquire)
    }

    /// Marks the voxel content as changed since the last mesh build.
    pub fn set_modified(&self) {
        self.modified.store(true, Ordering::Release);
    }

    /// Reads and clears the modified flag in one step.
    pub fn take_modified(&self) -> bool {
        self.modified.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chunk_is_unlit_and_modified() {
        let chunk = Chunk::new(2, -7);
        assert_eq!(chunk.coord(), ChunkCoord::new(2, -7));
        assert!(!chunk.is_lighted());
        assert!(chunk.is_modified());
    }

    #[test]
    fn test_take_modified_clears_flag() {
        let chunk = Chunk::new(0, 0);
        assert!(chunk.take_modified());
        assert!(!chunk.take_modified());

        chunk.set_modified();
        assert!(chunk.is_modified());
        assert!(chunk.take_modified());
    }
}
