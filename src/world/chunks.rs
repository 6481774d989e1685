use std::sync::Arc;

use thiserror::Error;

use super::chunk::Chunk;
use super::chunk_coord::ChunkCoord;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorldError {
    #[error("Chunk ({x}, {z}) lies outside the loaded area")]
    OutOfBounds { x: i32, z: i32 },
}

/// Fixed-capacity grid of loaded chunks centred on the player.
///
/// Slots are addressed linearly (`z * w + x` relative to the grid origin);
/// empty slots are `None`. The grid never grows: moving the loaded area is a
/// [`Chunks::translate`] which hands back whatever fell off the edge.
#[derive(Debug)]
pub struct Chunks {
    slots: Vec<Option<Arc<Chunk>>>,
    w: u32,
    d: u32,
    ox: i32,
    oz: i32,
}

impl Chunks {
    pub fn new(w: u32, d: u32, ox: i32, oz: i32) -> Self {
        Self {
            slots: vec![None; (w * d) as usize],
            w,
            d,
            ox,
            oz,
        }
    }

    /// Number of slots, loaded or not.
    pub fn volume(&self) -> usize {
        self.slots.len()
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn depth(&self) -> u32 {
        self.d
    }

    pub fn origin(&self) -> ChunkCoord {
        ChunkCoord::new(self.ox, self.oz)
    }

    /// Slot contents by linear index. Out-of-range indices read as empty.
    pub fn get(&self, index: usize) -> Option<&Arc<Chunk>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn index_of(&self, coord: ChunkCoord) -> Option<usize> {
        let lx = coord.x() - self.ox;
        let lz = coord.z() - self.oz;
        if lx < 0 || lz < 0 || lx >= self.w as i32 || lz >= self.d as i32 {
            return None;
        }
        Some(lz as usize * self.w as usize + lx as usize)
    }

    pub fn get_at(&self, coord: ChunkCoord) -> Option<&Arc<Chunk>> {
        self.index_of(coord).and_then(|index| self.get(index))
    }

    /// Stores `chunk` in its slot, returning the chunk previously there.
    pub fn put(&mut self, chunk: Arc<Chunk>) -> Result<Option<Arc<Chunk>>, WorldError> {
        let coord = chunk.coord();
        let index = self.index_of(coord).ok_or(WorldError::OutOfBounds {
            x: coord.x(),
            z: coord.z(),
        })?;
        Ok(self.slots[index].replace(chunk))
    }

    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        let index = self.index_of(coord)?;
        self.slots[index].take()
    }

    /// Shifts the grid origin by `(dx, dz)` and returns the chunks that no
    /// longer fit.
    pub fn translate(&mut self, dx: i32, dz: i32) -> Vec<Arc<Chunk>> {
        if dx == 0 && dz == 0 {
            return Vec::new();
        }

        let old = std::mem::replace(&mut self.slots, vec![None; (self.w * self.d) as usize]);
        self.ox += dx;
        self.oz += dz;

        let mut evicted = Vec::new();
        for chunk in old.into_iter().flatten() {
            match self.index_of(chunk.coord()) {
                Some(index) => self.slots[index] = Some(chunk),
                None => evicted.push(chunk),
            }
        }
        evicted
    }

    /// Loaded chunks in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Chunk>> {
        self.slots.iter().flatten()
    }

    pub fn loaded(&self) -> usize {
        self.iter().count()
    }
}
