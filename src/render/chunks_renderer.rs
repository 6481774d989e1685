use std::collections::HashMap;

use log::debug;

use super::mesh::{Mesh, MeshBuilder};
use crate::world::chunk::Chunk;
use crate::world::chunk_coord::ChunkCoord;

/// Chunk-keyed store of renderable meshes.
pub trait MeshCache {
    /// Mesh for a lighted chunk, built on first request and rebuilt after
    /// the chunk's content changes. `None` means "not ready this frame".
    fn get_or_render(&mut self, chunk: &Chunk) -> Option<&Mesh>;
    /// Drops the cached mesh, if any. Safe to call repeatedly.
    fn unload(&mut self, chunk: &Chunk);
}

/// Long-lived mesh cache; the only owner of chunk meshes.
pub struct ChunksRenderer<B: MeshBuilder> {
    builder: B,
    meshes: HashMap<ChunkCoord, Mesh>,
}

impl<B: MeshBuilder> ChunksRenderer<B> {
    pub fn new(builder: B) -> Self {
        Self {
            builder,
            meshes: HashMap::new(),
        }
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut B {
        &mut self.builder
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.meshes.contains_key(&coord)
    }

    /// Releases every cached mesh.
    pub fn clear(&mut self) {
        for (_, mesh) in self.meshes.drain() {
            self.builder.release(mesh);
        }
    }

    fn render(&mut self, chunk: &Chunk) {
        let coord = chunk.coord();
        let previous = self.meshes.remove(&coord);
        match self.builder.build(chunk) {
            Some(mesh) => {
                debug!("Built mesh for chunk ({}, {})", coord.x(), coord.z());
                self.meshes.insert(coord, mesh);
            }
            None => debug!("Mesh for chunk ({}, {}) not ready", coord.x(), coord.z()),
        }
        if let Some(previous) = previous {
            self.builder.release(previous);
        }
    }
}

impl<B: MeshBuilder> MeshCache for ChunksRenderer<B> {
    fn get_or_render(&mut self, chunk: &Chunk) -> Option<&Mesh> {
        if !chunk.is_lighted() {
            return None;
        }

        let coord = chunk.coord();
        let modified = chunk.take_modified();
        if modified || !self.meshes.contains_key(&coord) {
            self.render(chunk);
        }
        self.meshes.get(&coord)
    }

    fn unload(&mut self, chunk: &Chunk) {
        let coord = chunk.coord();
        if let Some(mesh) = self.meshes.remove(&coord) {
            debug!("Unloaded mesh for chunk ({}, {})", coord.x(), coord.z());
            self.builder.release(mesh);
        }
    }
}

impl<B: MeshBuilder> Drop for ChunksRenderer<B> {
    fn drop(&mut self) {
        self.clear();
    }
}
