use glam::{Vec2, Vec3};

use crate::world::chunk::{CHUNK_D, CHUNK_W};
use crate::world::chunk_coord::ChunkCoord;
use crate::world::chunks::Chunks;

/// A loaded chunk slot picked up for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub index: usize,
    pub coord: ChunkCoord,
}

/// Every occupied slot, in slot order.
pub fn gather_candidates(chunks: &Chunks) -> Vec<Candidate> {
    (0..chunks.volume())
        .filter_map(|index| {
            chunks.get(index).map(|chunk| Candidate {
                index,
                coord: chunk.coord(),
            })
        })
        .collect()
}

/// Camera position projected onto the horizontal chunk grid.
pub fn camera_grid_position(position: Vec3) -> Vec2 {
    Vec2::new(position.x / CHUNK_W as f32, position.z / CHUNK_D as f32)
}

/// Squared horizontal distance from the chunk centre to `camera`, in grid
/// units. Height plays no part: chunks span the full world height.
pub fn horizontal_distance_sq(coord: ChunkCoord, camera: Vec2) -> f32 {
    (coord.center() - camera).length_squared()
}

/// Sorts candidates farthest first so translucent faces blend back to front.
///
/// The sort is stable, so chunks at exactly equal distance keep the order
/// they were gathered in.
pub fn order_back_to_front(candidates: Vec<Candidate>, camera: Vec2) -> Vec<Candidate> {
    let mut keyed: Vec<(f32, Candidate)> = candidates
        .into_iter()
        .map(|candidate| (horizontal_distance_sq(candidate.coord, camera), candidate))
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed.into_iter().map(|(_, candidate)| candidate).collect()
}
