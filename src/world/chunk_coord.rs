use glam::{IVec2, Vec2, Vec3};
use std::cmp::Ordering;

use super::chunk::{CHUNK_D, CHUNK_W};

/// Horizontal grid position of a chunk. Chunks are full world height, so
/// only `x` and `z` are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord(pub IVec2);

impl PartialOrd for ChunkCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChunkCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.0.x.cmp(&other.0.x) {
            Ordering::Equal => self.0.y.cmp(&other.0.y),
            ord => ord,
        }
    }
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self(IVec2::new(x, z))
    }

    /// Grid cell containing a world-space position.
    pub fn from_world(position: Vec3) -> Self {
        let x = (position.x / CHUNK_W as f32).floor() as i32;
        let z = (position.z / CHUNK_D as f32).floor() as i32;
        Self::new(x, z)
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn z(&self) -> i32 {
        self.0.y
    }

    /// Centre of the cell in grid units.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.0.x as f32 + 0.5, self.0.y as f32 + 0.5)
    }

    /// Horizontal centre of the cell in world units, at height zero.
    pub fn to_world_center(&self) -> Vec3 {
        let center = self.center();
        Vec3::new(center.x * CHUNK_W as f32, 0.0, center.y * CHUNK_D as f32)
    }
}

impl From<IVec2> for ChunkCoord {
    fn from(vec: IVec2) -> Self {
        Self(vec)
    }
}

impl From<ChunkCoord> for IVec2 {
    fn from(coord: ChunkCoord) -> Self {
        coord.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_world_floors_negative_positions() {
        assert_eq!(ChunkCoord::from_world(Vec3::new(35.0, 60.0, -12.0)), ChunkCoord::new(2, -1));
        assert_eq!(ChunkCoord::from_world(Vec3::new(-0.5, 0.0, 15.9)), ChunkCoord::new(-1, 0));
    }

    #[test]
    fn test_center_is_offset_by_half_a_cell() {
        let coord = ChunkCoord::new(-3, 4);
        assert_eq!(coord.center(), Vec2::new(-2.5, 4.5));
        assert_eq!(coord.to_world_center(), Vec3::new(-40.0, 0.0, 72.0));
    }

    #[test]
    fn test_ordering_is_x_then_z() {
        let mut coords = vec![
            ChunkCoord::new(1, 0),
            ChunkCoord::new(0, 5),
            ChunkCoord::new(0, -2),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![ChunkCoord::new(0, -2), ChunkCoord::new(0, 5), ChunkCoord::new(1, 0)]
        );
    }
}
