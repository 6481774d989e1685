use glam::Vec3;

use crate::config::RenderConfig;
use crate::world::chunk::{CHUNK_H, CHUNK_W};
use crate::world::chunk_coord::ChunkCoord;

/// Cheap per-chunk rejection of chunks that are both far away and behind
/// the viewer.
///
/// This is not a frustum test: anything in front of the camera is kept even
/// when it is well outside the side planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkCulling {
    /// Horizontal radius, in world units, inside which nothing is culled.
    near_radius: f32,
    /// Fraction of chunk height the probe point is lifted along the view.
    probe_factor: f32,
}

impl ChunkCulling {
    pub fn new(near_radius_chunks: f32, probe_factor: f32) -> Self {
        Self {
            near_radius: near_radius_chunks * CHUNK_W as f32,
            probe_factor,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.near_radius_chunks, config.vertical_probe_factor)
    }

    pub fn near_radius(&self) -> f32 {
        self.near_radius
    }

    /// Vector from the camera to the point of `coord` the test looks at:
    /// the chunk's horizontal centre, at the camera height nudged along the
    /// view direction and clamped into the world.
    pub fn probe(&self, coord: ChunkCoord, camera_position: Vec3, camera_front: Vec3) -> Vec3 {
        let height = CHUNK_H as f32;
        let y = (camera_position.y + camera_front.y * height * self.probe_factor).clamp(0.0, height);
        let center = coord.to_world_center();
        Vec3::new(center.x, y, center.z) - camera_position
    }

    /// Whether the chunk can be skipped this frame. Always `false` when
    /// `occlusion` is off.
    pub fn should_skip(
        &self,
        coord: ChunkCoord,
        camera_position: Vec3,
        camera_front: Vec3,
        occlusion: bool,
    ) -> bool {
        if !occlusion {
            return false;
        }

        let v = self.probe(coord, camera_position, camera_front);
        let horizontal_sq = v.x * v.x + v.z * v.z;
        horizontal_sq > self.near_radius * self.near_radius && camera_front.dot(v) < 0.0
    }
}

impl Default for ChunkCulling {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}
