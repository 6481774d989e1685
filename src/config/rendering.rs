use serde::{Deserialize, Serialize};

/// Tunables for the world pass. Every field has a default, so a config file
/// only needs to mention what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Clear colour, also used as fog colour.
    pub sky_color: [f32; 3],
    pub gamma: f32,
    pub sky_light_color: [f32; 3],
    pub fog_factor: f32,
    /// Reach of the light cast by the block in the player's hand.
    pub torchlight_distance: f32,
    /// Chunks closer than this many chunk widths are never culled.
    pub near_radius_chunks: f32,
    /// How far along the view direction the culling probe is lifted, as a
    /// fraction of chunk height.
    pub vertical_probe_factor: f32,
    /// Extra Z offset applied to every chunk model matrix.
    pub seam_bias_z: f32,
    pub line_batch_capacity: usize,
    pub batch3d_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sky_color: [0.7, 0.81, 1.0],
            gamma: 1.6,
            sky_light_color: [1.1, 1.1, 1.1],
            fog_factor: 0.025,
            torchlight_distance: 6.0,
            near_radius_chunks: 3.0,
            vertical_probe_factor: 0.5,
            seam_bias_z: 1.0,
            line_batch_capacity: 4096,
            batch3d_capacity: 1024,
        }
    }
}
