use crate::world::block::BlockId;

/// Per-player flags the renderer reads each frame.
#[derive(Debug, Clone)]
pub struct Player {
    /// Block in hand. Its emission tints the held-torch light.
    pub chosen_block: BlockId,
    /// Draws the camera axis gizmo when set.
    pub debug: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            chosen_block: BlockId(1),
            debug: false,
        }
    }
}
