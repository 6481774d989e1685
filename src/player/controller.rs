use glam::IVec3;

use crate::world::block::BlockId;

/// Block targeted by the player's crosshair, refreshed by the input code
/// every frame.
#[derive(Debug, Clone, Default)]
pub struct PlayerController {
    /// `None` when nothing is in reach.
    pub selected_block: Option<BlockId>,
    /// World position of the targeted block's minimum corner.
    pub selected_position: IVec3,
}

impl PlayerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, block: BlockId, position: IVec3) {
        self.selected_block = Some(block);
        self.selected_position = position;
    }

    pub fn clear_selection(&mut self) {
        self.selected_block = None;
    }

    pub fn selection(&self) -> Option<(BlockId, IVec3)> {
        self.selected_block.map(|id| (id, self.selected_position))
    }
}
