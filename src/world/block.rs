use glam::Vec3;

/// Highest value a single emission channel can carry.
pub const MAX_EMISSION: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);
}

/// How a block is drawn. Also selects the outline shape when the block is
/// targeted by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockModel {
    /// Not drawn at all (air, barriers).
    None,
    /// Full unit cube.
    Block,
    /// Two crossed quads, used by plants.
    XSprite,
}

impl BlockModel {
    /// Decodes the raw model tag stored in block definitions.
    ///
    /// # Panics
    ///
    /// Panics if `raw` is not a known model tag. A bad tag means the block
    /// table is corrupted, which callers must never paper over.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::Block,
            2 => Self::XSprite,
            other => panic!("unknown block model tag {other}"),
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Block => 1,
            Self::XSprite => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub name: String,
    /// Emitted light per RGB channel, `0..=MAX_EMISSION`.
    pub emission: [u8; 3],
    pub model: BlockModel,
}

impl Block {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emission: [0; 3],
            model: BlockModel::Block,
        }
    }

    pub fn with_emission(mut self, r: u8, g: u8, b: u8) -> Self {
        self.emission = [
            r.min(MAX_EMISSION),
            g.min(MAX_EMISSION),
            b.min(MAX_EMISSION),
        ];
        self
    }

    pub fn with_model(mut self, model: BlockModel) -> Self {
        self.model = model;
        self
    }

    /// Emission scaled into `[0, 1]` per channel.
    pub fn emission_color(&self) -> Vec3 {
        Vec3::new(
            self.emission[0] as f32,
            self.emission[1] as f32,
            self.emission[2] as f32,
        ) / MAX_EMISSION as f32
    }
}

/// Dense block table indexed by [`BlockId`].
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    blocks: Vec<Block>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new("air").with_model(BlockModel::None)],
        }
    }

    /// Appends a definition and returns the id it was assigned.
    pub fn register(&mut self, block: Block) -> BlockId {
        let id = BlockId(self.blocks.len() as u16);
        self.blocks.push(block);
        id
    }

    /// # Panics
    ///
    /// Panics on an id that was never registered.
    pub fn get(&self, id: BlockId) -> &Block {
        match self.blocks.get(id.0 as usize) {
            Some(block) => block,
            None => panic!("block id {} is not registered", id.0),
        }
    }

    pub fn try_get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for BlockRegistry {
    /// Minimal palette: air, a couple of solids, a light source and a plant.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Block::new("stone"));
        registry.register(Block::new("grass"));
        registry.register(Block::new("lamp").with_emission(15, 14, 13));
        registry.register(Block::new("glass"));
        registry.register(Block::new("flower").with_model(BlockModel::XSprite));
        registry.register(Block::new("torch").with_emission(13, 13, 10).with_model(BlockModel::XSprite));
        registry
    }
}
