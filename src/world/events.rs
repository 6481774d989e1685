use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use super::chunk::Chunk;

#[derive(Debug, Clone)]
pub enum LevelEvent {
    /// A chunk entered the loaded area.
    ChunkShown(Arc<Chunk>),
    /// A chunk left the loaded area; anything cached for it should go.
    ChunkHidden(Arc<Chunk>),
}

/// Fan-out of level notifications to any number of listeners.
///
/// Each listener owns a receiving end and drains it on its own schedule;
/// listeners that dropped their receiver are pruned on the next emit.
#[derive(Debug, Default)]
pub struct LevelEvents {
    listeners: Mutex<Vec<Sender<LevelEvent>>>,
}

impl LevelEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<LevelEvent> {
        let (sender, receiver) = unbounded();
        self.listeners.lock().push(sender);
        receiver
    }

    pub fn emit(&self, event: LevelEvent) {
        self.listeners
            .lock()
            .retain(|listener| listener.send(event.clone()).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}
