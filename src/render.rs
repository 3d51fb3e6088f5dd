use crate::particle_system::SystemId;
use std::collections::BTreeSet;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BufferKind {
    Position,
    Color,
    Age,
}

// Receives "buffer changed" notifications. The renderer must see the latest
// buffer contents before its next draw of a system it was notified about.
pub trait RenderSink {
    fn mark_modified(&mut self, system: SystemId, buffer: BufferKind);
}

// Collects modified buffers between two uploads.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    modified: BTreeSet<(SystemId, BufferKind)>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        DirtyTracker::default()
    }

    pub fn is_modified(&self, system: SystemId, buffer: BufferKind) -> bool {
        self.modified.contains(&(system, buffer))
    }

    pub fn len(&self) -> usize {
        self.modified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modified.is_empty()
    }

    // Hands the pending uploads to the renderer.
    pub fn take_modified(&mut self) -> Vec<(SystemId, BufferKind)> {
        std::mem::take(&mut self.modified).into_iter().collect()
    }
}

impl RenderSink for DirtyTracker {
    fn mark_modified(&mut self, system: SystemId, buffer: BufferKind) {
        self.modified.insert((system, buffer));
    }
}
