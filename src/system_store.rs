use crate::emitter::EmitterClass;
use crate::geometry_registry::ObjectId;
use crate::particle_system::{ParticleSystem, SystemId};

// Live systems of one class, in creation order. Not deduplicated by emitter.
#[derive(Debug, Clone)]
pub struct ParticleSystemStore {
    class: EmitterClass,
    systems: Vec<ParticleSystem>,
}

impl ParticleSystemStore {
    pub fn new(class: EmitterClass) -> Self {
        ParticleSystemStore {
            class,
            systems: vec![],
        }
    }

    pub fn class(&self) -> EmitterClass {
        self.class
    }

    pub fn register(&mut self, system: ParticleSystem) {
        debug_assert_eq!(system.class, self.class);
        self.systems.push(system);
    }

    // Drops every system attached to `emitter`, returning how many there were.
    pub fn remove_emitter(&mut self, emitter: ObjectId) -> usize {
        let before = self.systems.len();
        self.systems.retain(|s| s.emitter != emitter);
        before - self.systems.len()
    }

    pub fn get(&self, id: SystemId) -> Option<&ParticleSystem> {
        self.systems.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: SystemId) -> Option<&mut ParticleSystem> {
        self.systems.iter_mut().find(|s| s.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParticleSystem> {
        self.systems.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ParticleSystem> {
        self.systems.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn num_particles(&self) -> usize {
        self.systems.iter().map(|s| s.field.len()).sum()
    }
}
