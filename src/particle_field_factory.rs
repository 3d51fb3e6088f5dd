use crate::emitter::EmitterClass;
use crate::geometry_registry::ObjectId;
use crate::particle_system::{ParticleField, ParticleSystem, SystemId};
use crate::respawn_policy::RespawnPolicy;
use crate::system_store::ParticleSystemStore;
use rand::Rng;

// Allocates particle buffers for new emitters and hands out system ids.
#[derive(Debug, Default)]
pub struct ParticleFieldFactory {
    next_id: u32,
}

impl ParticleFieldFactory {
    pub fn new() -> Self {
        ParticleFieldFactory::default()
    }

    // Creates a system of `num_particles` slots attached to `emitter`, with
    // every slot initialized by the store's class policy, and registers it.
    pub fn create<R: Rng + ?Sized>(
        &mut self,
        store: &mut ParticleSystemStore,
        emitter: ObjectId,
        num_particles: usize,
        rng: &mut R,
    ) -> SystemId {
        let class = store.class();
        let mut field = ParticleField::zeroed(num_particles);
        for slot in 0..num_particles {
            class.respawn(slot, &mut field, rng);
        }
        let id = SystemId(self.next_id);
        self.next_id += 1;
        log::info!(
            "Created {} {} particles for emitter {} ({})",
            num_particles,
            class,
            emitter,
            id
        );
        store.register(ParticleSystem {
            id,
            class,
            emitter,
            field,
        });
        id
    }
}
