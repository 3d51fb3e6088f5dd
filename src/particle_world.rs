use crate::collision::CollisionProbe;
use crate::emitter::EmitterClass;
use crate::geometry_registry::{GeometryRegistry, ObjectId};
use crate::particle_field_factory::ParticleFieldFactory;
use crate::particle_system::SystemId;
use crate::render::RenderSink;
use crate::sim_params::{ClassParams, SimParams};
use crate::system_store::ParticleSystemStore;
use crate::update_engine::{ParticleUpdateEngine, UpdateStats};
use rand::Rng;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorldStats {
    pub cooler: UpdateStats,
    pub rack: UpdateStats,
}

// Both emitter classes' systems and engines. Cooler-vs-rack collision is not simulated.
pub struct ParticleWorld {
    factory: ParticleFieldFactory,
    coolers: ParticleSystemStore,
    racks: ParticleSystemStore,
    cooler_engine: ParticleUpdateEngine,
    rack_engine: ParticleUpdateEngine,
    cooler_params: ClassParams,
    rack_params: ClassParams,
}

impl ParticleWorld {
    pub fn new(params: &SimParams) -> Self {
        ParticleWorld {
            factory: ParticleFieldFactory::new(),
            coolers: ParticleSystemStore::new(EmitterClass::Cooler),
            racks: ParticleSystemStore::new(EmitterClass::Rack),
            cooler_engine: ParticleUpdateEngine::new(
                EmitterClass::Cooler,
                params.cooler,
                params.collision,
                params.tick_rate,
            ),
            rack_engine: ParticleUpdateEngine::new(
                EmitterClass::Rack,
                params.rack,
                params.collision,
                params.tick_rate,
            ),
            cooler_params: params.cooler,
            rack_params: params.rack,
        }
    }

    pub fn store(&self, class: EmitterClass) -> &ParticleSystemStore {
        match class {
            EmitterClass::Cooler => &self.coolers,
            EmitterClass::Rack => &self.racks,
        }
    }

    pub fn engine(&self, class: EmitterClass) -> &ParticleUpdateEngine {
        match class {
            EmitterClass::Cooler => &self.cooler_engine,
            EmitterClass::Rack => &self.rack_engine,
        }
    }

    // Attaches a new system of the class's configured size to `emitter`.
    pub fn create_particles<R: Rng + ?Sized>(
        &mut self,
        class: EmitterClass,
        emitter: ObjectId,
        rng: &mut R,
    ) -> SystemId {
        let (store, num_particles) = match class {
            EmitterClass::Cooler => (&mut self.coolers, self.cooler_params.particle_count),
            EmitterClass::Rack => (&mut self.racks, self.rack_params.particle_count),
        };
        self.factory.create(store, emitter, num_particles, rng)
    }

    // Drops every system attached to `emitter`, in both classes.
    pub fn remove_emitter(&mut self, emitter: ObjectId) -> usize {
        let removed = self.coolers.remove_emitter(emitter) + self.racks.remove_emitter(emitter);
        if removed > 0 {
            log::info!("Removed {} particle systems of emitter {}", removed, emitter);
        }
        removed
    }

    pub fn num_systems(&self) -> usize {
        self.coolers.len() + self.racks.len()
    }

    // One tick: coolers first, then racks.
    pub fn update<P, S, R>(
        &mut self,
        registry: &GeometryRegistry,
        probe: &P,
        sink: &mut S,
        rng: &mut R,
    ) -> WorldStats
    where
        P: CollisionProbe + ?Sized,
        S: RenderSink + ?Sized,
        R: Rng + ?Sized,
    {
        let cooler = self
            .cooler_engine
            .update(&mut self.coolers, registry, probe, sink, rng);
        let rack = self
            .rack_engine
            .update(&mut self.racks, registry, probe, sink, rng);
        WorldStats { cooler, rack }
    }
}
