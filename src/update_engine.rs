use crate::collision::CollisionProbe;
use crate::emitter::{EmitterClass, EmitterHandle};
use crate::fps_estimator::duration_to_ticks;
use crate::geometry::{Ray, Vec3};
use crate::geometry_registry::{CollidableObject, GeometryRegistry};
use crate::particle_system::ParticleField;
use crate::render::{BufferKind, RenderSink};
use crate::respawn_policy::RespawnPolicy;
use crate::sim_params::{ClassParams, CollisionParams};
use crate::system_store::ParticleSystemStore;
use cgmath::{ElementWise, Zero};
use log::{trace, warn};
use rand::Rng;

// What happened during one `update`, summed over all systems of the class.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateStats {
    pub systems: usize,
    pub particles: usize,
    pub expired: usize,
    pub delayed_respawns: usize,
    pub probes: usize,
    pub collisions: usize,
}

impl std::ops::AddAssign for UpdateStats {
    fn add_assign(&mut self, other: UpdateStats) {
        self.systems += other.systems;
        self.particles += other.particles;
        self.expired += other.expired;
        self.delayed_respawns += other.delayed_respawns;
        self.probes += other.probes;
        self.collisions += other.collisions;
    }
}

/// Advances every particle of one emitter class by one tick.
///
/// Per slot: fire a due delayed respawn, age (respawning on expiry), integrate,
/// apply turbulence, then cast a ray along the velocity and freeze the particle
/// if it is about to touch geometry. A slot respawned this tick is not also
/// integrated. Particles of the other class are not collided with.
pub struct ParticleUpdateEngine {
    class: EmitterClass,
    params: ClassParams,
    collision: CollisionParams,
    respawn_delay_ticks: Option<u64>,
    tick: u64,
}

impl ParticleUpdateEngine {
    pub fn new(
        class: EmitterClass,
        params: ClassParams,
        collision: CollisionParams,
        tick_rate: f64,
    ) -> Self {
        let respawn_delay_ticks = params
            .collision_respawn_delay_ms
            .map(|ms| duration_to_ticks(std::time::Duration::from_millis(ms), tick_rate));
        ParticleUpdateEngine {
            class,
            params,
            collision,
            respawn_delay_ticks,
            tick: 0,
        }
    }

    // Number of completed updates.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn respawn_delay_ticks(&self) -> Option<u64> {
        self.respawn_delay_ticks
    }

    pub fn update<P, S, R>(
        &mut self,
        store: &mut ParticleSystemStore,
        registry: &GeometryRegistry,
        probe: &P,
        sink: &mut S,
        rng: &mut R,
    ) -> UpdateStats
    where
        P: CollisionProbe + ?Sized,
        S: RenderSink + ?Sized,
        R: Rng + ?Sized,
    {
        self.tick += 1;
        let mut stats = UpdateStats::default();
        for system in store.iter_mut() {
            let emitter = match registry.emitter(system.emitter) {
                Some(emitter) => emitter,
                None => {
                    warn!(
                        "Skipping {} {}: emitter {} is not in the scene",
                        self.class, system.id, system.emitter
                    );
                    continue;
                }
            };
            let candidates = registry.candidates_excluding(system.emitter);
            stats.systems += 1;
            stats.particles += system.field.len();
            for slot in 0..system.field.len() {
                self.step_slot(
                    slot,
                    &mut system.field,
                    emitter,
                    &candidates,
                    probe,
                    rng,
                    &mut stats,
                );
            }
            sink.mark_modified(system.id, BufferKind::Position);
            sink.mark_modified(system.id, BufferKind::Color);
            sink.mark_modified(system.id, BufferKind::Age);
        }
        trace!("{} tick {}: {:?}", self.class, self.tick, stats);
        stats
    }

    #[allow(clippy::too_many_arguments)]
    fn step_slot<P, R>(
        &self,
        slot: usize,
        field: &mut ParticleField,
        emitter: &dyn EmitterHandle,
        candidates: &[&CollidableObject],
        probe: &P,
        rng: &mut R,
        stats: &mut UpdateStats,
    ) where
        P: CollisionProbe + ?Sized,
        R: Rng + ?Sized,
    {
        let pending = &mut field.pending_respawn[slot];
        let due = pending.iter().take_while(|deadline| **deadline <= self.tick).count();
        if due > 0 {
            pending.drain(..due);
            self.class.respawn(slot, field, rng);
            stats.delayed_respawns += 1;
            return;
        }

        field.ages[slot] += 1.0;
        if field.ages[slot] >= field.max_ages[slot] {
            self.class.respawn(slot, field, rng);
            stats.expired += 1;
            return;
        }

        let acceleration = Vec3::from(self.params.acceleration);
        let velocity = field.velocity(slot);
        let position = field.position(slot) + velocity.mul_element_wise(acceleration);
        field.set_position(slot, position);

        let velocity = self.perturb(velocity, rng);
        field.set_velocity(slot, velocity);

        let world_position = emitter.local_to_world(position);
        let world_velocity = emitter.direction_to_world(velocity);
        let ray = match Ray::along(world_position, world_velocity) {
            Some(ray) => ray,
            // Frozen particles have nowhere to look.
            None => return,
        };
        stats.probes += 1;
        let hits = probe.intersect(
            ray.origin,
            ray.direction,
            candidates,
            self.params.include_descendants,
        );
        let collided = hits
            .first()
            .map_or(false, |hit| hit.distance < self.collision.distance_threshold);
        if collided {
            field.set_color(slot, self.collision.impact_color);
            field.set_velocity(slot, Vec3::zero());
            stats.collisions += 1;
            // Every collision gets its own deadline. Ticks only grow, so the list stays sorted.
            if let Some(delay) = self.respawn_delay_ticks {
                field.pending_respawn[slot].push(self.tick + delay);
            }
        }
    }

    fn perturb<R: Rng + ?Sized>(&self, velocity: Vec3, rng: &mut R) -> Vec3 {
        let spans = self.params.turbulence;
        if spans.iter().all(|span| *span == 0.0) {
            return velocity;
        }
        velocity
            + Vec3::new(
                (rng.gen::<f32>() - 0.5) * spans[0],
                (rng.gen::<f32>() - 0.5) * spans[1],
                (rng.gen::<f32>() - 0.5) * spans[2],
            )
    }
}
