use crate::emitter::EmitterClass;
use crate::geometry::Vec3;
use crate::particle_system::{ParticleField, Rgb};
use rand::Rng;

pub const COOLER_COLOR: Rgb = [0.1, 0.5, 1.0];
pub const RACK_COLOR: Rgb = [1.0, 0.1, 0.1];

// Exhaust leaves the rack much faster than the raw draws below.
const RACK_SPEED_FACTOR: f32 = 2.5;

// Fresh state for one slot. Each call is an independent draw; nothing depends
// on the slot index or on other slots.
pub trait RespawnPolicy {
    fn respawn<R: Rng + ?Sized>(&self, slot: usize, field: &mut ParticleField, rng: &mut R);
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    rng.gen_range(low, high)
}

// Both classes share the lifetime rule. Initial ages are staggered so that a
// freshly created system doesn't expire all at once.
fn respawn_lifetime<R: Rng + ?Sized>(slot: usize, field: &mut ParticleField, rng: &mut R) {
    field.ages[slot] = uniform(rng, 0.0, 1000.0);
    // 1000 + U(0, 500), drawn directly so rounding can't reach 1500.
    field.max_ages[slot] = uniform(rng, 1000.0, 1500.0);
}

#[derive(Debug, Copy, Clone, Default)]
pub struct CoolerPolicy;

impl RespawnPolicy for CoolerPolicy {
    fn respawn<R: Rng + ?Sized>(&self, slot: usize, field: &mut ParticleField, rng: &mut R) {
        // A thin sheet in the y/z plane at the cooler's outlet.
        field.set_position(
            slot,
            Vec3::new(
                0.0,
                uniform(rng, -0.1, 0.1) + 20.0,
                uniform(rng, -20.0, 20.0),
            ),
        );
        // Blown along +x, sinking slowly, with a little sideways drift.
        field.set_velocity(
            slot,
            Vec3::new(
                uniform(rng, 0.0, 2.0),
                -(uniform(rng, 0.0, 0.1) + 0.1),
                uniform(rng, -0.01, 0.01),
            ),
        );
        field.set_color(slot, COOLER_COLOR);
        respawn_lifetime(slot, field, rng);
    }
}

#[derive(Debug, Copy, Clone, Default)]
pub struct RackPolicy;

impl RespawnPolicy for RackPolicy {
    fn respawn<R: Rng + ?Sized>(&self, slot: usize, field: &mut ParticleField, rng: &mut R) {
        // Behind the rack's back panel.
        field.set_position(
            slot,
            Vec3::new(
                uniform(rng, -0.25, 0.25),
                uniform(rng, -1.25, 1.25),
                -(uniform(rng, -0.5, 0.5) + 0.8),
            ),
        );
        // Rising and drifting backwards.
        let velocity = Vec3::new(
            uniform(rng, -0.0005, 0.0005),
            uniform(rng, -0.0005, 0.0005) + 0.001,
            -(uniform(rng, 0.0, 0.001) + 0.001),
        );
        field.set_velocity(slot, velocity * RACK_SPEED_FACTOR);
        field.set_color(slot, RACK_COLOR);
        respawn_lifetime(slot, field, rng);
    }
}

impl RespawnPolicy for EmitterClass {
    fn respawn<R: Rng + ?Sized>(&self, slot: usize, field: &mut ParticleField, rng: &mut R) {
        match self {
            EmitterClass::Cooler => CoolerPolicy.respawn(slot, field, rng),
            EmitterClass::Rack => RackPolicy.respawn(slot, field, rng),
        }
    }
}
