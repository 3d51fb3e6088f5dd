use crate::geometry::Vec3;
use serde::{Deserialize, Serialize};

// Coordinate frame a particle system is attached to. Particle buffers are kept
// in the emitter's local space and only mapped to world space for collision queries.
pub trait EmitterHandle {
    fn local_to_world(&self, p: Vec3) -> Vec3;
    // Maps a local displacement: rotation and scale, no translation.
    fn direction_to_world(&self, v: Vec3) -> Vec3;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmitterClass {
    // Cold airflow blown out of a cooler.
    Cooler,
    // Hot exhaust leaving the back of a rack.
    Rack,
}

impl EmitterClass {
    pub fn name(&self) -> &'static str {
        match self {
            EmitterClass::Cooler => "cooler",
            EmitterClass::Rack => "rack",
        }
    }
}

impl std::fmt::Display for EmitterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
