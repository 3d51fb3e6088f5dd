use crate::emitter::EmitterClass;
use crate::geometry::Vec3;
use crate::geometry_registry::ObjectId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub u32);

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "system {}", self.0)
    }
}

pub type Rgb = [f32; 3];

// Per-particle state stored as parallel attribute buffers, the layout the
// renderer uploads. Slot `i` owns `positions[3i..3i+3]`, `ages[i]`, and so on.
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub positions: Vec<f32>,
    pub velocities: Vec<f32>,
    pub ages: Vec<f32>,
    pub max_ages: Vec<f32>,
    pub colors: Vec<f32>,
    // Ticks at which delayed respawns fire, ascending. Never cancelled once set.
    pub pending_respawn: Vec<Vec<u64>>,
}

impl ParticleField {
    // Every slot still has to be initialized by a respawn policy before use.
    pub fn zeroed(num_particles: usize) -> Self {
        ParticleField {
            positions: vec![0.0; 3 * num_particles],
            velocities: vec![0.0; 3 * num_particles],
            ages: vec![0.0; num_particles],
            max_ages: vec![0.0; num_particles],
            colors: vec![0.0; 3 * num_particles],
            pending_respawn: vec![vec![]; num_particles],
        }
    }

    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }

    pub fn position(&self, slot: usize) -> Vec3 {
        read_vec3(&self.positions, slot)
    }

    pub fn set_position(&mut self, slot: usize, v: Vec3) {
        write_vec3(&mut self.positions, slot, v)
    }

    pub fn velocity(&self, slot: usize) -> Vec3 {
        read_vec3(&self.velocities, slot)
    }

    pub fn set_velocity(&mut self, slot: usize, v: Vec3) {
        write_vec3(&mut self.velocities, slot, v)
    }

    pub fn color(&self, slot: usize) -> Rgb {
        [
            self.colors[3 * slot],
            self.colors[3 * slot + 1],
            self.colors[3 * slot + 2],
        ]
    }

    pub fn set_color(&mut self, slot: usize, color: Rgb) {
        self.colors[3 * slot..3 * slot + 3].copy_from_slice(&color);
    }
}

fn read_vec3(buffer: &[f32], slot: usize) -> Vec3 {
    Vec3::new(buffer[3 * slot], buffer[3 * slot + 1], buffer[3 * slot + 2])
}

fn write_vec3(buffer: &mut [f32], slot: usize, v: Vec3) {
    buffer[3 * slot] = v.x;
    buffer[3 * slot + 1] = v.y;
    buffer[3 * slot + 2] = v.z;
}

// One point cloud attached to one emitter. The emitter is only referenced by
// id: the system observes its transform but does not own it.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub id: SystemId,
    pub class: EmitterClass,
    pub emitter: ObjectId,
    pub field: ParticleField,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_layout() {
        let mut field = ParticleField::zeroed(4);
        assert_eq!(field.len(), 4);
        assert_eq!(field.positions.len(), 12);
        assert_eq!(field.colors.len(), 12);
        field.set_position(2, Vec3::new(1.0, 2.0, 3.0));
        field.set_color(3, [0.1, 0.5, 1.0]);
        assert_eq!(&field.positions[6..9], &[1.0, 2.0, 3.0]);
        assert_eq!(field.position(2), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(field.color(3), [0.1, 0.5, 1.0]);
        assert_eq!(field.velocity(2), Vec3::new(0.0, 0.0, 0.0));
    }
}
