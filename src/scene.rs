use crate::collision::CollisionProbe;
use crate::emitter::EmitterClass;
use crate::geometry::{Aabb, ModelTransform, Ray, Vec3};
use crate::geometry_registry::{CollidableObject, GeometryRegistry, Mesh, ObjectId};
use crate::particle_world::{ParticleWorld, WorldStats};
use crate::render::RenderSink;
use crate::sim_params::{ModelCatalog, ModelSpec, RoomParams, SimParams};
use cgmath::Rad;
use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    Chair,
    Cooler,
    Table,
    Rack,
}

impl ModelKind {
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Chair => "chair",
            ModelKind::Cooler => "cooler",
            ModelKind::Table => "table",
            ModelKind::Rack => "rack",
        }
    }

    // Kinds that come with a particle effect.
    pub fn emitter_class(&self) -> Option<EmitterClass> {
        match self {
            ModelKind::Cooler => Some(EmitterClass::Cooler),
            ModelKind::Rack => Some(EmitterClass::Rack),
            ModelKind::Chair | ModelKind::Table => None,
        }
    }
}

impl std::str::FromStr for ModelKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chair" => Ok(ModelKind::Chair),
            "cooler" => Ok(ModelKind::Cooler),
            "table" => Ok(ModelKind::Table),
            "rack" => Ok(ModelKind::Rack),
            _ => Err(anyhow::anyhow!("Unknown model kind: {}", s)),
        }
    }
}

impl ModelCatalog {
    pub fn spec(&self, kind: ModelKind) -> &ModelSpec {
        match kind {
            ModelKind::Chair => &self.chair,
            ModelKind::Cooler => &self.cooler,
            ModelKind::Table => &self.table,
            ModelKind::Rack => &self.rack,
        }
    }
}

// The floor: a square slab whose top face is y = 0.
pub fn build_floor(id: ObjectId, room: &RoomParams) -> CollidableObject {
    let h = room.floor_half_extent;
    CollidableObject::solid(
        id,
        "floor",
        ModelTransform::default(),
        Aabb::from_corners([-h, -room.floor_thickness, -h], [h, 0.0, h]),
    )
}

// Extrudes each segment of the floor plan paths into a wall standing on the floor.
pub fn build_walls(first_id: u32, room: &RoomParams) -> Vec<CollidableObject> {
    let mut walls = vec![];
    for path in &room.walls {
        for segment in path.points.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            let (dx, dz) = (b[0] - a[0], b[1] - a[1]);
            let length = (dx * dx + dz * dz).sqrt();
            if length <= 0.0 {
                continue;
            }
            let half_length = length / 2.0;
            let half_thickness = room.wall_thickness / 2.0;
            // Local +x runs along the segment.
            let transform = ModelTransform {
                position: Vec3::new((a[0] + b[0]) / 2.0, 0.0, (a[1] + b[1]) / 2.0),
                rotation_y: Rad((-dz).atan2(dx)),
                scale: Vec3::new(1.0, 1.0, 1.0),
            };
            let id = ObjectId(first_id + walls.len() as u32);
            walls.push(CollidableObject::solid(
                id,
                "wall",
                transform,
                Aabb::from_corners(
                    [-half_length, 0.0, -half_thickness],
                    [half_length, room.wall_height, half_thickness],
                ),
            ));
        }
    }
    walls
}

// The editable room: tracked models on a floor inside walls, plus the particle
// effects of the cooler and rack models.
pub struct SceneEditor {
    registry: GeometryRegistry,
    world: ParticleWorld,
    catalog: ModelCatalog,
    kinds: Vec<(ObjectId, ModelKind)>,
    next_id: u32,
}

impl SceneEditor {
    pub fn new(params: &SimParams) -> Self {
        let floor = build_floor(ObjectId(0), &params.room);
        let walls = build_walls(1, &params.room);
        let next_id = 1 + walls.len() as u32;
        info!("Room with {} walls", walls.len());
        SceneEditor {
            registry: GeometryRegistry::new(floor, walls),
            world: ParticleWorld::new(params),
            catalog: params.catalog.clone(),
            kinds: vec![],
            next_id,
        }
    }

    pub fn registry(&self) -> &GeometryRegistry {
        &self.registry
    }

    pub fn world(&self) -> &ParticleWorld {
        &self.world
    }

    pub fn kind(&self, id: ObjectId) -> Option<ModelKind> {
        self.kinds.iter().find(|(k, _)| *k == id).map(|(_, kind)| *kind)
    }

    // Places a model of `kind` at `position` and starts its particle effect, if any.
    pub fn add_object<R: Rng + ?Sized>(
        &mut self,
        kind: ModelKind,
        position: Vec3,
        rng: &mut R,
    ) -> ObjectId {
        let spec = self.catalog.spec(kind);
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let children: Vec<Mesh> = spec
            .meshes
            .iter()
            .map(|m| Mesh {
                name: m.name.clone(),
                bounds: Aabb::from_corners(m.min, m.max),
            })
            .collect();
        let mut transform = ModelTransform::at(position);
        transform.scale = spec.scale.into();
        let mut object = CollidableObject::group(id, kind.name(), transform, children);
        if spec.lift_to_floor {
            if let Some(bounds) = object.local_bounds() {
                object.transform.position.y += bounds.size().y * transform.scale.y / 2.0;
            }
        }
        info!(
            "Adding {} {} at {:?}",
            kind.name(),
            id,
            object.transform.position
        );
        self.registry.track(object);
        self.kinds.push((id, kind));
        if let Some(class) = kind.emitter_class() {
            self.world.create_particles(class, id, rng);
        }
        id
    }

    // Drag: particles follow since they live in the model's frame.
    pub fn move_object(&mut self, id: ObjectId, position: Vec3) -> bool {
        match self.registry.model_mut(id) {
            Some(model) => {
                model.transform.position = position;
                true
            }
            None => {
                warn!("Can't move {}: not in the scene", id);
                false
            }
        }
    }

    // The model under `ray`, nearest first, testing model meshes.
    pub fn pick<P: CollisionProbe + ?Sized>(&self, ray: &Ray, probe: &P) -> Option<ObjectId> {
        let models: Vec<&CollidableObject> = self.registry.models().iter().collect();
        let hits = probe.intersect(ray.origin, ray.direction, &models, true);
        hits.first().map(|hit| hit.object)
    }

    // Removes the model and every particle system it emits.
    pub fn delete_object(&mut self, id: ObjectId) -> bool {
        if self.registry.untrack(id).is_none() {
            warn!("Can't delete {}: not in the scene", id);
            return false;
        }
        self.kinds.retain(|(k, _)| *k != id);
        let removed = self.world.remove_emitter(id);
        info!("Deleted {} ({} particle systems)", id, removed);
        true
    }

    pub fn delete_at<P: CollisionProbe + ?Sized>(
        &mut self,
        ray: &Ray,
        probe: &P,
    ) -> Option<ObjectId> {
        let id = self.pick(ray, probe)?;
        if self.delete_object(id) {
            Some(id)
        } else {
            None
        }
    }

    pub fn update<P, S, R>(&mut self, probe: &P, sink: &mut S, rng: &mut R) -> WorldStats
    where
        P: CollisionProbe + ?Sized,
        S: RenderSink + ?Sized,
        R: Rng + ?Sized,
    {
        self.world.update(&self.registry, probe, sink, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::RaycastProbe;
    use crate::render::DirtyTracker;
    use cgmath::InnerSpace;
    use rand::SeedableRng;

    fn editor() -> SceneEditor {
        SceneEditor::new(&SimParams::default())
    }

    #[test]
    fn square_room_has_four_walls() {
        let editor = editor();
        assert_eq!(editor.registry().walls().len(), 4);
        let probe = RaycastProbe::default();
        // From the middle of the room, every horizontal direction meets a wall 4.9 away.
        for direction in &[
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
        ] {
            let walls: Vec<&CollidableObject> = editor.registry().walls().iter().collect();
            let hits = probe.intersect(Vec3::new(0.0, 1.0, 0.0), *direction, &walls, false);
            assert!(!hits.is_empty(), "{:?}", direction);
            assert!((hits[0].distance - 4.9).abs() < 1e-4, "{:?}", hits[0]);
        }
    }

    #[test]
    fn floor_top_is_at_zero() {
        let editor = editor();
        let probe = RaycastProbe::default();
        let floor = editor.registry().floor();
        let hits = probe.intersect(
            Vec3::new(1.0, 2.0, 1.0),
            Vec3::new(0.0, -1.0, 0.0),
            &[floor],
            false,
        );
        assert!((hits[0].distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn emitters_get_particles() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let mut editor = editor();
        editor.add_object(ModelKind::Chair, Vec3::new(1.0, 0.0, 1.0), &mut rng);
        let cooler = editor.add_object(ModelKind::Cooler, Vec3::new(-3.0, 0.0, 0.0), &mut rng);
        let rack = editor.add_object(ModelKind::Rack, Vec3::new(3.0, 0.0, 0.0), &mut rng);
        let world = editor.world();
        assert_eq!(world.store(EmitterClass::Cooler).len(), 1);
        assert_eq!(world.store(EmitterClass::Rack).len(), 1);
        assert_eq!(world.store(EmitterClass::Cooler).iter().next().unwrap().emitter, cooler);
        assert_eq!(world.store(EmitterClass::Rack).iter().next().unwrap().emitter, rack);
        assert_eq!(editor.kind(rack), Some(ModelKind::Rack));
    }

    #[test]
    fn rack_is_lifted_onto_the_floor() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let mut editor = editor();
        let rack = editor.add_object(ModelKind::Rack, Vec3::new(0.0, 0.0, 0.0), &mut rng);
        let model = editor.registry().model(rack).unwrap();
        // 2.0 units tall, scaled by 1.1.
        assert!((model.transform.position.y - 1.1).abs() < 1e-5);
    }

    #[test]
    fn pick_and_delete_removes_particles() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let mut editor = editor();
        let probe = RaycastProbe::default();
        let rack = editor.add_object(ModelKind::Rack, Vec3::new(2.0, 0.0, 0.0), &mut rng);
        editor.add_object(ModelKind::Cooler, Vec3::new(-2.0, 0.0, 0.0), &mut rng);

        let ray = Ray::new(Vec3::new(2.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(editor.pick(&ray, &probe), Some(rack));
        assert_eq!(editor.delete_at(&ray, &probe), Some(rack));
        assert!(editor.registry().model(rack).is_none());
        assert!(editor.world().store(EmitterClass::Rack).is_empty());
        assert_eq!(editor.world().store(EmitterClass::Cooler).len(), 1);
        assert_eq!(editor.delete_at(&ray, &probe), None);
        assert!(!editor.delete_object(rack));
    }

    #[test]
    fn moved_emitter_carries_its_particles() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let mut editor = editor();
        let cooler = editor.add_object(ModelKind::Cooler, Vec3::new(0.0, 0.0, 0.0), &mut rng);
        assert!(editor.move_object(cooler, Vec3::new(1.0, 0.0, 2.0)));
        let model = editor.registry().model(cooler).unwrap();
        let system = editor.world().store(EmitterClass::Cooler).iter().next().unwrap();
        let local = system.field.position(0);
        let world = crate::emitter::EmitterHandle::local_to_world(model, local);
        let expected = Vec3::new(1.0, 0.0, 2.0) + local * 0.01;
        assert!((world - expected).magnitude() < 1e-5);
        assert!(!editor.move_object(ObjectId(1000), Vec3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn cooler_airflow_reaches_the_floor() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(4);
        let mut editor = editor();
        editor.add_object(ModelKind::Cooler, Vec3::new(-4.0, 0.0, 0.0), &mut rng);
        let probe = RaycastProbe::default();
        let mut sink = DirtyTracker::new();
        let mut collisions = 0;
        for _ in 0..200 {
            collisions += editor.update(&probe, &mut sink, &mut rng).cooler.collisions;
        }
        assert!(collisions > 0);
    }

    #[test]
    fn parse_model_kind() {
        assert_eq!("Cooler".parse::<ModelKind>().unwrap(), ModelKind::Cooler);
        assert_eq!("rack".parse::<ModelKind>().unwrap(), ModelKind::Rack);
        assert!("sofa".parse::<ModelKind>().is_err());
    }
}
