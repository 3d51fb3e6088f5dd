use crate::emitter::EmitterHandle;
use crate::geometry::{Aabb, ModelTransform, Vec3};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// A piece of geometry owned by a `CollidableObject`, in the object's local frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub bounds: Aabb,
}

// Something particles and pick rays can hit. Mirrors a scene-graph node: an
// optional mesh of its own plus child meshes. Loaded models are groups, so
// their geometry lives entirely in `children`.
#[derive(Debug, Clone)]
pub struct CollidableObject {
    pub id: ObjectId,
    pub name: String,
    pub transform: ModelTransform,
    pub mesh: Option<Aabb>,
    pub children: Vec<Mesh>,
}

impl CollidableObject {
    pub fn solid(id: ObjectId, name: &str, transform: ModelTransform, bounds: Aabb) -> Self {
        CollidableObject {
            id,
            name: name.to_string(),
            transform,
            mesh: Some(bounds),
            children: vec![],
        }
    }

    pub fn group(id: ObjectId, name: &str, transform: ModelTransform, children: Vec<Mesh>) -> Self {
        CollidableObject {
            id,
            name: name.to_string(),
            transform,
            mesh: None,
            children,
        }
    }

    // Union of own and child geometry, local frame.
    pub fn local_bounds(&self) -> Option<Aabb> {
        self.mesh
            .iter()
            .chain(self.children.iter().map(|m| &m.bounds))
            .fold(None, |acc: Option<Aabb>, b| match acc {
                Some(acc) => Some(acc.union(b)),
                None => Some(*b),
            })
    }
}

impl EmitterHandle for CollidableObject {
    fn local_to_world(&self, p: Vec3) -> Vec3 {
        self.transform.local_to_world(p)
    }

    fn direction_to_world(&self, v: Vec3) -> Vec3 {
        self.transform.direction_to_world(v)
    }
}

// The collidable world: tracked models, a floor and the walls of the room.
#[derive(Debug, Clone)]
pub struct GeometryRegistry {
    models: Vec<CollidableObject>,
    floor: CollidableObject,
    walls: Vec<CollidableObject>,
}

impl GeometryRegistry {
    pub fn new(floor: CollidableObject, walls: Vec<CollidableObject>) -> Self {
        GeometryRegistry {
            models: vec![],
            floor,
            walls,
        }
    }

    pub fn models(&self) -> &[CollidableObject] {
        &self.models
    }

    pub fn floor(&self) -> &CollidableObject {
        &self.floor
    }

    pub fn walls(&self) -> &[CollidableObject] {
        &self.walls
    }

    pub fn track(&mut self, model: CollidableObject) {
        self.models.push(model);
    }

    pub fn untrack(&mut self, id: ObjectId) -> Option<CollidableObject> {
        let index = self.models.iter().position(|m| m.id == id)?;
        Some(self.models.remove(index))
    }

    pub fn model(&self, id: ObjectId) -> Option<&CollidableObject> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn model_mut(&mut self, id: ObjectId) -> Option<&mut CollidableObject> {
        self.models.iter_mut().find(|m| m.id == id)
    }

    pub fn emitter(&self, id: ObjectId) -> Option<&dyn EmitterHandle> {
        self.model(id).map(|m| m as &dyn EmitterHandle)
    }

    // Everything a particle of `emitter` may collide with, in query order:
    // the other models, then the floor, then the walls.
    pub fn candidates_excluding(&self, emitter: ObjectId) -> Vec<&CollidableObject> {
        self.models
            .iter()
            .filter(|m| m.id != emitter)
            .chain(std::iter::once(&self.floor))
            .chain(self.walls.iter())
            .collect()
    }
}
