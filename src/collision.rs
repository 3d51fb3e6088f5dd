use crate::geometry::{Ray, Vec3};
use crate::geometry_registry::{CollidableObject, ObjectId};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hit {
    pub distance: f32,
    pub object: ObjectId,
    // Index into the object's children, or None for the object's own mesh.
    pub child: Option<usize>,
}

// Ray-vs-scene query. No hit is the common case and comes back as an empty vector.
pub trait CollisionProbe {
    // Hits along the ray from `origin` in unit `direction`, nearest first.
    // Child meshes of the candidates are tested only when `include_descendants`.
    fn intersect(
        &self,
        origin: Vec3,
        direction: Vec3,
        candidates: &[&CollidableObject],
        include_descendants: bool,
    ) -> Vec<Hit>;
}

// Tests rays against object boxes in each object's local frame.
#[derive(Debug, Copy, Clone)]
pub struct RaycastProbe {
    pub far: f32,
}

impl Default for RaycastProbe {
    fn default() -> Self {
        RaycastProbe {
            far: f32::INFINITY,
        }
    }
}

impl CollisionProbe for RaycastProbe {
    fn intersect(
        &self,
        origin: Vec3,
        direction: Vec3,
        candidates: &[&CollidableObject],
        include_descendants: bool,
    ) -> Vec<Hit> {
        let world_ray = Ray::new(origin, direction);
        let mut hits = Vec::new();
        for object in candidates {
            let local_ray = match object.transform.world_ray_to_local(&world_ray) {
                Some(ray) => ray,
                // Degenerate (zero-scale) objects can't be hit.
                None => continue,
            };
            if let Some(bounds) = &object.mesh {
                if let Some(distance) = bounds.intersect_ray(&local_ray) {
                    hits.push(Hit {
                        distance,
                        object: object.id,
                        child: None,
                    });
                }
            }
            if include_descendants {
                for (index, child) in object.children.iter().enumerate() {
                    if let Some(distance) = child.bounds.intersect_ray(&local_ray) {
                        hits.push(Hit {
                            distance,
                            object: object.id,
                            child: Some(index),
                        });
                    }
                }
            }
        }
        hits.retain(|hit| hit.distance <= self.far);
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Aabb, ModelTransform};
    use crate::geometry_registry::Mesh;

    fn wall_at(id: u32, x: f32) -> CollidableObject {
        CollidableObject::solid(
            ObjectId(id),
            "wall",
            ModelTransform::at(Vec3::new(x, 0.0, 0.0)),
            Aabb::from_corners([0.0, -5.0, -5.0], [0.2, 5.0, 5.0]),
        )
    }

    fn group_at(id: u32, x: f32) -> CollidableObject {
        CollidableObject::group(
            ObjectId(id),
            "model",
            ModelTransform::at(Vec3::new(x, 0.0, 0.0)),
            vec![Mesh {
                name: "body".to_string(),
                bounds: Aabb::from_corners([0.0, -1.0, -1.0], [1.0, 1.0, 1.0]),
            }],
        )
    }

    #[test]
    fn hits_sorted_nearest_first() {
        let far_wall = wall_at(1, 8.0);
        let near_wall = wall_at(2, 3.0);
        let hits = RaycastProbe::default().intersect(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            &[&far_wall, &near_wall],
            false,
        );
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].object, ObjectId(2));
        assert!((hits[0].distance - 3.0).abs() < 1e-5);
        assert_eq!(hits[1].object, ObjectId(1));
    }

    #[test]
    fn no_hit_is_empty() {
        let wall = wall_at(1, 3.0);
        let hits = RaycastProbe::default().intersect(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            &[&wall],
            true,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn groups_need_descendants() {
        let model = group_at(4, 2.0);
        let probe = RaycastProbe::default();
        let origin = Vec3::new(0.0, 0.0, 0.0);
        let direction = Vec3::new(1.0, 0.0, 0.0);
        assert!(probe.intersect(origin, direction, &[&model], false).is_empty());
        let hits = probe.intersect(origin, direction, &[&model], true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].child, Some(0));
        assert!((hits[0].distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn far_limit_drops_distant_hits() {
        let wall = wall_at(1, 30.0);
        let probe = RaycastProbe { far: 10.0 };
        let hits = probe.intersect(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            &[&wall],
            false,
        );
        assert!(hits.is_empty());
    }
}
