use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Rad, SquareMatrix, Transform};

pub type Vec3 = cgmath::Vector3<f32>;

// Direction components smaller than this are treated as parallel to a slab.
const PARALLEL_EPSILON: f32 = 1e-8;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    // Not required to be unit length: hit parameters are in units of `direction`.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Ray { origin, direction }
    }

    // Unit-direction ray along `velocity`. A zero velocity has no direction, so no ray.
    pub fn along(origin: Vec3, velocity: Vec3) -> Option<Self> {
        let magnitude = velocity.magnitude();
        if magnitude <= PARALLEL_EPSILON || !magnitude.is_finite() {
            return None;
        }
        Some(Ray {
            origin,
            direction: velocity / magnitude,
        })
    }

}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Aabb {
            min: Vec3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Vec3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    pub fn from_corners(min: [f32; 3], max: [f32; 3]) -> Self {
        Aabb::new(min.into(), max.into())
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Vec3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vec3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    // Slab test. Returns the smallest non-negative ray parameter at which the
    // ray is inside the box, so a ray starting inside the box hits at 0.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_near = 0.0f32;
        let mut t_far = f32::INFINITY;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if direction.abs() < PARALLEL_EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / direction;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }
        Some(t_near)
    }
}

// Placement of an object in the world: scale, then rotation about +Y, then translation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ModelTransform {
    pub position: Vec3,
    pub rotation_y: Rad<f32>,
    pub scale: Vec3,
}

impl Default for ModelTransform {
    fn default() -> Self {
        ModelTransform {
            position: Vec3::new(0.0, 0.0, 0.0),
            rotation_y: Rad(0.0),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl ModelTransform {
    pub fn at(position: Vec3) -> Self {
        ModelTransform {
            position,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_y(self.rotation_y)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn local_to_world(&self, p: Vec3) -> Vec3 {
        self.matrix()
            .transform_point(cgmath::Point3::from_vec(p))
            .to_vec()
    }

    pub fn direction_to_world(&self, v: Vec3) -> Vec3 {
        self.matrix().transform_vector(v)
    }

    // Maps a world-space ray into this object's local frame. The direction is
    // not renormalized, so local hit parameters equal world-space distances
    // for a unit world direction.
    pub fn world_ray_to_local(&self, ray: &Ray) -> Option<Ray> {
        let inverse = self.matrix().invert()?;
        Some(Ray {
            origin: inverse
                .transform_point(cgmath::Point3::from_vec(ray.origin))
                .to_vec(),
            direction: inverse.transform_vector(ray.direction),
        })
    }
}
