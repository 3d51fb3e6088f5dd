use serde::{Deserialize, Serialize};

// Parameters that define the simulation. These don't change at runtime.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SimParams {
    // Simulation ticks per second. Real-time delays are converted with this.
    pub tick_rate: f64,
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub collision: CollisionParams,

    #[serde(default = "ClassParams::cooler")]
    pub cooler: ClassParams,

    #[serde(default = "ClassParams::rack")]
    pub rack: ClassParams,

    #[serde(default)]
    pub room: RoomParams,

    #[serde(default)]
    pub catalog: ModelCatalog,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct CollisionParams {
    // A particle closer than this to geometry along its heading has hit it.
    pub distance_threshold: f32,
    pub impact_color: [f32; 3],
}

impl Default for CollisionParams {
    fn default() -> Self {
        CollisionParams {
            distance_threshold: 0.1,
            impact_color: [1.0, 0.5, 0.0],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ClassParams {
    pub particle_count: usize,
    // Per-axis gain applied to the velocity when integrating position.
    pub acceleration: [f32; 3],
    // Peak-to-peak random velocity change per tick, per axis.
    pub turbulence: [f32; 3],
    pub include_descendants: bool,
    // Delay before a particle frozen by a collision is respawned. None: stays frozen.
    #[serde(default)]
    pub collision_respawn_delay_ms: Option<u64>,
}

impl ClassParams {
    // Friction slows the main flow, the cold air sinks faster.
    pub fn cooler() -> Self {
        ClassParams {
            particle_count: 500,
            acceleration: [0.5, 1.5, 1.0],
            turbulence: [0.001, 0.01, 0.02],
            include_descendants: false,
            collision_respawn_delay_ms: None,
        }
    }

    pub fn rack() -> Self {
        ClassParams {
            particle_count: 100,
            acceleration: [1.0, 1.0, 1.0],
            turbulence: [0.0, 0.0, 0.0],
            include_descendants: true,
            collision_respawn_delay_ms: Some(1000),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RoomParams {
    // The floor is a square slab with its top face at y = 0.
    pub floor_half_extent: f32,
    pub floor_thickness: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,
    // Floor plan polylines in the x/z plane; each segment becomes a wall.
    #[serde(default)]
    pub walls: Vec<WallPath>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WallPath {
    pub points: Vec<[f32; 2]>,
}

impl Default for RoomParams {
    fn default() -> Self {
        RoomParams {
            floor_half_extent: 10.0,
            floor_thickness: 0.1,
            wall_height: 3.0,
            wall_thickness: 0.2,
            walls: vec![WallPath {
                points: vec![
                    [-5.0, -5.0],
                    [5.0, -5.0],
                    [5.0, 5.0],
                    [-5.0, 5.0],
                    [-5.0, -5.0],
                ],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MeshSpec {
    pub name: String,
    pub min: [f32; 3],
    pub max: [f32; 3],
}

// How a model kind is placed and what it is made of, in model-file units.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModelSpec {
    pub scale: [f32; 3],
    // Raise the model by half its scaled height after placing it.
    #[serde(default)]
    pub lift_to_floor: bool,
    pub meshes: Vec<MeshSpec>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModelCatalog {
    pub chair: ModelSpec,
    pub cooler: ModelSpec,
    pub table: ModelSpec,
    pub rack: ModelSpec,
}

fn mesh(name: &str, min: [f32; 3], max: [f32; 3]) -> MeshSpec {
    MeshSpec {
        name: name.to_string(),
        min,
        max,
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        ModelCatalog {
            chair: ModelSpec {
                scale: [0.05, 0.05, 0.05],
                lift_to_floor: false,
                meshes: vec![
                    mesh("seat", [-5.0, 8.0, -5.0], [5.0, 10.0, 5.0]),
                    mesh("back", [-5.0, 10.0, -5.0], [5.0, 20.0, -4.0]),
                    mesh("base", [-1.0, 0.0, -1.0], [1.0, 8.0, 1.0]),
                ],
            },
            cooler: ModelSpec {
                scale: [0.01, 0.01, 0.01],
                lift_to_floor: false,
                meshes: vec![
                    mesh("housing", [-60.0, 0.0, -30.0], [-1.0, 180.0, 30.0]),
                    mesh("grille", [-1.0, 5.0, -28.0], [0.0, 40.0, 28.0]),
                ],
            },
            table: ModelSpec {
                scale: [0.8, 0.8, 0.8],
                lift_to_floor: false,
                meshes: vec![
                    mesh("top", [-1.0, 0.95, -0.5], [1.0, 1.0, 0.5]),
                    mesh("legs", [-0.95, 0.0, -0.45], [0.95, 0.95, 0.45]),
                ],
            },
            rack: ModelSpec {
                scale: [1.0, 1.1, 1.0],
                lift_to_floor: true,
                meshes: vec![
                    mesh("frame", [-0.3, -1.0, -0.5], [0.3, 1.0, 0.5]),
                    mesh("door", [-0.3, -1.0, 0.5], [0.3, 1.0, 0.52]),
                ],
            },
        }
    }
}

impl std::str::FromStr for SimParams {
    type Err = toml::de::Error;
    fn from_str(serialized: &str) -> Result<Self, Self::Err> {
        let params = toml::from_str(serialized)?;
        Ok(params)
    }
}

impl Default for SimParams {
    fn default() -> Self {
        SimParams {
            tick_rate: 60.0,
            seed: None,
            collision: CollisionParams::default(),
            cooler: ClassParams::cooler(),
            rack: ClassParams::rack(),
            room: RoomParams::default(),
            catalog: ModelCatalog::default(),
        }
    }
}

lazy_static::lazy_static! {
    static ref BUNDLED_PARAMS: SimParams = {
        let config_data = include_str!("../sim_config.toml");
        match config_data.parse() {
            Ok(params) => params,
            Err(e) => {
                log::error!(
                    "Failed to parse config file({}): {:?}",
                    "../sim_config.toml",
                    e
                );
                SimParams::default()
            }
        }
    };
}

pub fn get_sim_config_from_default_file() -> SimParams {
    BUNDLED_PARAMS.clone()
}
