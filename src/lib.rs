pub mod collision;
pub mod emitter;
pub mod fps_estimator;
pub mod geometry;
pub mod geometry_registry;
pub mod host;
pub mod particle_field_factory;
pub mod particle_system;
pub mod particle_world;
pub mod render;
pub mod respawn_policy;
pub mod scene;
pub mod sim_params;
pub mod system_store;
pub mod update_engine;
