//! Platform-agnostic core module - snapshot loading and particle arrays

pub mod data;
pub mod snapshot;

pub use data::{format_thousands, ParticleData, PointSizes, DEFAULT_POINT_SIZE, MAX_POINT_SIZE};
pub use snapshot::{group_name, load_particle_data, particle_types, CM_PER_KPC};
