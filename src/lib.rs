//! nebula-plot - 3D particle scatter plots from simulation snapshots
//!
//! Loads one particle type from a GADGET-style HDF5 snapshot and renders:
//! - Coordinates converted from cm to kpc
//! - Marker sizes scaled by particle mass when masses are present
//! - A depth-shaded 3D scatter figure saved as PNG and shown in a window

#[cfg(feature = "viewer")]
pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod plot;
pub mod scatter;
pub mod theme;

pub use config::RunConfig;
pub use self::core::{format_thousands, load_particle_data, ParticleData, PointSizes};
pub use error::{ConfigError, RenderError, SnapshotError};
pub use plot::{build_figure, plot_3d_particles, DisplayMode, OUTPUT_FILE};
