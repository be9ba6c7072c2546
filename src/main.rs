//! Standalone CLI: load one particle type from a snapshot and plot it
//!
//! Run with: cargo run --bin nebula-plot

use nebula_plot::{format_thousands, load_particle_data, plot_3d_particles, RunConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,nebula_plot=info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = RunConfig::from_env()?;

    println!("Loading particles from {}...", config.snapshot_file.display());
    let data = load_particle_data(&config.snapshot_file, config.particle_type)?;

    println!("Plotting {} particles...", format_thousands(data.len()));
    plot_3d_particles(&data, config.subsample, config.display)?;

    info!("Done");
    Ok(())
}
