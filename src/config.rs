//! Run configuration: fixed defaults with environment overrides

use std::path::PathBuf;

use tracing::debug;

use crate::error::ConfigError;
use crate::plot::DisplayMode;

/// Snapshot read when `NEBULA_SNAPSHOT` is unset
pub const SNAPSHOT_FILE: &str = "single_nebula_1.hdf5";
/// 0 = gas, 1 = dark matter, 4 = stars
pub const PARTICLE_TYPE: u32 = 0;
/// Plot every nth particle (use >1 for large datasets)
pub const SUBSAMPLE: usize = 1;

pub const ENV_SNAPSHOT: &str = "NEBULA_SNAPSHOT";
pub const ENV_PART_TYPE: &str = "NEBULA_PART_TYPE";
pub const ENV_SUBSAMPLE: &str = "NEBULA_SUBSAMPLE";
pub const ENV_HEADLESS: &str = "NEBULA_HEADLESS";

#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub snapshot_file: PathBuf,
    pub particle_type: u32,
    pub subsample: usize,
    pub display: DisplayMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            snapshot_file: PathBuf::from(SNAPSHOT_FILE),
            particle_type: PARTICLE_TYPE,
            subsample: SUBSAMPLE,
            display: DisplayMode::Window,
        }
    }
}

impl RunConfig {
    /// Defaults overridden by `NEBULA_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_SNAPSHOT) {
            config.snapshot_file = PathBuf::from(path);
        }
        if let Some(value) = lookup(ENV_PART_TYPE) {
            config.particle_type = parse(ENV_PART_TYPE, value)?;
        }
        if let Some(value) = lookup(ENV_SUBSAMPLE) {
            config.subsample = parse(ENV_SUBSAMPLE, value)?;
        }
        if let Some(value) = lookup(ENV_HEADLESS) {
            config.display = match value.trim() {
                "" | "0" | "false" => DisplayMode::Window,
                "1" | "true" => DisplayMode::Headless,
                _ => return Err(ConfigError::InvalidValue { var: ENV_HEADLESS, value }),
            };
        }

        debug!(?config, "Run configuration");
        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { var, value })
}
