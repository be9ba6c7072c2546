//! Error types for loading, rendering and configuration

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading a snapshot file
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to open snapshot {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: hdf5::Error,
    },

    #[error("snapshot has no group {group} (particle types present: {available:?})")]
    MissingGroup { group: String, available: Vec<u32> },

    #[error("group {group} has no dataset {name}: {source}")]
    MissingDataset {
        group: String,
        name: &'static str,
        #[source]
        source: hdf5::Error,
    },

    #[error("failed to read {group}/{name}: {source}")]
    Read {
        group: String,
        name: &'static str,
        #[source]
        source: hdf5::Error,
    },

    #[error("{group}/{name} has shape {shape:?}, expected {expected}")]
    BadShape {
        group: String,
        name: &'static str,
        shape: Vec<usize>,
        expected: &'static str,
    },

    #[error("{group}/Masses has {masses} entries but Coordinates has {coordinates} rows")]
    LengthMismatch {
        group: String,
        coordinates: usize,
        masses: usize,
    },
}

/// Failures while producing or showing the figure
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to write figure {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("figure window failed: {message}")]
    Viewer { message: String },

    #[error("particle arrays differ in length: x={x} y={y} z={z} masses={masses:?}")]
    LengthMismatch {
        x: usize,
        y: usize,
        z: usize,
        masses: Option<usize>,
    },
}

/// Malformed environment override
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
}
