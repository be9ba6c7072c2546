//! Snapshot loader for GADGET-style HDF5 files
//!
//! Reads one `PartType<N>` group: `Coordinates` (N x 3, cm) converted to kpc,
//! plus `Masses` when present. The file handle is owned by the load call and
//! closed when it returns, on success or error.

use std::path::Path;

use tracing::{debug, info, trace};

use super::ParticleData;
use crate::error::SnapshotError;

/// Centimeters per kiloparsec
pub const CM_PER_KPC: f64 = 3.0857e21;
/// Group name prefix; the particle type tag is appended
pub const PART_TYPE_PREFIX: &str = "PartType";

const COORDINATES: &str = "Coordinates";
const MASSES: &str = "Masses";

/// Name of the group holding particles of type `part_type`
pub fn group_name(part_type: u32) -> String {
    format!("{}{}", PART_TYPE_PREFIX, part_type)
}

/// Load coordinates (kpc) and optional masses for one particle type
///
/// Tags: 0 = gas, 1 = dark matter, 4 = stars.
pub fn load_particle_data(
    path: impl AsRef<Path>,
    part_type: u32,
) -> Result<ParticleData, SnapshotError> {
    let path = path.as_ref();
    let file = open(path)?;
    let group_name = group_name(part_type);

    let group = match file.group(&group_name) {
        Ok(group) => group,
        Err(_) => {
            return Err(SnapshotError::MissingGroup {
                group: group_name,
                available: types_in(&file),
            });
        }
    };

    let coords = group
        .dataset(COORDINATES)
        .map_err(|source| SnapshotError::MissingDataset {
            group: group_name.clone(),
            name: COORDINATES,
            source,
        })?;
    let shape = coords.shape();
    if shape.len() != 2 || shape[1] < 3 {
        return Err(SnapshotError::BadShape {
            group: group_name,
            name: COORDINATES,
            shape,
            expected: "N x 3",
        });
    }

    let table = coords
        .read_2d::<f64>()
        .map_err(|source| SnapshotError::Read {
            group: group_name.clone(),
            name: COORDINATES,
            source,
        })?;
    debug!(group = %group_name, rows = table.nrows(), cols = table.ncols(), "Read coordinates");

    let column = |i: usize| -> Vec<f64> { table.column(i).iter().map(|&v| v / CM_PER_KPC).collect() };
    let (x, y, z) = (column(0), column(1), column(2));

    let masses = if group.link_exists(MASSES) {
        let masses = group
            .dataset(MASSES)
            .and_then(|ds| ds.read_raw::<f64>())
            .map_err(|source| SnapshotError::Read {
                group: group_name.clone(),
                name: MASSES,
                source,
            })?;
        if masses.len() != x.len() {
            return Err(SnapshotError::LengthMismatch {
                group: group_name,
                coordinates: x.len(),
                masses: masses.len(),
            });
        }
        trace!(count = masses.len(), "Read masses");
        Some(masses)
    } else {
        debug!(group = %group_name, "No masses in group");
        None
    };

    info!(
        path = %path.display(),
        group = %group_name,
        particles = x.len(),
        has_masses = masses.is_some(),
        "Loaded particles"
    );

    Ok(ParticleData::new(x, y, z, masses))
}

/// Particle type tags present in a snapshot, ascending
pub fn particle_types(path: impl AsRef<Path>) -> Result<Vec<u32>, SnapshotError> {
    let file = open(path.as_ref())?;
    Ok(types_in(&file))
}

fn open(path: &Path) -> Result<hdf5::File, SnapshotError> {
    trace!(path = %path.display(), "Opening snapshot");
    hdf5::File::open(path).map_err(|source| SnapshotError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn types_in(file: &hdf5::File) -> Vec<u32> {
    let mut types: Vec<u32> = file
        .member_names()
        .unwrap_or_default()
        .iter()
        .filter_map(|name| name.strip_prefix(PART_TYPE_PREFIX)?.parse().ok())
        .collect();
    types.sort_unstable();
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Write a snapshot with one group per `(part_type, coords, masses)` entry
    fn write_snapshot(dir: &TempDir, groups: &[(u32, &[[f64; 3]], Option<&[f64]>)]) -> std::path::PathBuf {
        let path = dir.path().join("snap.hdf5");
        let file = hdf5::File::create(&path).unwrap();
        for &(part_type, coords, masses) in groups {
            let group = file.create_group(&group_name(part_type)).unwrap();
            let flat: Vec<f64> = coords.iter().flatten().copied().collect();
            let ds = group
                .new_dataset::<f64>()
                .shape((coords.len(), 3))
                .create(COORDINATES)
                .unwrap();
            ds.write_raw(&flat).unwrap();
            if let Some(masses) = masses {
                group
                    .new_dataset_builder()
                    .with_data(masses)
                    .create(MASSES)
                    .unwrap();
            }
        }
        path
    }

    #[test]
    fn test_load_converts_cm_to_kpc() {
        let dir = TempDir::new().unwrap();
        let raw = [[3.0857e21, 0.0, 0.0], [0.0, 3.0857e21, 0.0]];
        let path = write_snapshot(&dir, &[(0, &raw, None)]);

        let data = load_particle_data(&path, 0).unwrap();
        assert_eq!(data.x, vec![1.0, 0.0]);
        assert_eq!(data.y, vec![0.0, 1.0]);
        assert_eq!(data.z, vec![0.0, 0.0]);
        assert!(data.masses.is_none());
    }

    #[test]
    fn test_load_divides_each_column() {
        let dir = TempDir::new().unwrap();
        let raw = [[1.5e22, -2.0e21, 7.0e20], [4.2e19, 9.9e23, -3.3e22], [0.0, 1.0, 2.0]];
        let path = write_snapshot(&dir, &[(0, &raw, Some(&[1.0, 2.0, 3.0]))]);

        let data = load_particle_data(&path, 0).unwrap();
        for (i, row) in raw.iter().enumerate() {
            assert_eq!(data.x[i], row[0] / CM_PER_KPC);
            assert_eq!(data.y[i], row[1] / CM_PER_KPC);
            assert_eq!(data.z[i], row[2] / CM_PER_KPC);
        }
        assert_eq!(data.masses, Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_load_selects_particle_type() {
        let dir = TempDir::new().unwrap();
        let gas = [[CM_PER_KPC, 0.0, 0.0]];
        let stars = [[0.0, 0.0, 2.0 * CM_PER_KPC], [0.0, 0.0, 3.0 * CM_PER_KPC]];
        let path = write_snapshot(&dir, &[(0, &gas, None), (4, &stars, Some(&[5.0, 6.0]))]);

        let data = load_particle_data(&path, 4).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.z, vec![2.0, 3.0]);
        assert_eq!(particle_types(&path).unwrap(), vec![0, 4]);
    }

    #[test]
    fn test_reload_is_identical() {
        let dir = TempDir::new().unwrap();
        let raw = [[1.0e21, 2.0e21, 3.0e21], [4.0e21, 5.0e21, 6.0e21]];
        let path = write_snapshot(&dir, &[(0, &raw, Some(&[1.0, 1.5]))]);

        let first = load_particle_data(&path, 0).unwrap();
        let second = load_particle_data(&path, 0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_group_reports_available_types() {
        let dir = TempDir::new().unwrap();
        let raw = [[0.0, 0.0, 0.0]];
        let path = write_snapshot(&dir, &[(1, &raw, None)]);

        match load_particle_data(&path, 0) {
            Err(SnapshotError::MissingGroup { group, available }) => {
                assert_eq!(group, "PartType0");
                assert_eq!(available, vec![1]);
            }
            other => panic!("expected MissingGroup, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_particle_data(dir.path().join("absent.hdf5"), 0);
        assert!(matches!(result, Err(SnapshotError::Open { .. })));
    }

    #[test]
    fn test_missing_coordinates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty_group.hdf5");
        {
            let file = hdf5::File::create(&path).unwrap();
            file.create_group("PartType0").unwrap();
        }

        let result = load_particle_data(&path, 0);
        assert!(matches!(result, Err(SnapshotError::MissingDataset { name: "Coordinates", .. })));
    }

    #[test]
    fn test_masses_length_mismatch() {
        let dir = TempDir::new().unwrap();
        let raw = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        let path = write_snapshot(&dir, &[(0, &raw, Some(&[1.0]))]);

        let result = load_particle_data(&path, 0);
        assert!(matches!(
            result,
            Err(SnapshotError::LengthMismatch { coordinates: 2, masses: 1, .. })
        ));
    }

    /// Snapshot whose `PartType0/Coordinates` is written as-is from `values`
    fn write_raw_coordinates<T: hdf5::H5Type>(dir: &TempDir, shape: &[usize], values: &[T]) -> std::path::PathBuf {
        let path = dir.path().join("raw.hdf5");
        let file = hdf5::File::create(&path).unwrap();
        let group = file.create_group("PartType0").unwrap();
        let ds = group.new_dataset::<T>().shape(shape.to_vec()).create(COORDINATES).unwrap();
        ds.write_raw(values).unwrap();
        path
    }

    #[test]
    fn test_bad_coordinate_shapes() {
        let dir = TempDir::new().unwrap();

        let flat = write_raw_coordinates(&dir, &[3], &[1.0f64, 2.0, 3.0]);
        match load_particle_data(&flat, 0) {
            Err(SnapshotError::BadShape { shape, name, .. }) => {
                assert_eq!(shape, vec![3]);
                assert_eq!(name, "Coordinates");
            }
            other => panic!("expected BadShape, got {:?}", other),
        }

        let two_cols = write_raw_coordinates(&dir, &[2, 2], &[1.0f64, 2.0, 3.0, 4.0]);
        assert!(matches!(
            load_particle_data(&two_cols, 0),
            Err(SnapshotError::BadShape { .. })
        ));
    }

    #[test]
    fn test_extra_coordinate_columns_are_ignored() {
        let dir = TempDir::new().unwrap();
        let k = CM_PER_KPC;
        let path = write_raw_coordinates(&dir, &[2, 4], &[k, 2.0 * k, 3.0 * k, 99.0, 4.0 * k, 5.0 * k, 6.0 * k, 99.0]);

        let data = load_particle_data(&path, 0).unwrap();
        assert_eq!(data.x, vec![1.0, 4.0]);
        assert_eq!(data.y, vec![2.0, 5.0]);
        assert_eq!(data.z, vec![3.0, 6.0]);
    }

    #[test]
    fn test_single_precision_coordinates_are_converted() {
        let dir = TempDir::new().unwrap();
        let k = CM_PER_KPC as f32;
        let path = write_raw_coordinates(&dir, &[2, 3], &[k, 0.0f32, -2.0 * k, 0.5 * k, 3.0 * k, 0.0]);

        let data = load_particle_data(&path, 0).unwrap();
        let close = |a: f64, b: f64| (a - b).abs() < 1e-6;
        let expected = [[1.0, 0.0, -2.0], [0.5, 3.0, 0.0]];
        for (i, row) in expected.iter().enumerate() {
            assert!(close(data.x[i], row[0]), "x[{}] = {}", i, data.x[i]);
            assert!(close(data.y[i], row[1]), "y[{}] = {}", i, data.y[i]);
            assert!(close(data.z[i], row[2]), "z[{}] = {}", i, data.z[i]);
        }
    }
}
