//! Particle arrays loaded from a snapshot
//!
//! Plain coordinate columns in kpc plus optional masses. Platform-agnostic,
//! shared between the loader and the renderer.

use tracing::{debug, trace};

/// Marker area (pt^2) used for every point when no masses are available
pub const DEFAULT_POINT_SIZE: f64 = 0.1;
/// Marker area given to the heaviest particle
pub const MAX_POINT_SIZE: f64 = 5.0;

/// Coordinates (kpc) and optional masses for one particle type
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    /// None when the snapshot group has no `Masses` table
    pub masses: Option<Vec<f64>>,
}

/// Per-point marker sizes derived from masses
#[derive(Clone, Debug, PartialEq)]
pub enum PointSizes {
    /// Same size for every point
    Uniform(f64),
    /// One size per point, range-normalized to [0.1, 5.0]
    PerPoint(Vec<f64>),
}

impl PointSizes {
    /// Size of the point at `index`
    ///
    /// Out-of-range indices on a per-point table yield NaN, which the
    /// renderer treats like any other unplottable marker.
    pub fn get(&self, index: usize) -> f64 {
        match self {
            PointSizes::Uniform(size) => *size,
            PointSizes::PerPoint(sizes) => sizes.get(index).copied().unwrap_or(f64::NAN),
        }
    }
}

impl ParticleData {
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>, masses: Option<Vec<f64>>) -> Self {
        Self { x, y, z, masses }
    }

    /// Number of particles (length of the x column)
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Keep every `stride`-th particle starting at index 0
    ///
    /// A stride of 0 or 1 keeps everything.
    pub fn subsample(&self, stride: usize) -> Self {
        if stride <= 1 {
            return self.clone();
        }

        let thin = |values: &[f64]| -> Vec<f64> { values.iter().step_by(stride).copied().collect() };
        let sampled = Self {
            x: thin(&self.x),
            y: thin(&self.y),
            z: thin(&self.z),
            masses: self.masses.as_deref().map(thin),
        };

        debug!(stride, before = self.len(), after = sampled.len(), "Subsampled particles");
        sampled
    }

    /// Marker sizes: constant without masses, otherwise linear in mass
    ///
    /// `size = 0.1 + 4.9 * m / max(m)`. All-zero masses divide by zero and
    /// produce NaN sizes; a NaN mass makes the max NaN and so every size NaN.
    /// Both cases are left to the renderer.
    pub fn point_sizes(&self) -> PointSizes {
        let Some(masses) = self.masses.as_deref() else {
            return PointSizes::Uniform(DEFAULT_POINT_SIZE);
        };

        let max_mass = masses.iter().copied().fold(f64::NEG_INFINITY, |max, m| {
            if max.is_nan() || m.is_nan() {
                f64::NAN
            } else {
                max.max(m)
            }
        });
        let span = MAX_POINT_SIZE - DEFAULT_POINT_SIZE;
        let sizes: Vec<f64> = masses
            .iter()
            .map(|&m| DEFAULT_POINT_SIZE + span * (m / max_mass))
            .collect();

        trace!(count = sizes.len(), max_mass, "Point sizes from masses");
        PointSizes::PerPoint(sizes)
    }

    /// Positions as `[x, y, z]` triples
    pub fn positions(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((&x, &y), &z)| [x, y, z])
    }
}

/// Format a count with comma thousands separators (`1234567` -> `1,234,567`)
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize, with_masses: bool) -> ParticleData {
        let col = |k: f64| (0..n).map(|i| i as f64 + k).collect::<Vec<_>>();
        ParticleData::new(col(0.0), col(0.1), col(0.2), with_masses.then(|| col(1.0)))
    }

    #[test]
    fn test_subsample_takes_every_kth_from_zero() {
        let data = sample(10, true);
        let thin = data.subsample(3);

        assert_eq!(thin.len(), 4); // ceil(10 / 3)
        assert_eq!(thin.x, vec![0.0, 3.0, 6.0, 9.0]);
        assert_eq!(thin.y, vec![0.1, 3.1, 6.1, 9.1]);
        assert_eq!(thin.z, vec![0.2, 3.2, 6.2, 9.2]);
        assert_eq!(thin.masses, Some(vec![1.0, 4.0, 7.0, 10.0]));
    }

    #[test]
    fn test_subsample_counts() {
        for (n, k) in [(0, 2), (1, 5), (7, 7), (8, 7), (100, 3), (99, 10)] {
            let thin = sample(n, false).subsample(k);
            assert_eq!(thin.len(), n.div_ceil(k), "n={} k={}", n, k);
            assert!(thin.masses.is_none());
        }
    }

    #[test]
    fn test_subsample_stride_one_or_zero_is_identity() {
        let data = sample(5, true);
        assert_eq!(data.subsample(1), data);
        assert_eq!(data.subsample(0), data);
    }

    #[test]
    fn test_sizes_without_masses_are_uniform() {
        let sizes = sample(4, false).point_sizes();
        assert_eq!(sizes, PointSizes::Uniform(0.1));
        assert_eq!(sizes.get(3), 0.1);
    }

    #[test]
    fn test_sizes_normalized_by_max_mass() {
        let data = ParticleData::new(vec![0.0; 3], vec![0.0; 3], vec![0.0; 3], Some(vec![2.0, 4.0, 8.0]));
        let PointSizes::PerPoint(sizes) = data.point_sizes() else {
            panic!("expected per-point sizes");
        };
        let expected = [1.325, 2.55, 5.0];
        for (got, want) in sizes.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "got {} want {}", got, want);
        }
    }

    #[test]
    fn test_all_zero_masses_give_nan_sizes() {
        let data = ParticleData::new(vec![0.0; 2], vec![0.0; 2], vec![0.0; 2], Some(vec![0.0, 0.0]));
        let sizes = data.point_sizes();
        assert!(sizes.get(0).is_nan());
        assert!(sizes.get(1).is_nan());
    }

    #[test]
    fn test_nan_mass_makes_every_size_nan() {
        for masses in [vec![f64::NAN, 1.0, 2.0], vec![1.0, 2.0, f64::NAN]] {
            let data = ParticleData::new(vec![0.0; 3], vec![0.0; 3], vec![0.0; 3], Some(masses));
            let sizes = data.point_sizes();
            assert!((0..3).all(|i| sizes.get(i).is_nan()));
        }
    }

    #[test]
    fn test_empty_masses_give_empty_sizes() {
        let data = ParticleData::new(vec![], vec![], vec![], Some(vec![]));
        assert_eq!(data.point_sizes(), PointSizes::PerPoint(vec![]));
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(2), "2");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(123456), "123,456");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_positions_zip_columns() {
        let data = sample(2, false);
        let points: Vec<_> = data.positions().collect();
        assert_eq!(points, vec![[0.0, 0.1, 0.2], [1.0, 1.1, 1.2]]);
    }
}
