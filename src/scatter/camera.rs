//! Orthographic view of the normalized data box

/// View angles in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Angle above the x-y plane
    pub elevation: f64,
    /// Rotation about the z axis, measured from +x toward +y
    pub azimuth: f64,
}

/// A point after projection: screen offsets from the box center (y up)
/// and depth toward the viewer (larger is nearer)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub sx: f64,
    pub sy: f64,
    pub depth: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(30.0, 45.0)
    }
}

impl Camera {
    pub fn new(elevation: f64, azimuth: f64) -> Self {
        Self { elevation, azimuth }
    }

    /// Screen-right, screen-up and toward-viewer unit vectors
    pub fn basis(&self) -> [[f64; 3]; 3] {
        let (se, ce) = self.elevation.to_radians().sin_cos();
        let (sa, ca) = self.azimuth.to_radians().sin_cos();
        let right = [-sa, ca, 0.0];
        let up = [-se * ca, -se * sa, ce];
        let toward = [ce * ca, ce * sa, se];
        [right, up, toward]
    }

    pub fn project(&self, p: [f64; 3]) -> Projected {
        let [right, up, toward] = self.basis();
        Projected {
            sx: dot(p, right),
            sy: dot(p, up),
            depth: dot(p, toward),
        }
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
