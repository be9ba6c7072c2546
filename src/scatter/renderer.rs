//! CPU scatter renderer for particle markers.
//!
//! Projects a layer through the axes camera, applies depth shading and
//! paints markers far to near so nearer particles land on top.

use tracing::{trace, warn};

use super::axes::{Axes3D, Viewport};
use super::canvas::Canvas;
use crate::core::PointSizes;

/// Share of alpha removed from the farthest marker by depth shading
const DEPTH_SHADE_RANGE: f64 = 0.7;

/// Marker appearance shared by every point of a layer
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterStyle {
    pub color: [u8; 3],
    pub alpha: f64,
    /// Outline color, None for borderless markers
    pub edge_color: Option<[u8; 3]>,
    /// Fade markers with distance from the viewer
    pub depth_shade: bool,
}

impl Default for ScatterStyle {
    fn default() -> Self {
        Self {
            color: [31, 119, 180],
            alpha: 1.0,
            edge_color: None,
            depth_shade: true,
        }
    }
}

/// Points in data coordinates with their marker areas (pt^2)
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterLayer {
    pub points: Vec<[f64; 3]>,
    pub sizes: PointSizes,
    pub style: ScatterStyle,
}

impl ScatterLayer {
    pub fn new(points: Vec<[f64; 3]>, sizes: PointSizes) -> Self {
        Self {
            points,
            sizes,
            style: ScatterStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ScatterStyle) -> Self {
        self.style = style;
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A projected marker ready to paint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterParticle {
    pub x: f64,
    pub y: f64,
    /// Larger is nearer the viewer
    pub depth: f64,
    /// Radius in pixels
    pub radius: f64,
    pub alpha: f64,
}

/// Paints scatter layers at a given output resolution
pub struct ScatterRenderer {
    dpi: f64,
}

impl ScatterRenderer {
    pub fn new(dpi: f64) -> Self {
        Self { dpi }
    }

    /// Pixel radius of a marker with area `size` pt^2
    pub fn marker_radius(&self, size: f64) -> f64 {
        size.sqrt() * self.dpi / 72.0 / 2.0
    }

    /// Project, shade and depth-sort a layer
    ///
    /// Markers with a non-finite size or position are dropped.
    pub fn prepare(&self, layer: &ScatterLayer, axes: &Axes3D, viewport: &Viewport) -> Vec<ScatterParticle> {
        let mut particles: Vec<ScatterParticle> = Vec::with_capacity(layer.len());
        let mut skipped = 0usize;

        for (i, &point) in layer.points.iter().enumerate() {
            let size = layer.sizes.get(i);
            let projected = axes.camera.project(axes.to_box(point));
            let (x, y) = viewport.to_screen(projected);
            if !size.is_finite() || !x.is_finite() || !y.is_finite() {
                skipped += 1;
                continue;
            }
            particles.push(ScatterParticle {
                x,
                y,
                depth: projected.depth,
                radius: self.marker_radius(size),
                alpha: layer.style.alpha,
            });
        }

        if skipped > 0 {
            warn!(skipped, total = layer.len(), "Skipped markers with non-finite size or position");
        }

        if layer.style.depth_shade {
            shade_by_depth(&mut particles);
        }

        // Far to near
        particles.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        trace!(count = particles.len(), "Prepared scatter particles");
        particles
    }

    pub fn draw(&self, canvas: &mut Canvas, style: &ScatterStyle, particles: &[ScatterParticle]) {
        for p in particles {
            if let Some(edge) = style.edge_color {
                canvas.fill_disk(p.x, p.y, p.radius + 0.5, edge, p.alpha);
            }
            canvas.fill_disk(p.x, p.y, p.radius, style.color, p.alpha);
        }
    }
}

/// Scale alpha by `1 - 0.7 * d`, `d` the normalized distance from the
/// nearest (0) to the farthest (1) marker
fn shade_by_depth(particles: &mut [ScatterParticle]) {
    let (near, far) = particles
        .iter()
        .fold((f64::NEG_INFINITY, f64::INFINITY), |(near, far), p| (near.max(p.depth), far.min(p.depth)));
    let range = near - far;
    if range.is_nan() || range <= 0.0 {
        return;
    }
    for p in particles {
        let d = (near - p.depth) / range;
        p.alpha *= 1.0 - DEPTH_SHADE_RANGE * d;
    }
}
