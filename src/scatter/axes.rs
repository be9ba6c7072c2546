//! 3D axes: limits, ticks, panes, axis lines and labels
//!
//! Data coordinates are mapped into a box centered on the origin whose edge
//! lengths are the box aspect, then projected by the camera and scaled into
//! the axes rectangle of the figure.

use super::camera::{Camera, Projected};
use super::canvas::Canvas;
use super::font;
use super::renderer::{ScatterLayer, ScatterRenderer};
use crate::theme::colors;

/// Fraction of the data span added on each side when autoscaling
pub const AUTOSCALE_MARGIN: f64 = 0.05;

/// Default pane fill and edge (light grey)
pub const PANE_GREY: [u8; 3] = [242, 242, 242];
const GRID_GREY: [u8; 3] = [222, 222, 222];

pub(crate) const TICK_SCALE: u32 = 2;
pub(crate) const LABEL_SCALE: u32 = 2;
pub(crate) const TITLE_SCALE: u32 = 3;
const TICK_LEN: f64 = 6.0;
const TICK_PAD: f64 = 10.0;
const LABEL_PAD: f64 = 14.0;
const TITLE_PAD: f64 = 6.0;

/// Closed data interval shown along one axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl AxisLimits {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Fit finite `values` with a margin on each side
    ///
    /// Zero-width ranges are widened by 5% of their magnitude (or to
    /// +-0.05 around zero); no finite values gives the default [0, 1].
    pub fn autoscale(values: impl IntoIterator<Item = f64>, margin: f64) -> Self {
        let (lo, hi) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if lo > hi {
            return Self::default();
        }

        let (lo, hi) = if hi - lo == 0.0 {
            if lo == 0.0 {
                (-0.05, 0.05)
            } else {
                (lo - 0.05 * lo.abs(), hi + 0.05 * hi.abs())
            }
        } else {
            (lo, hi)
        };

        let pad = (hi - lo) * margin;
        Self::new(lo - pad, hi + pad)
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position in [-0.5, 0.5] across the limits
    pub fn normalize(&self, v: f64) -> f64 {
        (v - self.min) / self.span() - 0.5
    }

    /// Round tick values inside the limits
    pub fn ticks(&self) -> Vec<f64> {
        let step = nice_step(self.span());
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }
        // Tolerance keeps ticks sitting exactly on a limit
        let first = (self.min / step - 1e-9).ceil() as i64;
        let last = (self.max / step + 1e-9).floor() as i64;
        (first..=last).map(|k| k as f64 * step).collect()
    }
}

/// Pick a round tick step for a range (targeting ~5-6 ticks)
pub fn nice_step(range: f64) -> f64 {
    let raw = range / 6.0;
    let magnitude = 10.0f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let step = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

/// Tick label with just enough decimals for `step`
pub fn format_tick(v: f64, step: f64) -> String {
    let decimals = (-step.log10().floor()).max(0.0) as usize;
    // Avoid "-0" / "-0.0" for values that round to zero
    let v = if v.abs() < step * 1e-6 { 0.0 } else { v };
    format!("{:.*}", decimals, v)
}

/// Pixel rectangle, `x0,y0` top-left
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }
}

/// Maps camera-space offsets to canvas pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cx: f64,
    pub cy: f64,
    /// Pixels per normalized box unit
    pub scale: f64,
}

impl Viewport {
    /// Fit the bounding sphere of a box with edge lengths `aspect` into `rect`
    pub fn fit(rect: Rect, aspect: [f64; 3]) -> Self {
        let radius = 0.5 * (aspect[0].powi(2) + aspect[1].powi(2) + aspect[2].powi(2)).sqrt();
        let (cx, cy) = rect.center();
        let scale = rect.width().min(rect.height()).max(0.0) / (2.0 * radius.max(f64::EPSILON));
        Self { cx, cy, scale }
    }

    pub fn to_screen(&self, p: Projected) -> (f64, f64) {
        (self.cx + p.sx * self.scale, self.cy - p.sy * self.scale)
    }
}

/// A 3D axes with its artists
#[derive(Clone, Debug)]
pub struct Axes3D {
    pub title: String,
    /// x, y, z axis labels
    pub labels: [String; 3],
    pub limits: [AxisLimits; 3],
    /// Relative edge lengths of the data box
    pub box_aspect: [f64; 3],
    pub camera: Camera,
    pub grid: bool,
    /// Back pane fill, None for unfilled
    pub pane_fill: Option<[u8; 3]>,
    pub pane_edge: [u8; 3],
    pub layers: Vec<ScatterLayer>,
}

impl Default for Axes3D {
    fn default() -> Self {
        Self {
            title: String::new(),
            labels: Default::default(),
            limits: [AxisLimits::default(); 3],
            box_aspect: [4.0 / 4.0, 4.0 / 4.0, 3.0 / 4.0],
            camera: Camera::new(30.0, -60.0),
            grid: true,
            pane_fill: Some(PANE_GREY),
            pane_edge: PANE_GREY,
            layers: Vec::new(),
        }
    }
}

impl Axes3D {
    /// Add a scatter layer and refit the limits to all layers
    pub fn scatter(&mut self, layer: ScatterLayer) {
        self.layers.push(layer);
        self.autoscale();
    }

    pub fn autoscale(&mut self) {
        for axis in 0..3 {
            let values = self.layers.iter().flat_map(|l| l.points.iter().map(move |p| p[axis]));
            self.limits[axis] = AxisLimits::autoscale(values, AUTOSCALE_MARGIN);
        }
    }

    pub fn set_labels(&mut self, x: &str, y: &str, z: &str) {
        self.labels = [x.to_string(), y.to_string(), z.to_string()];
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_box_aspect(&mut self, aspect: [f64; 3]) {
        self.box_aspect = aspect;
    }

    /// Set elevation and azimuth in degrees
    pub fn view_init(&mut self, elevation: f64, azimuth: f64) {
        self.camera = Camera::new(elevation, azimuth);
    }

    /// Normalized box position of a data point
    pub fn to_box(&self, p: [f64; 3]) -> [f64; 3] {
        [
            self.limits[0].normalize(p[0]) * self.box_aspect[0],
            self.limits[1].normalize(p[1]) * self.box_aspect[1],
            self.limits[2].normalize(p[2]) * self.box_aspect[2],
        ]
    }

    fn half(&self) -> [f64; 3] {
        [self.box_aspect[0] / 2.0, self.box_aspect[1] / 2.0, self.box_aspect[2] / 2.0]
    }

    fn screen(&self, vp: &Viewport, p: [f64; 3]) -> (f64, f64) {
        vp.to_screen(self.camera.project(p))
    }

    /// Draw everything inside `rect`: panes, grid, axes, markers, title
    pub fn draw(&self, canvas: &mut Canvas, rect: Rect, renderer: &ScatterRenderer) {
        let vp = Viewport::fit(rect, self.box_aspect);

        self.draw_panes(canvas, &vp);
        if self.grid {
            self.draw_grid(canvas, &vp);
        }
        for axis in 0..3 {
            self.draw_axis(canvas, &vp, axis);
        }
        for layer in &self.layers {
            let particles = renderer.prepare(layer, self, &vp);
            renderer.draw(canvas, &layer.style, &particles);
        }
        if !self.title.is_empty() {
            let (cx, _) = rect.center();
            let h = font::text_height(TITLE_SCALE) as f64;
            canvas.draw_text_centered(cx, rect.y0 - TITLE_PAD - h / 2.0, &self.title, colors::TEXT, TITLE_SCALE);
        }
    }

    /// Fixed coordinate of the back pane normal to `axis`
    fn far_side(&self, axis: usize) -> f64 {
        let toward = self.camera.basis()[2];
        let h = self.half()[axis];
        if toward[axis] >= 0.0 {
            -h
        } else {
            h
        }
    }

    fn pane_corners(&self, axis: usize) -> [[f64; 3]; 4] {
        let h = self.half();
        let (j, k) = ((axis + 1) % 3, (axis + 2) % 3);
        let mut corners = [[0.0; 3]; 4];
        for (corner, (sj, sk)) in corners.iter_mut().zip([(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]) {
            corner[axis] = self.far_side(axis);
            corner[j] = sj * h[j];
            corner[k] = sk * h[k];
        }
        corners
    }

    fn draw_panes(&self, canvas: &mut Canvas, vp: &Viewport) {
        for axis in 0..3 {
            let corners = self.pane_corners(axis).map(|c| self.screen(vp, c));
            if let Some(fill) = self.pane_fill {
                canvas.fill_convex(&corners, fill);
            }
            for i in 0..4 {
                canvas.draw_line(corners[i], corners[(i + 1) % 4], self.pane_edge);
            }
        }
    }

    fn draw_grid(&self, canvas: &mut Canvas, vp: &Viewport) {
        let h = self.half();
        for pane in 0..3 {
            for (along, across) in [((pane + 1) % 3, (pane + 2) % 3), ((pane + 2) % 3, (pane + 1) % 3)] {
                for tick in self.limits[along].ticks() {
                    let mut a = [0.0; 3];
                    a[pane] = self.far_side(pane);
                    a[along] = self.limits[along].normalize(tick) * self.box_aspect[along];
                    let mut b = a;
                    a[across] = -h[across];
                    b[across] = h[across];
                    canvas.draw_line(self.screen(vp, a), self.screen(vp, b), GRID_GREY);
                }
            }
        }
    }

    /// Box edge carrying the ticks for `axis`: its two fixed coordinates
    /// (the coordinate along `axis` is left at zero)
    fn axis_edge(&self, axis: usize, vp: &Viewport) -> [f64; 3] {
        let h = self.half();
        let toward = self.camera.basis()[2];
        let near = |i: usize| if toward[i] >= 0.0 { h[i] } else { -h[i] };

        let mut edge = [0.0; 3];
        if axis < 2 {
            // Along the bottom pane, on the side facing the viewer
            let other = 1 - axis;
            edge[other] = near(other);
            edge[2] = self.far_side(2);
        } else {
            // Leftmost vertical edge on screen
            let candidates = [[h[0], h[1]], [h[0], -h[1]], [-h[0], h[1]], [-h[0], -h[1]]];
            let best = candidates
                .iter()
                .min_by(|a, b| {
                    let sa = self.screen(vp, [a[0], a[1], 0.0]).0;
                    let sb = self.screen(vp, [b[0], b[1], 0.0]).0;
                    sa.total_cmp(&sb)
                })
                .copied()
                .unwrap_or([h[0], -h[1]]);
            edge[0] = best[0];
            edge[1] = best[1];
        }
        edge
    }

    fn draw_axis(&self, canvas: &mut Canvas, vp: &Viewport, axis: usize) {
        let h = self.half();
        let edge = self.axis_edge(axis, vp);

        let mut start = edge;
        let mut end = edge;
        start[axis] = -h[axis];
        end[axis] = h[axis];
        canvas.draw_line(self.screen(vp, start), self.screen(vp, end), colors::AXIS_LINE);

        // Outward direction on screen: projection of the edge offset from the box axis
        let out = self.camera.project(edge);
        let norm = (out.sx * out.sx + out.sy * out.sy).sqrt();
        let (dx, dy) = if norm > 0.0 { (out.sx / norm, -out.sy / norm) } else { (0.0, 1.0) };

        let limits = self.limits[axis];
        let step = nice_step(limits.span());
        let mut max_extent = 0.0f64;
        for tick in limits.ticks() {
            let mut p = edge;
            p[axis] = limits.normalize(tick) * self.box_aspect[axis];
            let (x, y) = self.screen(vp, p);
            canvas.draw_line((x, y), (x + dx * TICK_LEN, y + dy * TICK_LEN), colors::TICK);

            let label = format_tick(tick, step);
            let w = font::text_width(&label, TICK_SCALE) as f64;
            let th = font::text_height(TICK_SCALE) as f64;
            let extent = w * dx.abs() + th * dy.abs();
            max_extent = max_extent.max(extent);
            let dist = TICK_PAD + extent / 2.0;
            canvas.draw_text_centered(x + dx * dist, y + dy * dist, &label, colors::TEXT, TICK_SCALE);
        }

        let label = &self.labels[axis];
        if !label.is_empty() {
            let (x, y) = self.screen(vp, edge);
            let w = font::text_width(label, LABEL_SCALE) as f64;
            let lh = font::text_height(LABEL_SCALE) as f64;
            let dist = TICK_PAD + max_extent + LABEL_PAD + (w * dx.abs() + lh * dy.abs()) / 2.0;
            canvas.draw_text_centered(x + dx * dist, y + dy * dist, label, colors::TEXT, LABEL_SCALE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autoscale_adds_margin() {
        let limits = AxisLimits::autoscale([0.0, 10.0, 5.0], 0.05);
        assert_eq!(limits, AxisLimits::new(-0.5, 10.5));
    }

    #[test]
    fn test_autoscale_degenerate_ranges() {
        let zero = AxisLimits::autoscale([0.0, 0.0], 0.05);
        assert!(zero.min < 0.0 && zero.max > 0.0);
        assert!((zero.min + zero.max).abs() < 1e-12);

        let constant = AxisLimits::autoscale([2.0], 0.0);
        assert_eq!(constant, AxisLimits::new(1.9, 2.1));

        assert_eq!(AxisLimits::autoscale([], 0.05), AxisLimits::default());
        assert_eq!(AxisLimits::autoscale([f64::NAN], 0.05), AxisLimits::default());
    }

    #[test]
    fn test_normalize_spans_unit_interval() {
        let limits = AxisLimits::new(-2.0, 6.0);
        assert_eq!(limits.normalize(-2.0), -0.5);
        assert_eq!(limits.normalize(2.0), 0.0);
        assert_eq!(limits.normalize(6.0), 0.5);
    }

    #[test]
    fn test_ticks_are_round_and_inside() {
        let limits = AxisLimits::new(-0.55, 10.55);
        let ticks = limits.ticks();
        assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);

        let small = AxisLimits::new(0.0, 0.3).ticks();
        assert_eq!(small.len(), 7); // step 0.05
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(4.0, 2.0), "4");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
        assert_eq!(format_tick(-1e-17, 0.1), "0.0");
        assert_eq!(format_tick(-20.0, 10.0), "-20");
    }

    #[test]
    fn test_viewport_fits_smaller_side() {
        let rect = Rect { x0: 100.0, y0: 50.0, x1: 500.0, y1: 250.0 };
        let vp = Viewport::fit(rect, [1.0, 1.0, 1.0]);
        assert_eq!((vp.cx, vp.cy), (300.0, 150.0));
        let radius = 0.5 * 3.0f64.sqrt();
        assert!((vp.scale - 200.0 / (2.0 * radius)).abs() < 1e-9);
    }

    #[test]
    fn test_scatter_refits_limits() {
        let mut axes = Axes3D::default();
        axes.scatter(ScatterLayer::new(vec![[0.0, 0.0, 0.0], [10.0, 20.0, 0.0]], crate::core::PointSizes::Uniform(1.0)));
        assert_eq!(axes.limits[0], AxisLimits::new(-0.5, 10.5));
        assert_eq!(axes.limits[1], AxisLimits::new(-1.0, 21.0));
        assert!(axes.limits[2].min < 0.0 && axes.limits[2].max > 0.0);
    }

    #[test]
    fn test_box_mapping_respects_aspect() {
        let mut axes = Axes3D::default();
        axes.limits = [AxisLimits::new(0.0, 1.0); 3];
        axes.set_box_aspect([1.0, 1.0, 1.0]);
        assert_eq!(axes.to_box([1.0, 0.0, 0.5]), [0.5, -0.5, 0.0]);

        axes.set_box_aspect([2.0, 1.0, 0.5]);
        assert_eq!(axes.to_box([1.0, 0.0, 1.0]), [1.0, -0.5, 0.25]);
    }
}
