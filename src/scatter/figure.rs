//! Figure: canvas size, subplot margins and one 3D axes

use std::path::Path;

use tracing::{debug, info};

use super::axes::{Axes3D, Rect};
use super::canvas::Canvas;
use super::renderer::ScatterRenderer;
use crate::error::RenderError;
use crate::theme::colors;

pub const DEFAULT_DPI: f64 = 100.0;
/// Base font size; tight layout pads by a multiple of it
pub const FONT_SIZE_PT: f64 = 25.0;
/// Padding between content and figure edge in font-size units
pub const TIGHT_PAD: f64 = 1.08;

/// Subplot edges as fractions of the figure, measured from left / bottom
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 0.125,
            right: 0.9,
            bottom: 0.11,
            top: 0.88,
        }
    }
}

impl Margins {
    fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.left)
            && (0.0..=1.0).contains(&self.right)
            && (0.0..=1.0).contains(&self.bottom)
            && (0.0..=1.0).contains(&self.top)
            && self.left < self.right
            && self.bottom < self.top
    }
}

pub struct Figure {
    width: u32,
    height: u32,
    dpi: f64,
    margins: Margins,
    axes: Axes3D,
}

impl Default for Figure {
    fn default() -> Self {
        Self::new(10.0, 8.0, DEFAULT_DPI)
    }
}

impl Figure {
    /// Figure of `width_in` x `height_in` inches at `dpi`
    pub fn new(width_in: f64, height_in: f64, dpi: f64) -> Self {
        Self {
            width: (width_in * dpi).round().max(1.0) as u32,
            height: (height_in * dpi).round().max(1.0) as u32,
            dpi,
            margins: Margins::default(),
            axes: Axes3D::default(),
        }
    }

    /// Pixel size `(width, height)`
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn axes(&self) -> &Axes3D {
        &self.axes
    }

    pub fn axes_mut(&mut self) -> &mut Axes3D {
        &mut self.axes
    }

    fn axes_rect(&self) -> Rect {
        let (w, h) = (self.width as f64, self.height as f64);
        Rect {
            x0: self.margins.left * w,
            y0: (1.0 - self.margins.top) * h,
            x1: self.margins.right * w,
            y1: (1.0 - self.margins.bottom) * h,
        }
    }

    pub fn render(&self) -> Canvas {
        let mut canvas = Canvas::new(self.width, self.height, colors::PAPER);
        let renderer = ScatterRenderer::new(self.dpi);
        self.axes.draw(&mut canvas, self.axes_rect(), &renderer);
        canvas
    }

    /// Render and write a PNG, replacing any existing file
    pub fn savefig(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        self.render().save_png(path)?;
        info!(path = %path.display(), "Saved figure");
        Ok(())
    }

    /// Re-fit the margins so rendered content sits `1.08` font sizes from
    /// every figure edge
    ///
    /// One adjustment pass, margins clamped to the figure. A blank figure or
    /// a fit that would collapse the axes leaves the margins unchanged.
    pub fn tight_layout(&mut self) {
        let Some((x0, y0, x1, y1)) = self.render().ink_bounds(colors::PAPER) else {
            debug!("Tight layout skipped: nothing drawn");
            return;
        };

        let (w, h) = (self.width as f64, self.height as f64);
        let pad = TIGHT_PAD * FONT_SIZE_PT * self.dpi / 72.0;
        let m = self.margins;
        let fitted = Margins {
            left: (m.left + (pad - x0 as f64) / w).clamp(0.0, 1.0),
            right: (m.right + ((w - pad) - (x1 as f64 + 1.0)) / w).clamp(0.0, 1.0),
            bottom: (m.bottom - ((h - (y1 as f64 + 1.0)) - pad) / h).clamp(0.0, 1.0),
            top: (m.top + (y0 as f64 - pad) / h).clamp(0.0, 1.0),
        };

        if fitted.is_valid() {
            debug!(?m, ?fitted, "Tight layout");
            self.margins = fitted;
        } else {
            debug!(?fitted, "Tight layout rejected; keeping margins");
        }
    }
}
